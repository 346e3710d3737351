use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("agriagent.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("agriagent.client.request_errors");

pub(crate) static STREAM_EVENTS: Counter = Counter::new("agriagent.stream.events");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("agriagent.stream.errors");
pub(crate) static STREAM_DISCARDED_FRAMES: Counter =
    Counter::new("agriagent.stream.discarded_frames");

pub(crate) static STORE_LOADS: Counter = Counter::new("agriagent.store.loads");
pub(crate) static STORE_SAVES: Counter = Counter::new("agriagent.store.saves");
pub(crate) static STORE_ERRORS: Counter = Counter::new("agriagent.store.errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_DISCARDED_FRAMES);

    collector.register_counter(&STORE_LOADS);
    collector.register_counter(&STORE_SAVES);
    collector.register_counter(&STORE_ERRORS);
}
