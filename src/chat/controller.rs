//! Core chat session orchestration.
//!
//! This module provides the `ChatController` struct which drives streaming
//! turns against the backend, applies events to the conversation, and saves
//! the session after every change.

use async_trait::async_trait;
use uuid::Uuid;

use crate::client::{AgriAgent, StreamHandler};
use crate::conversation::ConversationState;
use crate::error::Result;
use crate::history::SessionStore;
use crate::lang::Language;
use crate::types::{ChatRequest, DiagnosisImage, DiagnosisResponse, Session};
use crate::utils::time::now_millis;

/// Backend behavior expected by the chat controller.
///
/// `AgriAgent` is the production implementation; tests substitute scripted
/// backends to exercise turn handling without a server.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Streams one chat exchange, dispatching each event to `handler`.
    ///
    /// Returns `Ok(true)` once a terminal event has been dispatched and
    /// `Ok(false)` when the stream ends, or is interrupted, without one.
    async fn stream_chat(
        &self,
        request: &ChatRequest,
        handler: &mut dyn StreamHandler,
    ) -> Result<bool>;

    /// Runs a crop photo diagnosis.
    async fn diagnose(&self, image: &DiagnosisImage, language: &str) -> Result<DiagnosisResponse>;
}

#[async_trait]
impl ChatBackend for AgriAgent {
    async fn stream_chat(
        &self,
        request: &ChatRequest,
        handler: &mut dyn StreamHandler,
    ) -> Result<bool> {
        self.chat_stream_with(request, handler).await
    }

    async fn diagnose(&self, image: &DiagnosisImage, language: &str) -> Result<DiagnosisResponse> {
        AgriAgent::diagnose(self, image, language).await
    }
}

/// Where the controller is in the lifecycle of a turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// No turn in flight. Input and session switching are accepted.
    #[default]
    Idle,

    /// A request has been issued but no event has arrived yet.
    Sending,

    /// At least one event of the current turn has arrived.
    Streaming,
}

/// A chat session controller that manages conversation state, drives
/// streaming turns, and persists history.
///
/// One controller owns one active conversation at a time. Switching sessions
/// swaps the conversation in place; the store keeps the most recent sessions
/// across runs.
pub struct ChatController<B: ChatBackend> {
    backend: B,
    store: Box<dyn SessionStore>,
    conversation: ConversationState,
    session_id: String,
    phase: Phase,
    city: Option<String>,
    language: Language,
}

impl ChatController<AgriAgent> {
    /// Creates a controller backed by the production API client.
    pub fn new(client: AgriAgent, store: Box<dyn SessionStore>) -> Self {
        Self::with_backend(client, store)
    }
}

impl<B: ChatBackend> ChatController<B> {
    /// Creates a controller with a custom backend.
    pub fn with_backend(backend: B, store: Box<dyn SessionStore>) -> Self {
        Self {
            backend,
            store,
            conversation: ConversationState::new(),
            session_id: Uuid::new_v4().to_string(),
            phase: Phase::Idle,
            city: None,
            language: Language::default(),
        }
    }

    /// Returns the active conversation.
    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    /// Returns the active session id.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the current turn phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the city sent with chat requests, if set.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Sets or clears the city sent with chat requests.
    pub fn set_city(&mut self, city: Option<String>) {
        self.city = city;
    }

    /// Returns the reply language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Sets the reply language.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Sends a user message and streams the reply into the conversation.
    ///
    /// This method:
    /// 1. Appends the user message and an empty assistant reply
    /// 2. Opens a streaming request against the backend
    /// 3. Applies each event to the conversation as it arrives
    /// 4. Saves the session after every change
    ///
    /// Blank input is ignored, as is any input while a turn is in flight.
    /// Failures do not surface as `Err`: a transport fault replaces the
    /// reply with a localized connection-error message and is reported once
    /// through `handler.on_error`. There is no retry; the user resends.
    pub async fn send(&mut self, text: &str, handler: &mut dyn StreamHandler) {
        if self.phase != Phase::Idle || text.trim().is_empty() {
            return;
        }

        self.conversation.push_user(text);
        self.conversation.begin_assistant();
        self.persist();
        self.phase = Phase::Sending;

        let mut request = ChatRequest::new(text)
            .with_language(self.language.as_str())
            .with_session_id(self.session_id.clone());
        if let Some(city) = &self.city {
            request = request.with_city(city.clone());
        }

        let mut turn = TurnHandler {
            conversation: &mut self.conversation,
            store: self.store.as_ref(),
            session_id: &self.session_id,
            phase: &mut self.phase,
            ui: handler,
        };

        match self.backend.stream_chat(&request, &mut turn).await {
            Ok(true) => {}
            Ok(false) => {
                self.conversation.close_pending();
                self.persist();
            }
            Err(_) => {
                let notice = self.language.connection_error();
                self.conversation.fail(notice);
                self.persist();
                handler.on_error(notice);
            }
        }

        self.phase = Phase::Idle;
    }

    /// Sends a crop photo for diagnosis as one conversation turn.
    ///
    /// The photo appears in history as a user message carrying an image
    /// reference; the diagnosis text becomes the assistant reply. A failure
    /// replaces the reply with a localized message, like [`Self::send`].
    pub async fn send_image(&mut self, image: DiagnosisImage, handler: &mut dyn StreamHandler) {
        if self.phase != Phase::Idle {
            return;
        }

        let data_url = image.data_url();
        self.conversation
            .push_user_with_image(self.language.diagnose_prompt(), data_url);
        self.conversation.begin_assistant();
        self.persist();
        self.phase = Phase::Sending;

        match self.backend.diagnose(&image, self.language.as_str()).await {
            Ok(response) => {
                self.conversation.append_token(&response.diagnosis);
                self.conversation
                    .finalize(&response.agents_used, &response.language);
                self.persist();
                handler.on_token(&response.diagnosis);
                handler.on_done(&response.agents_used, &response.language);
            }
            Err(_) => {
                let notice = self.language.analyzing_error();
                self.conversation.fail(notice);
                self.persist();
                handler.on_error(notice);
            }
        }

        self.phase = Phase::Idle;
    }

    /// Starts a fresh conversation under a new session id.
    ///
    /// The previous session stays in the store; an empty conversation is
    /// never saved, so the new session only appears once a message is sent.
    pub fn new_session(&mut self) {
        self.session_id = Uuid::new_v4().to_string();
        self.conversation.clear();
    }

    /// Replaces the conversation with a stored session and makes it active.
    ///
    /// Only allowed while idle. Returns false, leaving the controller
    /// untouched, when a turn is in flight or no session has that id.
    pub fn load_session(&mut self, id: &str) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        let Some(session) = self.store.load_all().into_iter().find(|s| s.id == id) else {
            return false;
        };
        self.session_id = session.id;
        self.conversation.replace(session.messages);
        true
    }

    /// Removes a session from the store.
    ///
    /// Deleting the active session does not clear the conversation; it only
    /// drops the saved copy, which reappears on the next save.
    pub fn delete_session(&mut self, id: &str) {
        self.store.remove(id);
    }

    /// Returns the stored sessions, most recent first.
    pub fn sessions(&self) -> Vec<Session> {
        self.store.load_all()
    }

    fn persist(&self) {
        persist_conversation(self.store.as_ref(), &self.session_id, &self.conversation);
    }
}

/// Applies the events of one turn to the conversation, saving after each,
/// then forwards them to the user-facing handler.
struct TurnHandler<'a> {
    conversation: &'a mut ConversationState,
    store: &'a dyn SessionStore,
    session_id: &'a str,
    phase: &'a mut Phase,
    ui: &'a mut dyn StreamHandler,
}

impl TurnHandler<'_> {
    fn persist(&self) {
        persist_conversation(self.store, self.session_id, self.conversation);
    }
}

impl StreamHandler for TurnHandler<'_> {
    fn on_routing(&mut self, agents: &[String]) {
        *self.phase = Phase::Streaming;
        self.conversation.apply_routing(agents);
        self.persist();
        self.ui.on_routing(agents);
    }

    fn on_token(&mut self, text: &str) {
        *self.phase = Phase::Streaming;
        self.conversation.append_token(text);
        self.persist();
        self.ui.on_token(text);
    }

    fn on_done(&mut self, agents_used: &[String], language: &str) {
        self.conversation.finalize(agents_used, language);
        self.persist();
        self.ui.on_done(agents_used, language);
    }

    fn on_error(&mut self, message: &str) {
        self.conversation.fail(format!("Error: {message}"));
        self.persist();
        self.ui.on_error(message);
    }

    fn should_interrupt(&self) -> bool {
        self.ui.should_interrupt()
    }
}

fn persist_conversation(store: &dyn SessionStore, session_id: &str, state: &ConversationState) {
    store.upsert(Session::new(
        session_id.to_string(),
        state.messages().to_vec(),
        now_millis(),
    ));
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use futures::stream;

    use crate::client::dispatch_stream;
    use crate::error::Error;
    use crate::history::MemorySessionStore;
    use crate::types::{
        ChatStreamEvent, DoneEvent, ErrorEvent, ImageMediaType, RoutingEvent, TokenEvent,
    };

    use super::*;

    /// Replays pre-scripted turns through the real dispatch loop.
    struct ScriptedBackend {
        turns: Mutex<VecDeque<Vec<Result<ChatStreamEvent>>>>,
        requests: Mutex<Vec<ChatRequest>>,
        diagnosis: Mutex<Option<Result<DiagnosisResponse>>>,
    }

    impl ScriptedBackend {
        fn with_turns(turns: Vec<Vec<Result<ChatStreamEvent>>>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                requests: Mutex::new(Vec::new()),
                diagnosis: Mutex::new(None),
            }
        }

        fn with_diagnosis(diagnosis: Result<DiagnosisResponse>) -> Self {
            Self {
                turns: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
                diagnosis: Mutex::new(Some(diagnosis)),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn stream_chat(
            &self,
            request: &ChatRequest,
            handler: &mut dyn StreamHandler,
        ) -> Result<bool> {
            self.requests.lock().unwrap().push(request.clone());
            let turn = self.turns.lock().unwrap().pop_front().unwrap_or_default();
            dispatch_stream(stream::iter(turn), handler, None).await
        }

        async fn diagnose(
            &self,
            _image: &DiagnosisImage,
            _language: &str,
        ) -> Result<DiagnosisResponse> {
            self.diagnosis
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(Error::connection("no diagnosis scripted", None)))
        }
    }

    #[derive(Default)]
    struct RecordingHandler {
        calls: Vec<String>,
    }

    impl StreamHandler for RecordingHandler {
        fn on_routing(&mut self, agents: &[String]) {
            self.calls.push(format!("routing:{}", agents.join(",")));
        }

        fn on_token(&mut self, text: &str) {
            self.calls.push(format!("token:{text}"));
        }

        fn on_done(&mut self, agents_used: &[String], language: &str) {
            self.calls
                .push(format!("done:{}:{language}", agents_used.join(",")));
        }

        fn on_error(&mut self, message: &str) {
            self.calls.push(format!("error:{message}"));
        }
    }

    /// Stops the exchange after a fixed number of dispatched events.
    struct InterruptingHandler {
        calls: usize,
        stop_after: usize,
    }

    impl StreamHandler for InterruptingHandler {
        fn on_routing(&mut self, _agents: &[String]) {
            self.calls += 1;
        }

        fn on_token(&mut self, _text: &str) {
            self.calls += 1;
        }

        fn on_done(&mut self, _agents_used: &[String], _language: &str) {
            self.calls += 1;
        }

        fn on_error(&mut self, _message: &str) {
            self.calls += 1;
        }

        fn should_interrupt(&self) -> bool {
            self.calls >= self.stop_after
        }
    }

    /// Counts upserts so saves-per-mutation can be asserted.
    struct CountingStore {
        inner: MemorySessionStore,
        upserts: Arc<AtomicUsize>,
    }

    impl SessionStore for CountingStore {
        fn load_all(&self) -> Vec<Session> {
            self.inner.load_all()
        }

        fn save_all(&self, sessions: &[Session]) {
            self.inner.save_all(sessions);
        }

        fn upsert(&self, session: Session) {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.inner.upsert(session);
        }

        fn remove(&self, id: &str) {
            self.inner.remove(id);
        }
    }

    fn agents(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn happy_turn() -> Vec<Result<ChatStreamEvent>> {
        vec![
            Ok(RoutingEvent::new(agents(&["thinker", "weather"])).into()),
            Ok(TokenEvent::new("Il ").into()),
            Ok(TokenEvent::new("pleuvra demain.").into()),
            Ok(DoneEvent::new(agents(&["weather"]), "fr").into()),
        ]
    }

    fn controller_with(
        turns: Vec<Vec<Result<ChatStreamEvent>>>,
    ) -> ChatController<ScriptedBackend> {
        ChatController::with_backend(
            ScriptedBackend::with_turns(turns),
            Box::new(MemorySessionStore::new()),
        )
    }

    #[tokio::test]
    async fn send_streams_reply_into_conversation() {
        let mut controller = controller_with(vec![happy_turn()]);
        let mut handler = RecordingHandler::default();

        controller.send("Quel temps fera-t-il ?", &mut handler).await;

        let messages = controller.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user());
        assert_eq!(messages[0].content, "Quel temps fera-t-il ?");
        assert!(messages[1].is_assistant());
        assert_eq!(messages[1].content, "Il pleuvra demain.");
        assert_eq!(messages[1].agents_used, agents(&["weather"]));
        assert!(!controller.conversation().is_pending());
        assert_eq!(controller.phase(), Phase::Idle);

        assert_eq!(
            handler.calls,
            vec![
                "routing:thinker,weather",
                "token:Il ",
                "token:pleuvra demain.",
                "done:weather:fr",
            ]
        );

        let sessions = controller.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, controller.session_id());
        assert_eq!(sessions[0].title, "Quel temps fera-t-il ?");
        assert_eq!(sessions[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn reported_error_replaces_reply() {
        let turn = vec![
            Ok(RoutingEvent::new(agents(&["thinker"])).into()),
            Ok(TokenEvent::new("Bonj").into()),
            Ok(ErrorEvent::new("model overloaded").into()),
        ];
        let mut controller = controller_with(vec![turn]);
        let mut handler = RecordingHandler::default();

        controller.send("Bonjour", &mut handler).await;

        let reply = controller.conversation().last().unwrap();
        assert_eq!(reply.content, "Error: model overloaded");
        assert!(reply.agents_used.is_empty());
        assert!(!controller.conversation().is_pending());
        assert_eq!(handler.calls.last().unwrap(), "error:model overloaded");
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn connection_failure_uses_localized_text() {
        let turn = vec![Err(Error::connection("connection refused", None))];
        let mut controller = controller_with(vec![turn]);
        let mut handler = RecordingHandler::default();

        controller.send("Bonjour", &mut handler).await;

        let reply = controller.conversation().last().unwrap();
        assert_eq!(
            reply.content,
            "Erreur de connexion. Vérifiez que le backend fonctionne."
        );
        assert!(!controller.conversation().is_pending());
        assert_eq!(
            handler.calls,
            vec!["error:Erreur de connexion. Vérifiez que le backend fonctionne."]
        );

        let sessions = controller.sessions();
        assert_eq!(sessions[0].messages[1].content, reply.content);
    }

    #[tokio::test]
    async fn connection_failure_after_partial_reply() {
        let turn = vec![
            Ok(TokenEvent::new("Bonjour, je").into()),
            Err(Error::connection("connection reset", None)),
        ];
        let mut controller = controller_with(vec![turn]);
        controller.set_language(Language::En);
        let mut handler = RecordingHandler::default();

        controller.send("Hello", &mut handler).await;

        let reply = controller.conversation().last().unwrap();
        assert_eq!(
            reply.content,
            "Connection error. Make sure the backend is running."
        );
        assert_eq!(handler.calls[0], "token:Bonjour, je");
        assert_eq!(
            handler.calls[1],
            "error:Connection error. Make sure the backend is running."
        );
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut controller = controller_with(vec![happy_turn()]);
        let mut handler = RecordingHandler::default();

        controller.send("", &mut handler).await;
        controller.send("   \t  ", &mut handler).await;

        assert!(controller.conversation().is_empty());
        assert!(handler.calls.is_empty());
        assert!(controller.sessions().is_empty());
        assert!(controller.backend.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn input_ignored_while_busy() {
        let mut controller = controller_with(vec![happy_turn()]);
        let mut handler = RecordingHandler::default();

        controller.phase = Phase::Streaming;
        controller.send("Bonjour", &mut handler).await;

        assert!(controller.conversation().is_empty());
        assert!(controller.backend.requests.lock().unwrap().is_empty());
        assert_eq!(controller.phase(), Phase::Streaming);
    }

    #[tokio::test]
    async fn stream_without_terminal_keeps_partial_reply() {
        let turn = vec![
            Ok(RoutingEvent::new(agents(&["thinker"])).into()),
            Ok(TokenEvent::new("Le mil se plante").into()),
        ];
        let mut controller = controller_with(vec![turn]);
        let mut handler = RecordingHandler::default();

        controller.send("Quand planter le mil ?", &mut handler).await;

        let reply = controller.conversation().last().unwrap();
        assert_eq!(reply.content, "Le mil se plante");
        assert!(reply.agents_used.is_empty());
        assert!(!controller.conversation().is_pending());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn interrupt_stops_mid_stream() {
        let mut controller = controller_with(vec![happy_turn()]);
        let mut handler = InterruptingHandler {
            calls: 0,
            stop_after: 2,
        };

        controller.send("Bonjour", &mut handler).await;

        assert_eq!(handler.calls, 2);
        let reply = controller.conversation().last().unwrap();
        assert_eq!(reply.content, "Il ");
        assert!(!controller.conversation().is_pending());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn request_carries_city_language_and_session() {
        let mut controller = controller_with(vec![happy_turn()]);
        controller.set_city(Some("thies".to_string()));
        controller.set_language(Language::Wo);
        let mut handler = RecordingHandler::default();

        controller.send("Nanga def", &mut handler).await;

        let requests = controller.backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, "Nanga def");
        assert_eq!(requests[0].city.as_deref(), Some("thies"));
        assert_eq!(requests[0].language.as_deref(), Some("wo"));
        assert_eq!(
            requests[0].session_id.as_deref(),
            Some(controller.session_id())
        );
    }

    #[tokio::test]
    async fn saves_after_every_event() {
        let upserts = Arc::new(AtomicUsize::new(0));
        let store = CountingStore {
            inner: MemorySessionStore::new(),
            upserts: Arc::clone(&upserts),
        };
        let mut controller = ChatController::with_backend(
            ScriptedBackend::with_turns(vec![happy_turn()]),
            Box::new(store),
        );
        let mut handler = RecordingHandler::default();

        controller.send("Bonjour", &mut handler).await;

        // One save when the turn opens, then one per dispatched event.
        assert_eq!(upserts.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn new_session_starts_fresh() {
        let mut controller = controller_with(vec![happy_turn()]);
        let mut handler = RecordingHandler::default();

        controller.send("Bonjour", &mut handler).await;
        let first_id = controller.session_id().to_string();

        controller.new_session();
        assert_ne!(controller.session_id(), first_id);
        assert!(controller.conversation().is_empty());

        // The old session is untouched and the empty one is not saved.
        let sessions = controller.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, first_id);
    }

    #[tokio::test]
    async fn load_session_restores_snapshot() {
        let mut controller = controller_with(vec![happy_turn(), happy_turn()]);
        let mut handler = RecordingHandler::default();

        controller.send("Premier sujet", &mut handler).await;
        let first_id = controller.session_id().to_string();

        controller.new_session();
        controller.send("Deuxième sujet", &mut handler).await;
        let second_id = controller.session_id().to_string();

        let sessions = controller.sessions();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, second_id);
        assert_eq!(sessions[1].id, first_id);

        assert!(controller.load_session(&first_id));
        assert_eq!(controller.session_id(), first_id);
        assert_eq!(
            controller.conversation().messages()[0].content,
            "Premier sujet"
        );

        assert!(!controller.load_session("no-such-session"));
        assert_eq!(controller.session_id(), first_id);

        controller.phase = Phase::Streaming;
        assert!(!controller.load_session(&second_id));
        assert_eq!(controller.session_id(), first_id);
    }

    #[tokio::test]
    async fn delete_active_session_keeps_conversation() {
        let mut controller = controller_with(vec![happy_turn(), happy_turn()]);
        let mut handler = RecordingHandler::default();

        controller.send("Bonjour", &mut handler).await;
        let id = controller.session_id().to_string();

        controller.delete_session(&id);
        assert!(controller.sessions().is_empty());
        assert_eq!(controller.conversation().messages().len(), 2);

        // The next turn saves the same session again.
        controller.send("Encore là ?", &mut handler).await;
        let sessions = controller.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, id);
        assert_eq!(sessions[0].messages.len(), 4);
    }

    #[tokio::test]
    async fn image_turn_appends_diagnosis() {
        let backend = ScriptedBackend::with_diagnosis(Ok(DiagnosisResponse {
            diagnosis: "Mildiou détecté sur les feuilles.".to_string(),
            language: "fr".to_string(),
            agents_used: agents(&["diagnosis"]),
        }));
        let mut controller =
            ChatController::with_backend(backend, Box::new(MemorySessionStore::new()));
        let mut handler = RecordingHandler::default();

        let image = DiagnosisImage::new(vec![0xFF, 0xD8, 0xFF], ImageMediaType::Jpeg);
        let data_url = image.data_url();
        controller.send_image(image, &mut handler).await;

        let messages = controller.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "Diagnostique cette photo de culture");
        assert_eq!(messages[0].image_ref.as_deref(), Some(data_url.as_str()));
        assert_eq!(messages[1].content, "Mildiou détecté sur les feuilles.");
        assert_eq!(messages[1].agents_used, agents(&["diagnosis"]));
        assert!(!controller.conversation().is_pending());

        assert_eq!(
            handler.calls,
            vec![
                "token:Mildiou détecté sur les feuilles.",
                "done:diagnosis:fr",
            ]
        );
        assert_eq!(controller.sessions().len(), 1);
    }

    #[tokio::test]
    async fn image_failure_uses_localized_text() {
        let backend =
            ScriptedBackend::with_diagnosis(Err(Error::timeout("request timed out", Some(30.0))));
        let mut controller =
            ChatController::with_backend(backend, Box::new(MemorySessionStore::new()));
        let mut handler = RecordingHandler::default();

        let image = DiagnosisImage::new(vec![0x89, 0x50], ImageMediaType::Png);
        controller.send_image(image, &mut handler).await;

        let reply = controller.conversation().last().unwrap();
        assert_eq!(
            reply.content,
            "Erreur lors de l'analyse de l'image. Réessayez."
        );
        assert!(!controller.conversation().is_pending());
        assert_eq!(
            handler.calls,
            vec!["error:Erreur lors de l'analyse de l'image. Réessayez."]
        );
        assert_eq!(controller.phase(), Phase::Idle);
    }
}
