//! Streaming-response decoding.
//!
//! The backend streams chat answers as newline-framed `data: <json>` lines.
//! This module converts the raw byte stream of an HTTP response into a lazy
//! stream of structured [`ChatStreamEvent`]s.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};

use crate::observability::{STREAM_DISCARDED_FRAMES, STREAM_ERRORS, STREAM_EVENTS};
use crate::{ChatStreamEvent, Error, Result};

/// Frame prefix that marks a line as carrying an event payload.
const DATA_PREFIX: &[u8] = b"data: ";

/// Process a stream of bytes into a stream of chat events.
///
/// Incoming bytes accumulate in a buffer until a newline completes a line.
/// Lines carrying the `data: ` prefix are parsed as JSON events; blank lines,
/// other lines, and `data: ` lines that fail to parse are skipped without
/// ending the stream. Decoding is insensitive to how the transport chunks the
/// bytes: a frame split anywhere, including inside a multi-byte character,
/// decodes identically because text is only interpreted per complete line.
///
/// At end of stream any buffered bytes that never saw their newline are
/// discarded. A transport error surfaces as an `Err` item and ends decoding.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<ChatStreamEvent>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let buffer = BytesMut::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // First check if we have a complete frame in the buffer
                if let Some(event) = next_frame(&mut buffer) {
                    STREAM_EVENTS.click();
                    return Some((Ok(event), (stream, buffer)));
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // End of stream; a partial line without its newline
                        // is not a frame and gets dropped.
                        if !buffer.is_empty() {
                            STREAM_DISCARDED_FRAMES.click();
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Extract the next decodable event from the buffer.
///
/// Consumes complete lines until one parses as an event or no complete line
/// remains. Lines that are not events (blank, unprefixed, malformed JSON,
/// unknown type tags) are consumed and dropped.
fn next_frame(buffer: &mut BytesMut) -> Option<ChatStreamEvent> {
    while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
        let line = buffer.split_to(newline + 1);
        let line = &line[..line.len() - 1];
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };
        match serde_json::from_slice::<ChatStreamEvent>(payload) {
            Ok(event) => return Some(event),
            Err(_) => {
                STREAM_DISCARDED_FRAMES.click();
                continue;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    use crate::{DoneEvent, RoutingEvent, TokenEvent};

    fn chunked(chunks: &[&[u8]]) -> Vec<std::result::Result<Bytes, reqwest::Error>> {
        chunks
            .iter()
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect()
    }

    async fn decode_all(
        chunks: Vec<std::result::Result<Bytes, reqwest::Error>>,
    ) -> Vec<ChatStreamEvent> {
        let stream = Box::pin(stream::iter(chunks));
        let mut sse_stream = Box::pin(process_sse(stream));
        let mut events = Vec::new();
        while let Some(event) = sse_stream.next().await {
            events.push(event.unwrap());
        }
        events
    }

    const WIRE: &[u8] = b"data: {\"type\":\"routing\",\"agents\":[\"weather_agent\"]}\n\ndata: {\"type\":\"token\",\"text\":\"Il \"}\n\ndata: {\"type\":\"token\",\"text\":\"pleut\"}\n\ndata: {\"type\":\"done\",\"agents_used\":[\"weather_agent\"],\"language\":\"fr\"}\n\n";

    fn expected() -> Vec<ChatStreamEvent> {
        vec![
            RoutingEvent::new(vec!["weather_agent".to_string()]).into(),
            TokenEvent::new("Il ").into(),
            TokenEvent::new("pleut").into(),
            DoneEvent::new(vec!["weather_agent".to_string()], "fr").into(),
        ]
    }

    #[tokio::test]
    async fn decodes_single_chunk() {
        let events = decode_all(chunked(&[WIRE])).await;
        assert_eq!(events, expected());
    }

    #[tokio::test]
    async fn decodes_one_byte_at_a_time() {
        let chunks: Vec<_> = WIRE
            .iter()
            .map(|b| Ok(Bytes::copy_from_slice(std::slice::from_ref(b))))
            .collect();
        let events = decode_all(chunks).await;
        assert_eq!(events, expected());
    }

    #[tokio::test]
    async fn decodes_awkward_split_points() {
        // Split mid-prefix, mid-json, and mid-line-ending.
        let splits = [3usize, 20, 54, 55, 71, 90];
        let mut chunks = Vec::new();
        let mut last = 0;
        for &split in &splits {
            chunks.push(Ok(Bytes::copy_from_slice(&WIRE[last..split])));
            last = split;
        }
        chunks.push(Ok(Bytes::copy_from_slice(&WIRE[last..])));
        let events = decode_all(chunks).await;
        assert_eq!(events, expected());
    }

    #[tokio::test]
    async fn multi_byte_characters_survive_any_split() {
        let wire = "data: {\"type\":\"token\",\"text\":\"Ébène à Thiès\"}\n".as_bytes();
        let chunks: Vec<_> = wire
            .iter()
            .map(|b| Ok(Bytes::copy_from_slice(std::slice::from_ref(b))))
            .collect();
        let events = decode_all(chunks).await;
        assert_eq!(events, vec![TokenEvent::new("Ébène à Thiès").into()]);
    }

    #[tokio::test]
    async fn malformed_frame_is_skipped() {
        let wire = b"data: {\"type\":\"token\",\"text\":\"a\"}\ndata: {not json\ndata: {\"type\":\"token\",\"text\":\"b\"}\n";
        let events = decode_all(chunked(&[wire])).await;
        assert_eq!(
            events,
            vec![TokenEvent::new("a").into(), TokenEvent::new("b").into()]
        );
    }

    #[tokio::test]
    async fn unknown_event_type_is_skipped() {
        let wire = b"data: {\"type\":\"heartbeat\"}\ndata: {\"type\":\"token\",\"text\":\"ok\"}\n";
        let events = decode_all(chunked(&[wire])).await;
        assert_eq!(events, vec![TokenEvent::new("ok").into()]);
    }

    #[tokio::test]
    async fn non_data_lines_are_skipped() {
        let wire = b"\n: comment\nretry: 500\ndata: {\"type\":\"token\",\"text\":\"ok\"}\n\n";
        let events = decode_all(chunked(&[wire])).await;
        assert_eq!(events, vec![TokenEvent::new("ok").into()]);
    }

    #[tokio::test]
    async fn trailing_partial_line_is_discarded() {
        let wire = b"data: {\"type\":\"token\",\"text\":\"ok\"}\ndata: {\"type\":\"done\"";
        let events = decode_all(chunked(&[wire])).await;
        assert_eq!(events, vec![TokenEvent::new("ok").into()]);
    }

    #[tokio::test]
    async fn carriage_returns_are_tolerated() {
        let wire = b"data: {\"type\":\"token\",\"text\":\"ok\"}\r\n\r\n";
        let events = decode_all(chunked(&[wire])).await;
        assert_eq!(events, vec![TokenEvent::new("ok").into()]);
    }

    #[tokio::test]
    async fn empty_stream_yields_nothing() {
        let events = decode_all(Vec::new()).await;
        assert!(events.is_empty());
    }
}
