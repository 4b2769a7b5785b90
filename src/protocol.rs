//! Event envelope decoding
//!
//! Every ARI WebSocket text frame carries exactly one event encoded as a JSON
//! object. Decoding is all-or-nothing: a frame that is not a JSON object is
//! rejected whole with [`AriError::MalformedEvent`], carrying the raw text.

use serde_json::Value;

use crate::{
    error::{AriError, AriResult},
    event::AriEvent,
};

/// Decode one complete text frame into an [`AriEvent`].
pub fn decode_frame(text: &str) -> AriResult<AriEvent> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(properties)) => Ok(AriEvent::new(properties)),
        _ => Err(AriError::malformed(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_malformed(text: &str) {
        match decode_frame(text) {
            Err(AriError::MalformedEvent { raw }) => assert_eq!(raw, text),
            other => panic!("expected MalformedEvent for {text:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_object() {
        let event = decode_frame(r#"{"type":"ChannelCreated","channel":{"id":"abc"}}"#).unwrap();
        assert_eq!(event.event_type(), Some("ChannelCreated"));
        assert_eq!(event.channel_id(), Some("abc"));
    }

    #[test]
    fn test_decode_object_without_type() {
        let event = decode_frame(r#"{"application":"demo"}"#).unwrap();
        assert_eq!(event.event_type(), None);
    }

    #[test]
    fn test_decode_not_json() {
        assert_malformed("not-json");
    }

    #[test]
    fn test_decode_array_root() {
        assert_malformed("[1,2,3]");
    }

    #[test]
    fn test_decode_scalar_roots() {
        assert_malformed("42");
        assert_malformed(r#""StasisStart""#);
        assert_malformed("null");
    }

    #[test]
    fn test_decode_empty_and_truncated() {
        assert_malformed("");
        assert_malformed(r#"{"type":"StasisStart""#);
    }

    #[test]
    fn test_decode_trailing_garbage() {
        assert_malformed(r#"{"type":"Dial"} {"type":"Dial"}"#);
    }
}
