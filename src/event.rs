//! ARI event types and structures

use crate::channel::ChannelState;
use crate::constants::{FIELD_APPLICATION, FIELD_CHANNEL, FIELD_TIMESTAMP, FIELD_TYPE};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

define_wire_enum! {
    /// Error returned when parsing an unknown event type string.
    error ParseEventTypeError => "unknown event type";

    /// Event names documented by the ARI events REST model.
    ///
    /// Not exhaustive: Asterisk adds events between releases, and modules can
    /// raise their own. [`AriEvent::event_type`] always exposes the raw name.
    pub enum AriEventType {
        ApplicationMoveFailed => "ApplicationMoveFailed",
        ApplicationRegistered => "ApplicationRegistered",
        ApplicationReplaced => "ApplicationReplaced",
        ApplicationUnregistered => "ApplicationUnregistered",
        BridgeAttendedTransfer => "BridgeAttendedTransfer",
        BridgeBlindTransfer => "BridgeBlindTransfer",
        BridgeCreated => "BridgeCreated",
        BridgeDestroyed => "BridgeDestroyed",
        BridgeMerged => "BridgeMerged",
        BridgeVideoSourceChanged => "BridgeVideoSourceChanged",
        ChannelCallerId => "ChannelCallerId",
        ChannelConnectedLine => "ChannelConnectedLine",
        ChannelCreated => "ChannelCreated",
        ChannelDestroyed => "ChannelDestroyed",
        ChannelDialplan => "ChannelDialplan",
        ChannelDtmfReceived => "ChannelDtmfReceived",
        ChannelEnteredBridge => "ChannelEnteredBridge",
        ChannelHangupRequest => "ChannelHangupRequest",
        ChannelHold => "ChannelHold",
        ChannelLeftBridge => "ChannelLeftBridge",
        ChannelStateChange => "ChannelStateChange",
        ChannelTalkingFinished => "ChannelTalkingFinished",
        ChannelTalkingStarted => "ChannelTalkingStarted",
        ChannelToneDetected => "ChannelToneDetected",
        ChannelUnhold => "ChannelUnhold",
        ChannelUserevent => "ChannelUserevent",
        ChannelVarset => "ChannelVarset",
        ContactStatusChange => "ContactStatusChange",
        DeviceStateChanged => "DeviceStateChanged",
        Dial => "Dial",
        EndpointStateChange => "EndpointStateChange",
        MissingParams => "MissingParams",
        PeerStatusChange => "PeerStatusChange",
        PlaybackContinuing => "PlaybackContinuing",
        PlaybackFinished => "PlaybackFinished",
        PlaybackStarted => "PlaybackStarted",
        RecordingFailed => "RecordingFailed",
        RecordingFinished => "RecordingFinished",
        RecordingStarted => "RecordingStarted",
        StasisEnd => "StasisEnd",
        StasisStart => "StasisStart",
        TextMessageReceived => "TextMessageReceived",
    }
}

/// One decoded ARI event.
///
/// Wraps the JSON object delivered in a single WebSocket frame. Immutable once
/// built; the `type` discriminant is read lazily from the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AriEvent {
    properties: Map<String, Value>,
}

impl AriEvent {
    /// Wrap an already-decoded JSON object.
    pub fn new(properties: Map<String, Value>) -> Self {
        Self { properties }
    }

    /// Raw `type` field, `None` if absent or not a string.
    pub fn event_type(&self) -> Option<&str> {
        self.str_field(FIELD_TYPE)
    }

    /// `type` parsed into a known [`AriEventType`].
    pub fn kind(&self) -> Option<AriEventType> {
        self.event_type()?
            .parse()
            .ok()
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties
            .get(key)
    }

    /// Name of the Stasis application the event was raised for.
    pub fn application(&self) -> Option<&str> {
        self.str_field(FIELD_APPLICATION)
    }

    /// Server timestamp as sent (ISO 8601 with milliseconds and offset).
    pub fn timestamp(&self) -> Option<&str> {
        self.str_field(FIELD_TIMESTAMP)
    }

    /// `channel.id` for events carrying a channel snapshot.
    pub fn channel_id(&self) -> Option<&str> {
        self.channel_field("id")
    }

    /// `channel.state` for events carrying a channel snapshot.
    pub fn channel_state(&self) -> Option<ChannelState> {
        self.channel_field("state")?
            .parse()
            .ok()
    }

    /// All top-level fields.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Consume the event, returning the underlying JSON object.
    pub fn into_properties(self) -> Map<String, Value> {
        self.properties
    }

    /// Decode the payload into a caller-supplied typed model.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(Value::Object(self.properties.clone()))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(Value::as_str)
    }

    fn channel_field(&self, key: &str) -> Option<&str> {
        self.properties
            .get(FIELD_CHANNEL)?
            .get(key)?
            .as_str()
    }
}

impl From<Map<String, Value>> for AriEvent {
    fn from(properties: Map<String, Value>) -> Self {
        Self::new(properties)
    }
}

impl fmt::Display for AriEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]: {}",
            self.event_type()
                .unwrap_or("-"),
            Value::Object(self.properties.clone())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: Value) -> AriEvent {
        match value {
            Value::Object(map) => AriEvent::new(map),
            other => panic!("test fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn test_event_type_present() {
        let ev = event(json!({"type": "StasisStart", "application": "demo"}));
        assert_eq!(ev.event_type(), Some("StasisStart"));
        assert_eq!(ev.kind(), Some(AriEventType::StasisStart));
        assert_eq!(ev.application(), Some("demo"));
    }

    #[test]
    fn test_event_type_absent_is_none() {
        let ev = event(json!({"application": "demo"}));
        assert_eq!(ev.event_type(), None);
        assert_eq!(ev.kind(), None);
    }

    #[test]
    fn test_event_type_non_string_is_none() {
        let ev = event(json!({"type": 42}));
        assert_eq!(ev.event_type(), None);
    }

    #[test]
    fn test_unknown_type_keeps_raw_name() {
        let ev = event(json!({"type": "SomethingNew"}));
        assert_eq!(ev.event_type(), Some("SomethingNew"));
        assert_eq!(ev.kind(), None);
    }

    #[test]
    fn test_event_type_from_str_case_insensitive() {
        assert_eq!(
            "channeldestroyed".parse::<AriEventType>(),
            Ok(AriEventType::ChannelDestroyed)
        );
        assert_eq!(
            "StasisEnd".parse::<AriEventType>(),
            Ok(AriEventType::StasisEnd)
        );
        assert!("NotAnEvent"
            .parse::<AriEventType>()
            .is_err());
    }

    #[test]
    fn test_typed_fields_deserialize_from_wire_names() {
        #[derive(serde::Deserialize)]
        struct Snapshot {
            #[serde(rename = "type")]
            kind: AriEventType,
            channel: Channel,
        }
        #[derive(serde::Deserialize)]
        struct Channel {
            state: ChannelState,
        }

        let ev = event(json!({"type": "ChannelStateChange", "channel": {"state": "Up"}}));
        let snapshot: Snapshot = ev
            .deserialize()
            .unwrap();
        assert_eq!(snapshot.kind, AriEventType::ChannelStateChange);
        assert_eq!(snapshot.channel.state, ChannelState::Up);
        assert_eq!(AriEventType::from_wire("stasisstart"), None);
    }

    #[test]
    fn test_channel_snapshot_accessors() {
        let ev = event(json!({
            "type": "ChannelStateChange",
            "timestamp": "2024-01-01T00:00:00.000+0000",
            "channel": {"id": "1700000000.1", "state": "Ringing"}
        }));
        assert_eq!(ev.channel_id(), Some("1700000000.1"));
        assert_eq!(ev.channel_state(), Some(ChannelState::Ringing));
        assert_eq!(ev.timestamp(), Some("2024-01-01T00:00:00.000+0000"));
    }

    #[test]
    fn test_display_format() {
        let ev = event(json!({"type": "Dial"}));
        assert_eq!(ev.to_string(), r#"[Dial]: {"type":"Dial"}"#);

        let untyped = event(json!({}));
        assert_eq!(untyped.to_string(), "[-]: {}");
    }

    #[test]
    fn test_deserialize_into_model() {
        #[derive(serde::Deserialize)]
        struct Dtmf {
            digit: String,
            duration_ms: u32,
        }

        let ev = event(json!({"type": "ChannelDtmfReceived", "digit": "5", "duration_ms": 120}));
        let dtmf: Dtmf = ev
            .deserialize()
            .unwrap();
        assert_eq!(dtmf.digit, "5");
        assert_eq!(dtmf.duration_ms, 120);
    }
}
