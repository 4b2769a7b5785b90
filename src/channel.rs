//! Channel-related data types extracted from ARI channel snapshots.

define_wire_enum! {
    /// Error returned when parsing an unrecognized channel state string.
    error ParseChannelStateError => "unknown channel state";

    /// Channel state as reported in the `state` field of an ARI `Channel` object.
    pub enum ChannelState {
        Down => "Down",
        Reserved => "Rsrvd",
        OffHook => "OffHook",
        Dialing => "Dialing",
        Ring => "Ring",
        Ringing => "Ringing",
        Up => "Up",
        Busy => "Busy",
        DialingOffhook => "Dialing Offhook",
        PreRing => "Pre-ring",
        Unknown => "Unknown",
    }
}

impl ChannelState {
    /// `true` once media is flowing (the channel was answered).
    pub fn is_answered(&self) -> bool {
        matches!(self, ChannelState::Up)
    }

    /// `true` while the channel is alerting, either side.
    pub fn is_ringing(&self) -> bool {
        matches!(
            self,
            ChannelState::Ring | ChannelState::Ringing | ChannelState::PreRing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wire_names() {
        assert_eq!("Up".parse::<ChannelState>(), Ok(ChannelState::Up));
        assert_eq!("Rsrvd".parse::<ChannelState>(), Ok(ChannelState::Reserved));
        assert_eq!(
            "dialing offhook".parse::<ChannelState>(),
            Ok(ChannelState::DialingOffhook)
        );
        assert_eq!("PRE-RING".parse::<ChannelState>(), Ok(ChannelState::PreRing));
    }

    #[test]
    fn parse_unknown_state() {
        let err = "Hibernating"
            .parse::<ChannelState>()
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown channel state: Hibernating");
    }

    #[test]
    fn wire_lookup_is_exact() {
        assert_eq!(ChannelState::from_wire("Pre-ring"), Some(ChannelState::PreRing));
        assert_eq!(ChannelState::from_wire("pre-ring"), None);
        assert_eq!(ChannelState::ALL.len(), 11);
    }

    #[test]
    fn serde_uses_wire_names() {
        let state: ChannelState = serde_json::from_str(r#""Dialing Offhook""#).unwrap();
        assert_eq!(state, ChannelState::DialingOffhook);
        assert_eq!(serde_json::to_string(&ChannelState::Reserved).unwrap(), r#""Rsrvd""#);
        assert!(serde_json::from_str::<ChannelState>(r#""Hibernating""#).is_err());
    }

    #[test]
    fn display_matches_wire() {
        assert_eq!(ChannelState::DialingOffhook.to_string(), "Dialing Offhook");
        assert_eq!(ChannelState::Reserved.as_ref(), "Rsrvd");
    }

    #[test]
    fn classification() {
        assert!(ChannelState::Up.is_answered());
        assert!(!ChannelState::Ringing.is_answered());
        assert!(ChannelState::Ring.is_ringing());
        assert!(ChannelState::PreRing.is_ringing());
        assert!(!ChannelState::Down.is_ringing());
    }
}
