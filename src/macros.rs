/// Defines an ARI string-valued enum together with its parse error.
///
/// ARI sends these names verbatim in JSON (`"type": "StasisStart"`,
/// `"state": "Rsrvd"`), so the generated enum carries:
///
/// - `as_str()`, `Display` and `AsRef<str>` returning the wire name
/// - `from_wire()`: exact, case-sensitive lookup as Asterisk emits it
/// - `FromStr`: exact lookup, then a case-insensitive fallback for
///   hand-written input
/// - `ALL`: every variant in declaration order
/// - serde `Serialize`/`Deserialize` as the wire string
///
/// The parse error is a tuple struct holding the rejected input; its
/// `Display` is `"<message>: <input>"`.
///
/// ```ignore
/// define_wire_enum! {
///     /// Error for unknown playback states.
///     error ParsePlaybackStateError => "unknown playback state";
///
///     /// Playback state.
///     pub enum PlaybackState {
///         Queued => "queued",
///         Playing => "playing",
///     }
/// }
/// ```
macro_rules! define_wire_enum {
    (
        $(#[$err_meta:meta])*
        error $Err:ident => $message:literal;

        $(#[$enum_meta:meta])*
        $vis:vis enum $Name:ident {
            $(
                $(#[$var_meta:meta])*
                $variant:ident => $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$err_meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        $vis struct $Err(pub String);

        impl std::fmt::Display for $Err {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($message, ": {}"), self.0)
            }
        }

        impl std::error::Error for $Err {}

        $(#[$enum_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        #[allow(missing_docs)]
        $vis enum $Name {
            $(
                $(#[$var_meta])*
                $variant,
            )+
        }

        impl $Name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$Name] = &[$( $Name::$variant, )+];

            /// Name as it appears on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $Name::$variant => $wire, )+
                }
            }

            /// Exact lookup of a wire name.
            pub fn from_wire(name: &str) -> Option<Self> {
                match name {
                    $( $wire => Some($Name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::str::FromStr for $Name {
            type Err = $Err;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if let Some(value) = Self::from_wire(s) {
                    return Ok(value);
                }
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| s.eq_ignore_ascii_case(v.as_str()))
                    .ok_or_else(|| $Err(s.to_string()))
            }
        }

        impl serde::Serialize for $Name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                name.parse()
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}
