//! Protocol constants and configuration values

/// Default Asterisk HTTP port serving ARI
pub const DEFAULT_ARI_PORT: u16 = 8088;

/// Per-request timeout for ARI commands in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 3000;

/// Maximum number of decoded events parked while the subscriber has no demand.
///
/// Only reached by transports that push frames without honouring read credit;
/// the bundled WebSocket transport never reads past outstanding demand.
pub const MAX_BACKLOG_SIZE: usize = 1000;

/// WebSocket close code for a normal closure (RFC 6455 section 7.4.1)
pub const NORMAL_CLOSURE: u16 = 1000;

/// Close code reported when the peer went away without a close frame
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// Close code reported when a close frame carried no status
pub const NO_STATUS_RECEIVED: u16 = 1005;

/// Event payload field carrying the event discriminant.
pub const FIELD_TYPE: &str = "type";
/// Event payload field naming the Stasis application.
pub const FIELD_APPLICATION: &str = "application";
/// Event payload field carrying the server-side timestamp.
pub const FIELD_TIMESTAMP: &str = "timestamp";
/// Event payload field holding the channel snapshot.
pub const FIELD_CHANNEL: &str = "channel";

/// Content-Type sent with JSON command bodies
pub const CONTENT_TYPE_JSON: &str = "application/json;charset=utf-8";

/// Characters the query-parameter escaper leaves untouched (besides alphanumerics).
pub const QUERY_SAFE_CHARS: &str = "_-!.~'()*,;:$?/[]@";
