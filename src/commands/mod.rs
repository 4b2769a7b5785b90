//! Typed builders for ARI commands.
//!
//! Each function translates one plain parameter struct (or a few arguments)
//! into an [`AriCommand`](crate::AriCommand) for
//! [`AriClient::invoke`](crate::AriClient::invoke). No I/O happens here.

pub mod channels;

pub use channels::{CreateParams, OriginateParams, PlayParams, SetChannelVarParams};
