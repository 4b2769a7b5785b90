//! Transport seam between a socket implementation and the event bridge
//!
//! A [`Transport`] opens one socket per subscription and reports everything it
//! receives to a [`FrameListener`]. The listener owns no business logic; it
//! forwards to the bridge. The returned [`SocketHandle`] is how the bridge grants
//! read credit and asks for a graceful close.
//!
//! Contract for implementations:
//! - `on_open` fires once, after the handshake, before any frame.
//! - No frame is read until credit was granted through [`SocketHandle::request`].
//! - `on_frame` receives complete text messages only (fragments are reassembled
//!   below this boundary).
//! - Exactly one of `on_close` / `on_error` ends the connection.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::{AriError, AriResult};

/// Callbacks a transport invokes for one connection.
///
/// Callbacks may arrive on any thread and must return promptly.
pub trait FrameListener: Send + Sync {
    /// The handshake completed.
    fn on_open(&self);

    /// One complete text frame arrived.
    fn on_frame(&self, text: String);

    /// The connection closed, with the close code and reason from the peer.
    fn on_close(&self, code: u16, reason: String);

    /// The connection failed.
    fn on_error(&self, error: AriError);
}

/// Control surface of an open socket.
pub trait SocketHandle: Send + Sync {
    /// Allow `n` more frames to be read from the network.
    fn request(&self, n: u64);

    /// Start the close handshake. Further frames are discarded.
    fn close(&self);
}

/// Factory for event sockets.
pub trait Transport: Send + Sync + 'static {
    /// Open a fresh socket reporting to `listener`.
    ///
    /// The future resolves once the socket is open, or fails with
    /// [`AriError::ConnectFailure`].
    fn connect(
        &self,
        listener: Arc<dyn FrameListener>,
    ) -> BoxFuture<'static, AriResult<Box<dyn SocketHandle>>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn connect(
        &self,
        listener: Arc<dyn FrameListener>,
    ) -> BoxFuture<'static, AriResult<Box<dyn SocketHandle>>> {
        (**self).connect(listener)
    }
}
