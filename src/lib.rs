//! Asterisk REST Interface (ARI) client for Rust
//!
//! This crate provides an async client for Asterisk's ARI: a demand-driven
//! event feed over the `/ari/events` WebSocket, and an HTTP client for the
//! REST command surface.
//!
//! # Architecture
//!
//! - [`EventBridge`]: binds one subscriber to one event socket and delivers
//!   events strictly within the demand the subscriber grants
//! - [`AriEventStream`]: `futures` stream over a bridge, one event per poll
//! - [`AriClient`] (Clone + Send): send [`AriCommand`]s from any task
//!
//! The socket is opened lazily on subscribe and closed on cancel. There is no
//! reconnect logic: when a stream ends, build a new bridge to resubscribe.
//!
//! # Examples
//!
//! ## Event stream
//!
//! ```rust,no_run
//! use asterisk_ari_tokio::{AriError, AriEventType, EventBridge, WsTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AriError> {
//!     let transport = WsTransport::new(
//!         "ws://localhost:8088/ari/events?app=demo&api_key=asterisk:secret",
//!     );
//!     let bridge = EventBridge::new(transport);
//!     let mut events = bridge.stream()?;
//!
//!     while let Some(event) = events.recv().await {
//!         let event = event?;
//!         if event.kind() == Some(AriEventType::StasisStart) {
//!             println!("call entered: {:?}", event.channel_id());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Subscriber with explicit demand
//!
//! ```rust,no_run
//! use std::sync::{Arc, Mutex};
//! use asterisk_ari_tokio::{AriError, AriEvent, EventBridge, Subscriber, Subscription, WsTransport};
//!
//! struct Printer {
//!     subscription: Mutex<Option<Subscription>>,
//! }
//!
//! impl Subscriber for Printer {
//!     fn on_subscribe(&self, subscription: Subscription) {
//!         subscription.request(16);
//!         *self.subscription.lock().unwrap() = Some(subscription);
//!     }
//!     fn on_item(&self, event: AriEvent) {
//!         println!("{}", event);
//!         if let Some(s) = self.subscription.lock().unwrap().as_ref() {
//!             s.request(1);
//!         }
//!     }
//!     fn on_complete(&self) {
//!         println!("socket closed");
//!     }
//!     fn on_error(&self, error: AriError) {
//!         eprintln!("stream failed: {}", error);
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), AriError> {
//! let bridge = EventBridge::new(WsTransport::new("ws://localhost:8088/ari/events?app=demo"));
//! bridge.subscribe(Arc::new(Printer { subscription: Mutex::new(None) }))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Commands
//!
//! ```rust,no_run
//! use asterisk_ari_tokio::{commands::channels, AriClient, AriError};
//!
//! # async fn example() -> Result<(), AriError> {
//! let client = AriClient::new("http://localhost:8088/ari")?;
//! client.invoke(&channels::answer("1700000000.1")).await?;
//! client.invoke(&channels::hangup("1700000000.1", "normal")).await?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod bridge;
pub mod channel;
pub mod client;
pub mod commands;
pub mod constants;
pub mod error;
pub mod event;
pub mod stream;
pub mod transport;
pub mod websocket;

pub(crate) mod command;
pub(crate) mod protocol;

pub use bridge::{BridgeOptions, EventBridge, Subscriber, Subscription, SubscriptionState};
pub use channel::{ChannelState, ParseChannelStateError};
pub use client::{AriClient, ClientOptions};
pub use command::{escape_path_segment, escape_query_component, AriCommand, HttpMethod};
pub use constants::DEFAULT_ARI_PORT;
pub use error::{AriError, AriResult};
pub use event::{AriEvent, AriEventType, ParseEventTypeError};
pub use protocol::decode_frame;
pub use stream::AriEventStream;
pub use transport::{FrameListener, SocketHandle, Transport};
pub use websocket::WsTransport;
