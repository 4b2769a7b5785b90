//! Demand-tracking bridge between a push-driven socket and a pull-driven subscriber
//!
//! [`EventBridge`] binds exactly one [`Subscriber`]. Subscribing lazily opens the
//! transport; events flow only within the demand the subscriber grants through
//! [`Subscription::request`].
//!
//! # Backlog policy
//!
//! Every `request(n)` is forwarded to the socket as read credit, so the bundled
//! [`WsTransport`](crate::WsTransport) never reads a frame nobody asked for and
//! TCP flow control stalls the server. Transports that push regardless park
//! decoded events in a FIFO backlog capped by
//! [`BridgeOptions::backlog_capacity`]; exceeding it ends the subscription with
//! [`AriError::BacklogOverflow`]. Events are never dropped without a terminal
//! error.
//!
//! # Terminal signals
//!
//! Exactly one of `on_complete` / `on_error` reaches the subscriber, unless it
//! cancelled first. Completion waits until backlogged events were delivered;
//! errors are delivered as soon as the events already covered by demand are out.
//!
//! # Threading
//!
//! All state sits behind one mutex. Subscriber callbacks never run with the lock
//! held: a single drain loop delivers signals one at a time, and calls made from
//! inside a callback (`request`, `cancel`) are picked up by the running loop.

use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, info, trace, warn};

use crate::{
    constants::MAX_BACKLOG_SIZE,
    error::{AriError, AriResult},
    event::AriEvent,
    protocol::decode_frame,
    transport::{FrameListener, SocketHandle, Transport},
};

/// Receiver of one event subscription.
///
/// Signals are delivered serially: `on_subscribe` first, then any number of
/// `on_item` (never more than requested), then at most one of `on_complete` /
/// `on_error`.
pub trait Subscriber: Send + Sync + 'static {
    /// The subscription was registered. No events flow until
    /// [`Subscription::request`] is called.
    fn on_subscribe(&self, subscription: Subscription);

    /// One event, within outstanding demand.
    fn on_item(&self, event: AriEvent);

    /// The server closed the event socket.
    fn on_complete(&self);

    /// The subscription failed.
    fn on_error(&self, error: AriError);
}

/// Lifecycle of the single subscription a bridge serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionState {
    /// No subscriber yet.
    Unstarted,
    /// Subscriber bound, socket handshake in progress.
    Connecting,
    /// Socket open, events flowing within demand.
    Active,
    /// Ended by close, error, or cancellation. Absorbing.
    Terminated,
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionState::Unstarted => write!(f, "unstarted"),
            SubscriptionState::Connecting => write!(f, "connecting"),
            SubscriptionState::Active => write!(f, "active"),
            SubscriptionState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Options for an [`EventBridge`].
///
/// Use [`Default::default()`] for standard settings.
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Events parked without demand before the subscription fails. Default: 1000.
    pub backlog_capacity: usize,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            backlog_capacity: MAX_BACKLOG_SIZE,
        }
    }
}

enum Terminal {
    Complete,
    Error(AriError),
}

enum Signal {
    Item(Arc<dyn Subscriber>, AriEvent),
    Complete(Arc<dyn Subscriber>),
    Error(Arc<dyn Subscriber>, AriError),
}

impl Signal {
    fn deliver(self) {
        match self {
            Signal::Item(subscriber, event) => subscriber.on_item(event),
            Signal::Complete(subscriber) => subscriber.on_complete(),
            Signal::Error(subscriber, error) => subscriber.on_error(error),
        }
    }
}

struct BridgeState {
    phase: SubscriptionState,
    /// Authorized but not yet delivered.
    demand: u64,
    /// Demand granted while no socket was attached.
    unforwarded: u64,
    backlog: VecDeque<AriEvent>,
    terminal: Option<Terminal>,
    /// `None` once the terminal signal went out or the subscriber cancelled.
    subscriber: Option<Arc<dyn Subscriber>>,
    socket: Option<Arc<dyn SocketHandle>>,
    draining: bool,
}

impl BridgeState {
    fn new() -> Self {
        Self {
            phase: SubscriptionState::Unstarted,
            demand: 0,
            unforwarded: 0,
            backlog: VecDeque::new(),
            terminal: None,
            subscriber: None,
            socket: None,
            draining: false,
        }
    }

    /// Record a terminal outcome. The phase becomes `Terminated`; the signal
    /// itself is handed out by the drain loop.
    fn terminate(&mut self, terminal: Terminal) -> Option<Arc<dyn SocketHandle>> {
        self.phase = SubscriptionState::Terminated;
        self.terminal = Some(terminal);
        self.unforwarded = 0;
        self.socket
            .take()
    }

    fn next_signal(&mut self) -> Option<Signal> {
        let subscriber = self
            .subscriber
            .clone()?;

        if self.demand > 0 {
            if let Some(event) = self
                .backlog
                .pop_front()
            {
                self.demand -= 1;
                return Some(Signal::Item(subscriber, event));
            }
        }

        let ready = match self.terminal {
            None => false,
            Some(Terminal::Complete) => self
                .backlog
                .is_empty(),
            Some(Terminal::Error(_)) => true,
        };
        if !ready {
            return None;
        }

        if !self
            .backlog
            .is_empty()
        {
            warn!(
                "[BRIDGE] Discarding {} undelivered events ahead of terminal error",
                self.backlog
                    .len()
            );
            self.backlog
                .clear();
        }
        self.subscriber = None;
        match self
            .terminal
            .take()?
        {
            Terminal::Complete => Some(Signal::Complete(subscriber)),
            Terminal::Error(error) => Some(Signal::Error(subscriber, error)),
        }
    }
}

struct Shared {
    state: Mutex<BridgeState>,
    backlog_capacity: usize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver every signal that is currently deliverable.
    fn drain(&self) {
        let mut state = self.lock();
        if state.draining {
            return;
        }
        state.draining = true;
        loop {
            match state.next_signal() {
                Some(signal) => {
                    drop(state);
                    signal.deliver();
                    state = self.lock();
                }
                None => {
                    state.draining = false;
                    return;
                }
            }
        }
    }

    fn request(&self, n: u64) {
        if n == 0 {
            let socket = {
                let mut state = self.lock();
                if state.subscriber.is_none() || state.terminal.is_some() {
                    return;
                }
                warn!("[BRIDGE] request(0) is a usage error, terminating subscription");
                state.terminate(Terminal::Error(AriError::InvalidDemand))
            };
            if let Some(socket) = socket {
                socket.close();
            }
            self.drain();
            return;
        }

        let forward_to = {
            let mut state = self.lock();
            if state.subscriber.is_none() {
                trace!("[BRIDGE] Ignoring request({}) after termination", n);
                return;
            }
            state.demand = state
                .demand
                .saturating_add(n);
            trace!("[BRIDGE] Demand now {}", state.demand);
            match (&state.socket, state.phase) {
                (Some(socket), _) => Some(socket.clone()),
                // Active without a socket: opened, handle not attached yet.
                (None, SubscriptionState::Connecting | SubscriptionState::Active) => {
                    state.unforwarded = state
                        .unforwarded
                        .saturating_add(n);
                    None
                }
                (None, _) => None,
            }
        };

        if let Some(socket) = forward_to {
            socket.request(n);
        }
        self.drain();
    }

    fn cancel(&self) {
        let socket = {
            let mut state = self.lock();
            if state.subscriber.is_none() && state.phase == SubscriptionState::Terminated {
                return;
            }
            debug!("[BRIDGE] Subscriber cancelled in state {}", state.phase);
            state.phase = SubscriptionState::Terminated;
            state.subscriber = None;
            state.terminal = None;
            state.unforwarded = 0;
            state
                .backlog
                .clear();
            state
                .socket
                .take()
        };
        if let Some(socket) = socket {
            socket.close();
        }
    }

    fn attach(&self, socket: Box<dyn SocketHandle>) {
        let socket: Arc<dyn SocketHandle> = Arc::from(socket);
        let credit = {
            let mut state = self.lock();
            if state.phase == SubscriptionState::Terminated {
                drop(state);
                debug!("[BRIDGE] Socket opened after termination, closing it");
                socket.close();
                return;
            }
            if state.phase != SubscriptionState::Active {
                info!("[BRIDGE] Event socket open");
                state.phase = SubscriptionState::Active;
            }
            state.socket = Some(socket.clone());
            mem::take(&mut state.unforwarded)
        };
        if credit > 0 {
            socket.request(credit);
        }
        self.drain();
    }

    fn fail_connect(&self, error: AriError) {
        let error = match error {
            AriError::ConnectFailure(_) => error,
            other => AriError::connect_failure(other.to_string()),
        };
        {
            let mut state = self.lock();
            if state.phase == SubscriptionState::Terminated {
                debug!("[BRIDGE] Connect failed after termination: {}", error);
                return;
            }
            warn!("[BRIDGE] {}", error);
            state.terminate(Terminal::Error(error));
        }
        self.drain();
    }

    fn opened(&self) {
        let mut state = self.lock();
        if state.phase == SubscriptionState::Connecting {
            info!("[BRIDGE] Event socket open");
            state.phase = SubscriptionState::Active;
        }
    }

    fn frame(&self, text: String) {
        let decoded = decode_frame(&text);
        let to_close = {
            let mut state = self.lock();
            match state.phase {
                SubscriptionState::Terminated => {
                    trace!("[BRIDGE] Ignoring frame after termination");
                    return;
                }
                SubscriptionState::Connecting | SubscriptionState::Unstarted => {
                    state.phase = SubscriptionState::Active;
                }
                SubscriptionState::Active => {}
            }

            match decoded {
                Ok(event) => {
                    trace!("[BRIDGE] Received {:?}", event.event_type());
                    state
                        .backlog
                        .push_back(event);
                    let parked = (state
                        .backlog
                        .len() as u64)
                        .saturating_sub(state.demand);
                    if parked > self.backlog_capacity as u64 {
                        warn!(
                            "[BRIDGE] Backlog exceeded {} events without demand",
                            self.backlog_capacity
                        );
                        state.terminate(Terminal::Error(AriError::BacklogOverflow {
                            capacity: self.backlog_capacity,
                        }))
                    } else {
                        None
                    }
                }
                Err(error) => {
                    warn!("[BRIDGE] {}", error);
                    state.terminate(Terminal::Error(error))
                }
            }
        };
        if let Some(socket) = to_close {
            socket.close();
        }
        self.drain();
    }

    fn closed(&self, code: u16, reason: String) {
        {
            let mut state = self.lock();
            if state.phase == SubscriptionState::Terminated {
                trace!("[BRIDGE] Ignoring close after termination");
                return;
            }
            info!("[BRIDGE] Event socket closed with {}: {}", code, reason);
            // The transport is gone; the handle is discarded, not closed.
            drop(state.terminate(Terminal::Complete));
        }
        self.drain();
    }

    fn failed(&self, error: AriError) {
        let error = match error {
            AriError::Transport(_) => error,
            other => AriError::transport(other.to_string()),
        };
        {
            let mut state = self.lock();
            if state.phase == SubscriptionState::Terminated {
                trace!("[BRIDGE] Ignoring transport error after termination");
                return;
            }
            warn!("[BRIDGE] {}", error);
            drop(state.terminate(Terminal::Error(error)));
        }
        self.drain();
    }
}

/// Adapts transport callbacks to the bridge. Holds no state of its own.
struct BridgeListener {
    shared: Weak<Shared>,
}

impl FrameListener for BridgeListener {
    fn on_open(&self) {
        if let Some(shared) = self
            .shared
            .upgrade()
        {
            shared.opened();
        }
    }

    fn on_frame(&self, text: String) {
        if let Some(shared) = self
            .shared
            .upgrade()
        {
            shared.frame(text);
        }
    }

    fn on_close(&self, code: u16, reason: String) {
        if let Some(shared) = self
            .shared
            .upgrade()
        {
            shared.closed(code, reason);
        }
    }

    fn on_error(&self, error: AriError) {
        if let Some(shared) = self
            .shared
            .upgrade()
        {
            shared.failed(error);
        }
    }
}

/// Demand handle for an active subscription (Clone + Send).
///
/// Dropping every handle to a bridge (this one, the [`EventBridge`] itself)
/// releases the socket.
#[derive(Clone)]
pub struct Subscription {
    shared: Arc<Shared>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("state", &self.state())
            .finish()
    }
}

impl Subscription {
    /// Authorize `n` more events. `request(0)` fails the subscription with
    /// [`AriError::InvalidDemand`].
    pub fn request(&self, n: u64) {
        self.shared
            .request(n);
    }

    /// Stop delivery and close the socket. Idempotent; no terminal signal
    /// is sent to the subscriber.
    pub fn cancel(&self) {
        self.shared
            .cancel();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubscriptionState {
        self.shared
            .lock()
            .phase
    }

    /// Authorized events not yet delivered.
    pub fn outstanding_demand(&self) -> u64 {
        self.shared
            .lock()
            .demand
    }
}

/// Single-subscriber event source over one transport.
///
/// ```rust,no_run
/// use asterisk_ari_tokio::{EventBridge, WsTransport};
/// use futures_util::StreamExt;
///
/// # async fn example() -> Result<(), asterisk_ari_tokio::AriError> {
/// let bridge = EventBridge::new(WsTransport::new(
///     "ws://localhost:8088/ari/events?app=demo&api_key=asterisk:secret",
/// ));
/// let mut events = bridge.stream()?;
/// while let Some(event) = events.next().await {
///     println!("{}", event?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct EventBridge<T: Transport> {
    transport: T,
    shared: Arc<Shared>,
}

impl<T: Transport> fmt::Debug for EventBridge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBridge")
            .field("state", &self.state())
            .finish()
    }
}

impl<T: Transport> EventBridge<T> {
    /// Bridge over `transport` with default options.
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, BridgeOptions::default())
    }

    /// Bridge over `transport` with custom options.
    pub fn with_options(transport: T, options: BridgeOptions) -> Self {
        Self {
            transport,
            shared: Arc::new(Shared {
                state: Mutex::new(BridgeState::new()),
                backlog_capacity: options
                    .backlog_capacity
                    .max(1),
            }),
        }
    }

    /// Bind `subscriber` and start connecting.
    ///
    /// Calls `on_subscribe` before returning, then spawns the connection on the
    /// current tokio runtime. A bridge serves one subscription in its lifetime:
    /// any further call fails with [`AriError::AlreadySubscribed`] and leaves the
    /// bound subscriber undisturbed. The rejected subscriber receives no signal.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> AriResult<Subscription> {
        {
            let mut state = self
                .shared
                .lock();
            if state.phase != SubscriptionState::Unstarted {
                warn!("[BRIDGE] Rejecting second subscriber");
                return Err(AriError::AlreadySubscribed);
            }
            state.phase = SubscriptionState::Connecting;
            state.subscriber = Some(subscriber.clone());
            // Hold signals raised from inside on_subscribe until it returns.
            state.draining = true;
        }

        let subscription = Subscription {
            shared: self
                .shared
                .clone(),
        };
        subscriber.on_subscribe(subscription.clone());

        let proceed = {
            let mut state = self
                .shared
                .lock();
            state.draining = false;
            state.phase == SubscriptionState::Connecting
        };
        self.shared
            .drain();

        if proceed {
            debug!("[BRIDGE] Connecting transport");
            let listener: Arc<dyn FrameListener> = Arc::new(BridgeListener {
                shared: Arc::downgrade(&self.shared),
            });
            let connecting = self
                .transport
                .connect(listener);
            let shared = Arc::downgrade(&self.shared);
            tokio::spawn(async move {
                let result = connecting.await;
                match (shared.upgrade(), result) {
                    (Some(shared), Ok(socket)) => shared.attach(socket),
                    (Some(shared), Err(error)) => shared.fail_connect(error),
                    (None, Ok(socket)) => {
                        debug!("[BRIDGE] Bridge dropped while connecting, closing socket");
                        socket.close();
                    }
                    (None, Err(_)) => {}
                }
            });
        }

        Ok(subscription)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubscriptionState {
        self.shared
            .lock()
            .phase
    }
}
