//! `futures` stream adapter over the event bridge

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::{
    bridge::{EventBridge, Subscriber, Subscription, SubscriptionState},
    error::{AriError, AriResult},
    event::AriEvent,
    transport::Transport,
};

enum StreamSignal {
    Item(AriEvent),
    Complete,
    Error(AriError),
}

/// Forwards signals into the stream's channel.
///
/// The channel holds at most one event: the stream requests the next event only
/// after the previous one was taken.
struct ChannelSubscriber {
    tx: mpsc::UnboundedSender<StreamSignal>,
}

impl Subscriber for ChannelSubscriber {
    fn on_subscribe(&self, _subscription: Subscription) {}

    fn on_item(&self, event: AriEvent) {
        let _ = self
            .tx
            .send(StreamSignal::Item(event));
    }

    fn on_complete(&self) {
        let _ = self
            .tx
            .send(StreamSignal::Complete);
    }

    fn on_error(&self, error: AriError) {
        let _ = self
            .tx
            .send(StreamSignal::Error(error));
    }
}

/// Event stream (!Clone) pulling one event at a time from an [`EventBridge`].
///
/// Yields `Ok(event)` per event; a failure is yielded once as `Err` and ends the
/// stream; a server-side close ends the stream with `None`. Dropping the stream
/// cancels the subscription and closes the socket.
pub struct AriEventStream {
    subscription: Subscription,
    rx: mpsc::UnboundedReceiver<StreamSignal>,
    requested: bool,
    done: bool,
}

impl fmt::Debug for AriEventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AriEventStream")
            .field("state", &self.state())
            .field("done", &self.done)
            .finish()
    }
}

impl AriEventStream {
    /// Receive the next event, or `None` once the stream ended.
    pub async fn recv(&mut self) -> Option<AriResult<AriEvent>> {
        self.next()
            .await
    }

    /// State of the underlying subscription.
    pub fn state(&self) -> SubscriptionState {
        self.subscription
            .state()
    }

    /// Stop the stream and close the socket.
    pub fn close(&mut self) {
        self.done = true;
        self.subscription
            .cancel();
    }
}

impl futures_util::Stream for AriEventStream {
    type Item = AriResult<AriEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }
        if !self.requested {
            self.requested = true;
            self.subscription
                .request(1);
        }
        match self
            .rx
            .poll_recv(cx)
        {
            Poll::Ready(Some(StreamSignal::Item(event))) => {
                self.requested = false;
                Poll::Ready(Some(Ok(event)))
            }
            Poll::Ready(Some(StreamSignal::Error(error))) => {
                self.done = true;
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(Some(StreamSignal::Complete)) | Poll::Ready(None) => {
                self.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for AriEventStream {
    fn drop(&mut self) {
        self.subscription
            .cancel();
    }
}

impl<T: Transport> EventBridge<T> {
    /// Subscribe with a pull-style stream instead of a [`Subscriber`].
    ///
    /// Fails with [`AriError::AlreadySubscribed`] if the bridge already has a
    /// subscriber.
    pub fn stream(&self) -> AriResult<AriEventStream> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(std::sync::Arc::new(ChannelSubscriber { tx }))?;
        Ok(AriEventStream {
            subscription,
            rx,
            requested: false,
            done: false,
        })
    }
}
