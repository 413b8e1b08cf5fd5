//! Observer side of the session: async streams and callback subscriptions.

use std::sync::Arc;

use tokio::sync::mpsc;

use jobhub_auth::SessionState;

use crate::cancel::CancelToken;
use crate::store::{SessionStore, SubscriberId};

/// A stream of session states.
///
/// The first `recv` yields the state current at subscription time (even when
/// still loading); each later `recv` yields the next published state. Ends
/// once the session manager shuts down. Dropping the stream unsubscribes.
#[derive(Debug)]
pub struct SessionStream {
    id: SubscriberId,
    initial: Option<SessionState>,
    receiver: mpsc::UnboundedReceiver<SessionState>,
    store: Arc<SessionStore>,
}

impl SessionStream {
    pub(crate) fn new(store: Arc<SessionStore>) -> Self {
        let (id, current, receiver) = store.subscribe();
        Self {
            id,
            initial: Some(current),
            receiver,
            store,
        }
    }

    pub async fn recv(&mut self) -> Option<SessionState> {
        if let Some(state) = self.initial.take() {
            return Some(state);
        }
        self.receiver.recv().await
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        self.store.unsubscribe(self.id);
    }
}

/// Handle returned by `SessionManager::subscribe`.
///
/// Unsubscribing (explicitly or by dropping the handle) guarantees the
/// callback is not invoked again, including for states that were already
/// queued for it.
#[derive(Debug)]
#[must_use = "dropping the handle unsubscribes the callback"]
pub struct SessionSubscriptionHandle {
    id: SubscriberId,
    store: Arc<SessionStore>,
    cancel: CancelToken,
}

impl SessionSubscriptionHandle {
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}

impl Drop for SessionSubscriptionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.store.unsubscribe(self.id);
    }
}

/// Deliver the current state to `callback` synchronously, then every later
/// state from a spawned task.
pub(crate) fn spawn_callback<F>(store: Arc<SessionStore>, mut callback: F) -> SessionSubscriptionHandle
where
    F: FnMut(&SessionState) + Send + 'static,
{
    let (id, current, mut receiver) = store.subscribe();
    callback(&current);

    let cancel = CancelToken::new();
    let task_cancel = cancel.clone();
    tokio::spawn(async move {
        loop {
            let next = tokio::select! {
                biased;
                _ = task_cancel.cancelled() => break,
                next = receiver.recv() => next,
            };
            let Some(state) = next else { break };
            if task_cancel.is_cancelled() {
                break;
            }
            callback(&state);
        }
    });

    SessionSubscriptionHandle { id, store, cancel }
}
