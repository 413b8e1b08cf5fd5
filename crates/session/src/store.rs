//! Session state container: one writer, any number of subscribers.
//!
//! Every publication is fanned out to per-subscriber channels while the state
//! lock is held, so each subscriber observes states in publication order.
//! Publishing a state equal to the current one is a no-op.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use jobhub_auth::{Principal, Profile, SessionState};

/// Tag of a principal change. Lookups carry the generation they were issued
/// for; only the latest generation may publish.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl core::fmt::Display for Generation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

pub(crate) type SubscriberId = u64;

/// What the reconciler has to do after a principal change was recorded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Transition {
    SignedOut,
    Lookup {
        generation: Generation,
        principal: Principal,
    },
}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    generation: Generation,
    next_subscriber: SubscriberId,
    subscribers: Vec<(SubscriberId, mpsc::UnboundedSender<SessionState>)>,
    closed: bool,
}

#[derive(Debug)]
pub(crate) struct SessionStore {
    inner: Mutex<Inner>,
}

impl SessionStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: SessionState::initial(),
                generation: Generation(0),
                next_subscriber: 0,
                subscribers: Vec::new(),
                closed: false,
            }),
        }
    }

    // Nothing panics while holding the lock; recover the data if it ever
    // gets poisoned anyway.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Record a principal change and supersede every in-flight lookup.
    pub(crate) fn begin(&self, principal: Option<Principal>) -> Transition {
        let mut inner = self.lock();
        inner.generation = Generation(inner.generation.0 + 1);

        match principal {
            None => {
                inner.publish(SessionState::signed_out());
                Transition::SignedOut
            }
            Some(principal) => {
                inner.publish(SessionState::resolving(principal.clone()));
                Transition::Lookup {
                    generation: inner.generation,
                    principal,
                }
            }
        }
    }

    /// Re-enter loading for the current principal, if any.
    pub(crate) fn begin_refresh(&self) -> Option<(Generation, Principal)> {
        let mut inner = self.lock();
        let principal = inner.state.principal()?.clone();
        inner.generation = Generation(inner.generation.0 + 1);

        let next = inner.state.refreshing();
        inner.publish(next);
        Some((inner.generation, principal))
    }

    /// Publish a lookup result unless a newer principal change superseded it.
    ///
    /// Returns `false` when the result was discarded as stale.
    pub(crate) fn complete(&self, generation: Generation, profile: Option<Profile>) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        let Some(principal) = inner.state.principal().cloned() else {
            return false;
        };

        inner.publish(SessionState::resolved(principal, profile));
        true
    }

    /// Register a subscriber. The returned state is the one current at
    /// registration; the receiver yields every later publication.
    pub(crate) fn subscribe(
        &self,
    ) -> (SubscriberId, SessionState, mpsc::UnboundedReceiver<SessionState>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();

        let id = inner.next_subscriber;
        inner.next_subscriber += 1;
        // A closed store hands out receivers that end right after the
        // current state.
        if !inner.closed {
            inner.subscribers.push((id, tx));
        }

        (id, inner.state.clone(), rx)
    }

    pub(crate) fn unsubscribe(&self, id: SubscriberId) {
        self.lock().subscribers.retain(|(sub, _)| *sub != id);
    }

    /// Drop every subscriber channel; later publications reach nobody.
    pub(crate) fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.subscribers.clear();
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl Inner {
    fn publish(&mut self, next: SessionState) {
        if next == self.state {
            return;
        }
        self.state = next;

        // Drop any dead subscribers while publishing.
        let state = &self.state;
        self.subscribers.retain(|(_, tx)| tx.send(state.clone()).is_ok());
    }
}
