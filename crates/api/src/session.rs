//! # Admin Sessions
//!
//! A process-wide holder for signed-in admin sessions. Sessions are opaque
//! bearer tokens kept in memory; restarting the server signs everyone out.
//!
//! Other parts of the application observe sign-in and sign-out through
//! [`SessionStore::subscribe`]. A subscription receives every
//! [`SessionEvent`] published after it was created and stops receiving them
//! once it is unsubscribed or dropped.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, distributions::Alphanumeric};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};

const TOKEN_LENGTH: usize = 48;
const EVENT_BUFFER: usize = 64;

/// A signed-in admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Change in the set of signed-in admins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { email: String },
    SignedOut { email: String },
    Expired { email: String },
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    events: broadcast::Sender<SessionEvent>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            events,
            ttl,
        }
    }

    /// Opens a session for an already authenticated admin.
    pub async fn sign_in(&self, email: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: generate_token(),
            email: email.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };

        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        self.publish(SessionEvent::SignedIn {
            email: session.email.clone(),
        });

        session
    }

    /// Ends the session for `token`. Returns `false` if it was not active.
    pub async fn sign_out(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);
        match removed {
            Some(session) => {
                self.publish(SessionEvent::SignedOut { email: session.email });
                true
            }
            None => false,
        }
    }

    /// Looks up a live session, dropping it if it has expired.
    pub async fn validate(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let expired = self.sessions.write().await.remove(token);
        if let Some(session) = expired {
            self.publish(SessionEvent::Expired { email: session.email });
        }
        None
    }

    /// Removes all expired sessions and returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let expired: Vec<Session> = {
            let mut sessions = self.sessions.write().await;
            let tokens: Vec<String> = sessions
                .values()
                .filter(|s| s.is_expired(now))
                .map(|s| s.token.clone())
                .collect();
            tokens.iter().filter_map(|t| sessions.remove(t)).collect()
        };

        for session in &expired {
            self.publish(SessionEvent::Expired {
                email: session.email.clone(),
            });
        }
        expired.len()
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Starts observing session changes.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.events.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn publish(&self, event: SessionEvent) {
        debug!("Session event: {:?}", event);
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

/// Handle returned by [`SessionStore::subscribe`].
pub struct SessionSubscription {
    receiver: broadcast::Receiver<SessionEvent>,
}

impl SessionSubscription {
    /// Waits for the next event. Returns `None` once the store is gone.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Session subscriber fell behind, {} events dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Stops observing. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
