//! Application state shared across request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{JwtSigner, PasswordHasher, Pbkdf2Hasher, TokenSigner};
use crate::config::Config;
use crate::notify::{LogNotifier, Notifier, WebhookNotifier};
use crate::store::{EventStore, UserStore};

/// Shared application state.
///
/// This is passed to all request handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: UserStore,
    events: EventStore,
    tokens: Arc<dyn TokenSigner>,
    passwords: Arc<dyn PasswordHasher>,
    notifier: Arc<dyn Notifier>,
    notify_timeout: Duration,
}

impl AppState {
    /// Create application state with empty stores and the given
    /// collaborators.
    pub fn new(
        tokens: Arc<dyn TokenSigner>,
        passwords: Arc<dyn PasswordHasher>,
        notifier: Arc<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users: UserStore::new(),
                events: EventStore::new(),
                tokens,
                passwords,
                notifier,
                notify_timeout,
            }),
        }
    }

    /// Wire production collaborators from configuration.
    pub fn from_config(config: &Config) -> Self {
        let tokens = Arc::new(JwtSigner::new(config.jwt_secret.as_bytes(), config.token_ttl));
        let passwords = Arc::new(Pbkdf2Hasher::new(config.password_iterations));
        let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone(), config.notify_from.clone())),
            None => Arc::new(LogNotifier::new(config.notify_from.clone())),
        };

        Self::new(tokens, passwords, notifier, config.notify_timeout)
    }

    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    pub fn events(&self) -> &EventStore {
        &self.inner.events
    }

    pub fn tokens(&self) -> &dyn TokenSigner {
        self.inner.tokens.as_ref()
    }

    /// Shared handle to the password hasher, for use on blocking threads.
    pub fn passwords(&self) -> Arc<dyn PasswordHasher> {
        self.inner.passwords.clone()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.inner.notifier.as_ref()
    }

    pub fn notify_timeout(&self) -> Duration {
        self.inner.notify_timeout
    }
}

#[cfg(test)]
impl AppState {
    /// State with a fixed signing secret and a cheap password hasher.
    pub(crate) fn for_tests(notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            Arc::new(JwtSigner::new(b"test-secret", chrono::Duration::hours(24))),
            Arc::new(Pbkdf2Hasher::new(1_000)),
            notifier,
            Duration::from_millis(200),
        )
    }
}
