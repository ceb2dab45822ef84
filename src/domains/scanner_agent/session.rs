use super::identity::Credentials;
use super::ports::WarehouseBackend;
use crate::common::AuthError;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(8 * 3600);
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct TokenGrant {
    token: String,
    acquired_at: Instant,
}

/// One agent's bearer token and its freshness bookkeeping.
///
/// Token and acquisition time live in a single `TokenGrant`, so they are
/// either both present or both absent. Only a successful `login` replaces it.
#[derive(Debug, Clone)]
pub struct CredentialSession {
    grant: Option<TokenGrant>,
    ttl: Duration,
    refresh_margin: Duration,
}

impl CredentialSession {
    pub fn new(ttl: Duration, refresh_margin: Duration) -> Self {
        Self { grant: None, ttl, refresh_margin }
    }

    pub fn token(&self) -> Option<&str> {
        self.grant.as_ref().map(|g| g.token.as_str())
    }

    pub fn acquired_at(&self) -> Option<Instant> {
        self.grant.as_ref().map(|g| g.acquired_at)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }

    /// True while less than `ttl - refresh_margin` has elapsed since the last login.
    pub fn is_valid_at(&self, now: Instant) -> bool {
        match &self.grant {
            Some(grant) => {
                let elapsed = now.saturating_duration_since(grant.acquired_at);
                elapsed < self.ttl.saturating_sub(self.refresh_margin)
            }
            None => false,
        }
    }

    /// Requests a fresh token. On failure the previous grant, if any, is kept.
    pub async fn login(
        &mut self,
        backend: &dyn WarehouseBackend,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        let token = backend.login(credentials).await?;
        self.grant = Some(TokenGrant { token, acquired_at: Instant::now() });
        Ok(())
    }
}

impl Default for CredentialSession {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_TTL, DEFAULT_REFRESH_MARGIN)
    }
}
