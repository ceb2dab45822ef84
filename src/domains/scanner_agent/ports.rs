use super::identity::Credentials;
use super::report::ScanReport;
use crate::common::{AuthError, SubmitError};
use async_trait::async_trait;

/// Port to the warehouse backend: a login endpoint and a data-ingestion endpoint.
/// Implementations must bound every call with a timeout.
#[async_trait]
pub trait WarehouseBackend: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError>;

    /// Delivers one report. `SubmitError::Unauthorized` means the token was refused.
    async fn submit_report(&self, token: &str, report: &ScanReport) -> Result<(), SubmitError>;
}
