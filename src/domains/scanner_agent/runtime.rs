use super::events::{AgentState, AgentStats, AgentSummary, TickOutcome};
use super::identity::{AgentIdentity, DEFAULT_PASSWORD};
use super::ports::WarehouseBackend;
use super::report::{format_timestamp, ScanReport};
use super::session::{CredentialSession, DEFAULT_REFRESH_MARGIN, DEFAULT_TOKEN_TTL};
use crate::common::{AuthError, SubmitError, TickError};
use crate::domains::logger::DynLogger;
use crate::domains::warehouse::{
    BatteryLevel, LocationCursor, ObservationGenerator, Position, Product, PRODUCT_CATALOG,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub interval: Duration,
    pub token_ttl: Duration,
    pub refresh_margin: Duration,
    /// Stop after this many ticks. `None` runs until cancelled.
    pub max_ticks: Option<u64>,
    pub password: String,
}

impl AgentSettings {
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval, ..Self::default() }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            token_ttl: DEFAULT_TOKEN_TTL,
            refresh_margin: DEFAULT_REFRESH_MARGIN,
            max_ticks: None,
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

/// Control loop of a single scanning agent.
///
/// Each tick: refresh the token if stale, send a report (one re-login and
/// resend on 401), move one shelf, sleep. All state is owned by the task
/// running the loop.
pub struct AgentRuntime {
    identity: AgentIdentity,
    session: CredentialSession,
    cursor: LocationCursor,
    generator: ObservationGenerator,
    catalog: &'static [Product],
    backend: Arc<dyn WarehouseBackend>,
    logger: DynLogger,
    settings: AgentSettings,
    rng: StdRng,
    state: AgentState,
    stats: AgentStats,
}

impl AgentRuntime {
    pub fn new(
        identity: AgentIdentity,
        settings: AgentSettings,
        backend: Arc<dyn WarehouseBackend>,
        logger: DynLogger,
    ) -> Self {
        Self::with_rng(identity, settings, backend, logger, StdRng::from_entropy())
    }

    pub fn with_rng(
        identity: AgentIdentity,
        settings: AgentSettings,
        backend: Arc<dyn WarehouseBackend>,
        logger: DynLogger,
        rng: StdRng,
    ) -> Self {
        Self {
            identity,
            session: CredentialSession::new(settings.token_ttl, settings.refresh_margin),
            cursor: LocationCursor::new(),
            generator: ObservationGenerator::new(),
            catalog: PRODUCT_CATALOG,
            backend,
            logger,
            settings,
            rng,
            state: AgentState::Idle,
            stats: AgentStats::default(),
        }
    }

    pub fn with_cursor(mut self, cursor: LocationCursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn agent_id(&self) -> &str {
        self.identity.agent_id()
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn stats(&self) -> AgentStats {
        self.stats
    }

    pub fn position(&self) -> Position {
        self.cursor.current()
    }

    pub fn battery(&self) -> BatteryLevel {
        self.cursor.battery()
    }

    pub fn session(&self) -> &CredentialSession {
        &self.session
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            agent_id: self.agent_id().to_string(),
            position: self.position(),
            battery_level: self.battery().rounded(),
            stats: self.stats,
        }
    }

    /// Runs ticks until `cancel` fires or the tick limit is reached.
    /// Cancellation is honoured at the top of the loop and while sleeping,
    /// never in the middle of a send.
    pub async fn run(mut self, cancel: CancellationToken) -> AgentSummary {
        self.logger.info(&format!(
            "[{}] Starting at {} with interval {:?}",
            self.agent_id(),
            self.position(),
            self.settings.interval
        ));

        loop {
            if cancel.is_cancelled() || self.tick_limit_reached() {
                break;
            }

            self.tick().await;

            if self.tick_limit_reached() {
                break;
            }

            self.transition(AgentState::Sleeping);
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.settings.interval) => {}
            }
        }

        self.transition(AgentState::Stopped);
        if cancel.is_cancelled() {
            self.logger.info(&format!("[{}] Stopped by cancellation.", self.agent_id()));
        } else {
            self.logger.info(&format!(
                "[{}] Finished after {} ticks.",
                self.agent_id(),
                self.stats.ticks
            ));
        }
        self.summary()
    }

    /// One report-then-move cycle. Movement happens whatever the report outcome.
    pub async fn tick(&mut self) -> TickOutcome {
        let outcome = self.report().await;
        self.log_outcome(&outcome);
        self.stats.record(&outcome);

        self.transition(AgentState::Moving);
        if self.cursor.advance(&mut self.rng) {
            self.stats.recharges += 1;
            self.logger.info(&format!("[{}] Battery low, recharged to full.", self.agent_id()));
        }

        outcome
    }

    async fn report(&mut self) -> TickOutcome {
        if !self.session.is_valid() {
            if let Err(e) = self.login().await {
                return TickOutcome::Skipped(TickError::Auth(e));
            }
        }

        self.transition(AgentState::Reporting);
        let report = self.build_report();

        match self.send(&report).await {
            Ok(()) => TickOutcome::Delivered { relogged_in: false },
            Err(SubmitError::Unauthorized) => {
                self.logger.warn(&format!(
                    "[{}] Unauthorized. Token might be expired. Trying re-login.",
                    self.agent_id()
                ));
                self.stats.relogins += 1;
                if let Err(e) = self.login().await {
                    return TickOutcome::Skipped(TickError::Relogin(e));
                }
                self.transition(AgentState::Reporting);
                match self.send(&report).await {
                    Ok(()) => TickOutcome::Delivered { relogged_in: true },
                    Err(e) => TickOutcome::Skipped(TickError::Resend(e)),
                }
            }
            Err(e) => TickOutcome::Skipped(TickError::Submit(e)),
        }
    }

    async fn login(&mut self) -> Result<(), AuthError> {
        self.transition(AgentState::Authenticating);
        self.stats.login_attempts += 1;

        let result = self
            .session
            .login(self.backend.as_ref(), self.identity.credentials())
            .await;

        match &result {
            Ok(()) => {
                self.stats.logins += 1;
                self.logger.info(&format!("[{}] Logged in successfully.", self.agent_id()));
            }
            Err(e) => {
                self.transition(AgentState::Unauthenticated);
                self.logger.warn(&format!("[{}] Login failed: {}", self.agent_id(), e));
            }
        }
        result
    }

    async fn send(&mut self, report: &ScanReport) -> Result<(), SubmitError> {
        let token = self.session.token().ok_or(SubmitError::Unauthorized)?;
        self.stats.report_sends += 1;
        self.backend.submit_report(token, report).await
    }

    fn build_report(&mut self) -> ScanReport {
        ScanReport {
            robot_id: self.identity.agent_id().to_string(),
            timestamp: format_timestamp(Utc::now()),
            location: self.cursor.current(),
            scan_results: self.generator.generate(self.catalog, &mut self.rng),
            battery_level: self.cursor.battery().rounded(),
            next_checkpoint: self.cursor.next_checkpoint_label(),
        }
    }

    fn log_outcome(&self, outcome: &TickOutcome) {
        let id = self.agent_id();
        match outcome {
            TickOutcome::Delivered { relogged_in: false } => {
                self.logger.info(&format!("[{}] Data sent successfully.", id));
            }
            TickOutcome::Delivered { relogged_in: true } => {
                self.logger.info(&format!("[{}] Data sent successfully after re-login.", id));
            }
            TickOutcome::Skipped(e @ (TickError::Auth(_) | TickError::Relogin(_))) => {
                self.logger.warn(&format!("[{}] {}", id, e));
            }
            TickOutcome::Skipped(e) => {
                self.logger.error(&format!("[{}] {}", id, e));
            }
        }
    }

    fn tick_limit_reached(&self) -> bool {
        matches!(self.settings.max_ticks, Some(max) if self.stats.ticks >= max)
    }

    fn transition(&mut self, next: AgentState) {
        if self.state != next {
            debug!(agent = %self.identity.agent_id(), from = ?self.state, to = ?next, "state transition");
            self.state = next;
        }
    }
}
