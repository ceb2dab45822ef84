use crate::common::TickError;
use crate::domains::warehouse::Position;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgentState {
    Idle,
    Authenticating,
    /// Login failed this tick; the report is skipped and login is retried next tick.
    Unauthenticated,
    Reporting,
    Moving,
    Sleeping,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Delivered { relogged_in: bool },
    Skipped(TickError),
}

impl TickOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, TickOutcome::Delivered { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub ticks: u64,
    pub delivered: u64,
    pub skipped: u64,
    pub login_attempts: u64,
    pub logins: u64,
    pub relogins: u64,
    pub report_sends: u64,
    pub recharges: u64,
}

impl AgentStats {
    pub fn record(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        if outcome.is_delivered() {
            self.delivered += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Final state handed back by an agent task when it stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub agent_id: String,
    pub position: Position,
    pub battery_level: f64,
    pub stats: AgentStats,
}
