use crate::adapters::outbound::HttpBackend;
use crate::common::TransportError;
use crate::domains::logger::DynLogger;
use crate::domains::scanner_agent::{
    AgentIdentity, AgentRuntime, AgentSettings, AgentSummary, WarehouseBackend,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

/// Handle to one running agent task.
pub struct AgentHandle {
    agent_id: String,
    cancel: CancellationToken,
    task: JoinHandle<AgentSummary>,
}

impl AgentHandle {
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Asks this agent alone to stop; it exits at its next cancellation point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) -> Result<AgentSummary, JoinError> {
        self.task.await
    }
}

/// Every agent started by one supervisor call. Cancelling the fleet cancels
/// each agent through a child token.
pub struct Fleet {
    cancel: CancellationToken,
    handles: Vec<AgentHandle>,
}

impl Fleet {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[AgentHandle] {
        &self.handles
    }

    pub fn into_handles(self) -> Vec<AgentHandle> {
        self.handles
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for every agent. Summaries come back in agent order; an agent
    /// whose task panicked is reported as an error without hiding the others.
    pub async fn join(self) -> Vec<Result<AgentSummary, JoinError>> {
        let mut results = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            results.push(handle.join().await);
        }
        results
    }

    pub async fn shutdown(self) -> Vec<Result<AgentSummary, JoinError>> {
        self.cancel();
        self.join().await
    }
}

/// Spawns independent agent runtimes that share only the backend client and logger.
pub struct FleetSupervisor {
    backend: Arc<dyn WarehouseBackend>,
    logger: DynLogger,
}

impl FleetSupervisor {
    pub fn new(backend: Arc<dyn WarehouseBackend>, logger: DynLogger) -> Self {
        Self { backend, logger }
    }

    /// Starts agents `RB-001..RB-{agent_count}`, each on its own tokio task.
    pub fn start(&self, agent_count: usize, settings: &AgentSettings) -> Fleet {
        let cancel = CancellationToken::new();
        let handles = (1..=agent_count)
            .map(|index| {
                let identity = AgentIdentity::numbered(index, settings.password.clone());
                let runtime = AgentRuntime::new(
                    identity,
                    settings.clone(),
                    self.backend.clone(),
                    self.logger.clone(),
                );
                self.spawn(runtime, cancel.child_token())
            })
            .collect();

        self.logger.info(&format!(
            "Started {} agents with interval {:?}",
            agent_count, settings.interval
        ));
        Fleet { cancel, handles }
    }

    /// Spawns an already-built runtime, for callers that need custom cursors or seeds.
    pub fn spawn(&self, runtime: AgentRuntime, cancel: CancellationToken) -> AgentHandle {
        let agent_id = runtime.agent_id().to_string();
        let task = tokio::spawn(runtime.run(cancel.clone()));
        AgentHandle { agent_id, cancel, task }
    }
}

/// Starts `agent_count` agents against the HTTP backend at `api_endpoint`.
pub fn start_http_fleet(
    api_endpoint: &str,
    agent_count: usize,
    interval: Duration,
    request_timeout: Duration,
    logger: DynLogger,
) -> Result<Fleet, TransportError> {
    let backend = HttpBackend::new(api_endpoint, request_timeout)?;
    let supervisor = FleetSupervisor::new(Arc::new(backend), logger);
    Ok(supervisor.start(agent_count, &AgentSettings::with_interval(interval)))
}
