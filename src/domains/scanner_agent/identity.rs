use serde::Serialize;

pub const DEFAULT_PASSWORD: &str = "robotpassword123";
pub const CREDENTIAL_DOMAIN: &str = "robots.local";

/// Body of the login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    agent_id: String,
    credentials: Credentials,
}

impl AgentIdentity {
    /// Identity for the `index`-th agent of a fleet, 1-based: `RB-001`, `RB-002`, ...
    pub fn numbered(index: usize, password: impl Into<String>) -> Self {
        Self::new(format!("RB-{:03}", index), password)
    }

    pub fn new(agent_id: impl Into<String>, password: impl Into<String>) -> Self {
        let agent_id = agent_id.into();
        let credentials = Credentials {
            email: format!("{}@{}", agent_id.to_lowercase(), CREDENTIAL_DOMAIN),
            password: password.into(),
        };
        Self { agent_id, credentials }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
