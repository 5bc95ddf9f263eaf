//! Shared blocking HTTP agent.

use std::time::Duration;

use ureq::Agent;

/// Agent used for all outgoing requests of a run.
pub fn build_agent(timeout: Duration) -> Agent {
    let config = Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    Agent::new_with_config(config)
}
