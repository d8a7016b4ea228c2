//! Iterative agent: planning prompt, parsed model output, and the
//! bounded execution loop.

pub mod executor;
pub mod output;
pub mod prompt;

pub use executor::AgentExecutor;
pub use output::{AgentOutput, AgentRunResult, AgentStep, Observation, Source};
pub use prompt::build_agent_system_prompt;
