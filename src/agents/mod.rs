//! Agents module - supervisor and tool-using workers.
//!
//! # Agent Types
//! - **ToolAgent**: runs an LLM loop with its own tools until it answers
//! - **Supervisor**: hands the conversation to one agent at a time via
//!   `transfer_to_<agent>` tools and answers the user at the end

mod supervisor;
mod types;
mod worker;

pub use supervisor::Supervisor;
pub use types::{AgentError, AgentUpdate, Transcript};
pub use worker::ToolAgent;

/// Default cap on LLM calls per agent run.
pub const DEFAULT_MAX_ITERATIONS: usize = 25;
