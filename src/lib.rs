//! # wayfarer
//!
//! A supervisor agent that answers location questions by delegating to two
//! worker agents.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────┐
//!                 │      Supervisor      │
//!                 │ (transfer_to_* tools)│
//!                 └──────┬────────┬──────┘
//!                        │        │
//!              ┌─────────▼──┐  ┌──▼───────────┐
//!              │  research  │  │   locater    │
//!              │  web_search│  │  get_places  │
//!              └────────────┘  └──────┬───────┘
//!                                     ▼
//!                             Places text search
//! ```
//!
//! ## Modules
//! - `places`: nearby-places lookup against the places text search API
//! - `tools`: tools the agents can call (`get_places`, `web_search`)
//! - `llm`: chat completions client
//! - `agents`: tool-using agents and the supervisor
//! - `assistant`: wiring of the whole system from `Config`
//! - `render`: terminal output of supervisor updates

pub mod agents;
pub mod assistant;
pub mod config;
pub mod llm;
pub mod places;
pub mod prompts;
pub mod render;
pub mod tools;

pub use assistant::Assistant;
pub use config::Config;
pub use places::{LookupResult, PlaceRecord, PlacesClient, PlacesError, PlacesLookup};
