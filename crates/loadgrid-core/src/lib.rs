//! loadgrid-core: shared types for the LoadGrid dispatch simulator.
//!
//! Holds the work item data model, the job classes used for routing,
//! the structured events balancers emit, and the `SimConfig` tuning
//! parameters (loadable from TOML).

pub mod config;
pub mod error;
pub mod event;
pub mod types;

pub use config::SimConfig;
pub use error::{ConfigError, ConfigResult};
pub use event::BalancerEvent;
pub use types::*;
