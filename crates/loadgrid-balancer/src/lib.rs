//! loadgrid-balancer: admission, dispatch, and autoscaling for one
//! pool of work units.
//!
//! # Tick
//!
//! ```text
//! Balancer::tick()
//!   1. dispatch   idle units (at tick start) take the queue head, FIFO
//!   2. advance    every unit burns one tick of remaining work
//!   3. rescale    cooldown > 0 → decrement, no action
//!                 depth > upper * units → add one unit
//!                 depth < lower * units and units > 1 → drop newest unit
//! ```
//!
//! Any scaling action arms a cooldown of `scaling_cooldown` ticks, which
//! together with the gap between the two thresholds keeps the pool from
//! oscillating.

pub mod admission;
pub mod balancer;
pub mod error;
pub mod queue;
pub mod unit;

pub use admission::{BLOCKED_PREFIXES, is_blocked};
pub use balancer::{Balancer, BalancerStats, EventCallback, ScaleDecision, ScalingPolicy, UnitStats};
pub use error::{BalancerError, BalancerResult};
pub use queue::DispatchQueue;
pub use unit::{UnitState, WorkUnit};
