//! loadgrid-router: partitions traffic across two balancers by job class.
//!
//! # Architecture
//!
//! ```text
//! Router
//!   ├── TrafficSource (injected: RandomTraffic or a scripted source)
//!   ├── compute: Balancer   ← JobClass::Compute
//!   └── stream:  Balancer   ← JobClass::Stream
//! ```
//!
//! Each step routes the tick's arrivals, then ticks `compute` and
//! `stream` in that order. The two balancers share no state.

pub mod router;
pub mod summary;
pub mod traffic;

pub use router::{QueueDepths, Router};
pub use summary::{BalancerSummary, RunSummary};
pub use traffic::{RandomTraffic, TrafficSource};
