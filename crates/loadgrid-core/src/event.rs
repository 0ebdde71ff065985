//! Structured events emitted by a balancer for an external sink.

use serde::{Deserialize, Serialize};

use crate::types::Address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BalancerEvent {
    /// A request was rejected by the admission filter.
    Blocked { address: Address },
    /// A unit was added; `units` is the new pool size.
    ScaleUp { units: usize },
    /// The newest unit was removed; `units` is the new pool size.
    ScaleDown { units: usize },
}

impl BalancerEvent {
    /// Human-readable one-liner for console reporters.
    pub fn describe(&self) -> String {
        match self {
            BalancerEvent::Blocked { address } => format!("blocked request from {address}"),
            BalancerEvent::ScaleUp { units } => format!("scaling up to {units} units"),
            BalancerEvent::ScaleDown { units } => format!("scaling down to {units} units"),
        }
    }
}
