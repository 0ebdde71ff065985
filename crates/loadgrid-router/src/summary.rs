//! End-of-run summary records.

use serde::{Deserialize, Serialize};

use loadgrid_balancer::BalancerStats;
use loadgrid_core::JobClass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancerSummary {
    pub class: JobClass,
    pub queue_depth_start: usize,
    pub stats: BalancerStats,
}

impl BalancerSummary {
    pub fn queue_depth_end(&self) -> usize {
        self.stats.queue_depth
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Steps executed in this run.
    pub ticks: u64,
    pub compute: BalancerSummary,
    pub stream: BalancerSummary,
}

impl RunSummary {
    pub fn balancers(&self) -> [&BalancerSummary; 2] {
        [&self.compute, &self.stream]
    }

    pub fn total_admitted(&self) -> u64 {
        self.balancers().iter().map(|b| b.stats.admitted).sum()
    }

    pub fn total_blocked(&self) -> u64 {
        self.balancers().iter().map(|b| b.stats.blocked).sum()
    }
}
