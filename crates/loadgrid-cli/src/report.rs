//! Console and JSON rendering of run results.

use serde::Serialize;

use loadgrid_core::{BalancerEvent, SimConfig};
use loadgrid_router::{BalancerSummary, RunSummary};

/// One event as delivered to the reporter.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub balancer: String,
    #[serde(flatten)]
    pub event: BalancerEvent,
}

/// Full JSON document for `--format json`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub config: SimConfig,
    pub events: Vec<EventRecord>,
    pub summary: RunSummary,
}

pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("\nSimulation Complete\n");
    out.push_str(&format!("Ticks: {}\n", summary.ticks));
    out.push_str(&format!(
        "Total Requests: {}  Blocked Requests: {}\n",
        summary.total_admitted(),
        summary.total_blocked()
    ));

    for side in summary.balancers() {
        out.push('\n');
        out.push_str(&format_balancer(side));
    }

    out
}

fn format_balancer(side: &BalancerSummary) -> String {
    let stats = &side.stats;
    let mut out = String::new();

    out.push_str(&format!("[{}]\n", side.class));
    out.push_str(&format!("  Admitted:       {}\n", stats.admitted));
    out.push_str(&format!("  Blocked:        {}\n", stats.blocked));
    out.push_str(&format!("  Final Servers:  {}\n", stats.unit_count()));
    out.push_str(&format!(
        "  Queue:          {} → {}\n",
        side.queue_depth_start, stats.queue_depth
    ));
    out.push_str(&format!("  Processed:      {}\n", stats.total_processed()));
    if stats.discarded > 0 {
        out.push_str(&format!("  Discarded:      {}\n", stats.discarded));
    }
    for unit in &stats.units {
        let state = if unit.busy { "busy" } else { "idle" };
        out.push_str(&format!(
            "    server {:>3}: {:>6} processed ({state})\n",
            unit.id, unit.processed
        ));
    }

    out
}
