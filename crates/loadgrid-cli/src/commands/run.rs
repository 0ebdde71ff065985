use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use loadgrid_balancer::EventCallback;
use loadgrid_core::BalancerEvent;
use loadgrid_router::{RandomTraffic, Router, RunSummary};

use crate::report::{self, EventRecord, RunReport};

pub struct RunArgs {
    pub units: Option<usize>,
    pub ticks: Option<u64>,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub format: String,
    pub pace_ms: u64,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = super::config::load(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    // Prompts go to stderr so stdout carries only the report.
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();
    let units = match args.units {
        Some(units) => units,
        None => prompt(&mut input, &mut output, "Servers")?,
    };
    let ticks = match args.ticks {
        Some(ticks) => ticks,
        None => prompt(&mut input, &mut output, "Simulation time")?,
    };
    let json = args.format == "json";

    // Text mode prints events as they happen; JSON mode collects them.
    let events: Arc<Mutex<Vec<EventRecord>>> = Arc::new(Mutex::new(Vec::new()));
    let on_event: EventCallback = if json {
        let sink = events.clone();
        Arc::new(move |name: &str, event: &BalancerEvent| {
            if let Ok(mut events) = sink.lock() {
                events.push(EventRecord {
                    balancer: name.to_string(),
                    event: event.clone(),
                });
            }
        })
    } else {
        Arc::new(|name: &str, event: &BalancerEvent| println!("[{name}] {}", event.describe()))
    };

    let mut router = Router::new(units, &config)?.with_event_fn(on_event);
    let mut traffic = RandomTraffic::from_config(&config);
    router.seed_backlog(&mut traffic);

    let summary = if args.pace_ms > 0 {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(run_paced(
                &mut router,
                &mut traffic,
                ticks,
                Duration::from_millis(args.pace_ms),
            ))
    } else {
        router.run(ticks, &mut traffic)
    };

    if json {
        let events = events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default();
        let report = RunReport {
            config,
            events,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report::format_summary(&summary));
    }

    Ok(())
}

/// Step once per `pace` until `ticks` steps have run or Ctrl-C arrives.
async fn run_paced(
    router: &mut Router,
    traffic: &mut RandomTraffic,
    ticks: u64,
    pace: Duration,
) -> RunSummary {
    let start = router.queue_depths();
    let first = router.ticks();
    let mut interval = tokio::time::interval(pace);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!(ticks, pace_ms = pace.as_millis() as u64, "paced run started");

    while router.ticks() - first < ticks {
        tokio::select! {
            _ = interval.tick() => router.advance(traffic),
            _ = &mut ctrl_c => {
                info!(completed = router.ticks() - first, "interrupted, stopping early");
                break;
            }
        }
    }

    router.summary(start, router.ticks() - first)
}

/// Ask for a value on `output` and parse one line of `input`.
fn prompt<T>(input: &mut impl BufRead, output: &mut impl Write, label: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("failed to read {label}"))?;
    line.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid {label} {:?}: {e}", line.trim()))
}
