//! Router: classifies work items by job class and drives both
//! balancers through simulated time.

use tracing::{debug, info};

use loadgrid_balancer::{Balancer, BalancerResult, EventCallback, ScalingPolicy};
use loadgrid_core::{JobClass, SimConfig, WorkItem};

use crate::summary::{BalancerSummary, RunSummary};
use crate::traffic::TrafficSource;

/// Queue depth of each balancer at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueDepths {
    pub compute: usize,
    pub stream: usize,
}

pub struct Router {
    compute: Balancer,
    stream: Balancer,
    initial_units: usize,
    initial_queue_multiplier: usize,
    /// Steps executed since construction.
    ticks: u64,
}

impl Router {
    /// Create a router whose balancers each start with `initial_units`.
    pub fn new(initial_units: usize, config: &SimConfig) -> BalancerResult<Self> {
        config.validate()?;
        let policy = ScalingPolicy::from(config);

        Ok(Self {
            compute: Balancer::new(JobClass::Compute.label(), initial_units, policy)?,
            stream: Balancer::new(JobClass::Stream.label(), initial_units, policy)?,
            initial_units,
            initial_queue_multiplier: config.initial_queue_multiplier,
            ticks: 0,
        })
    }

    /// Register one event callback on both balancers.
    pub fn with_event_fn(self, f: EventCallback) -> Self {
        Self {
            compute: self.compute.with_event_fn(f.clone()),
            stream: self.stream.with_event_fn(f),
            ..self
        }
    }

    pub fn initial_units(&self) -> usize {
        self.initial_units
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn balancer(&self, class: JobClass) -> &Balancer {
        match class {
            JobClass::Compute => &self.compute,
            JobClass::Stream => &self.stream,
        }
    }

    fn balancer_mut(&mut self, class: JobClass) -> &mut Balancer {
        match class {
            JobClass::Compute => &mut self.compute,
            JobClass::Stream => &mut self.stream,
        }
    }

    /// Forward an item to the balancer for its job class.
    pub fn route(&mut self, item: WorkItem) {
        self.balancer_mut(item.class).admit(item);
    }

    /// Tick `compute`, then `stream`.
    pub fn step(&mut self) {
        let compute = self.compute.tick();
        let stream = self.stream.tick();
        self.ticks += 1;
        debug!(tick = self.ticks, ?compute, ?stream, "step complete");
    }

    /// Route one tick's arrivals from `traffic`, then step.
    pub fn advance(&mut self, traffic: &mut dyn TrafficSource) {
        for item in traffic.arrivals() {
            self.route(item);
        }
        self.step();
    }

    /// Fill each balancer with `initial_units * initial_queue_multiplier`
    /// items of its own class. Items still pass the admission filter.
    pub fn seed_backlog(&mut self, traffic: &mut dyn TrafficSource) {
        let per_class = self
            .initial_units
            .saturating_mul(self.initial_queue_multiplier);
        for class in JobClass::ALL {
            for _ in 0..per_class {
                let item = traffic.item(class);
                self.route(item);
            }
        }
        let depths = self.queue_depths();
        info!(
            per_class,
            compute = depths.compute,
            stream = depths.stream,
            "initial backlog seeded"
        );
    }

    pub fn queue_depths(&self) -> QueueDepths {
        QueueDepths {
            compute: self.compute.queue_depth(),
            stream: self.stream.queue_depth(),
        }
    }

    /// Run for exactly `ticks` steps, pulling arrivals from `traffic`.
    pub fn run(&mut self, ticks: u64, traffic: &mut dyn TrafficSource) -> RunSummary {
        let start = self.queue_depths();
        let first = self.ticks;
        info!(ticks, units = self.initial_units, "simulation started");

        for _ in 0..ticks {
            self.advance(traffic);
        }

        let summary = self.summary(start, self.ticks - first);
        info!(
            ticks,
            admitted = summary.total_admitted(),
            blocked = summary.total_blocked(),
            "simulation finished"
        );
        summary
    }

    /// Summarise both balancers against the depths recorded at run start.
    pub fn summary(&self, start: QueueDepths, ticks: u64) -> RunSummary {
        RunSummary {
            ticks,
            compute: BalancerSummary {
                class: JobClass::Compute,
                queue_depth_start: start.compute,
                stats: self.compute.snapshot(),
            },
            stream: BalancerSummary {
                class: JobClass::Stream,
                queue_depth_start: start.stream,
                stats: self.stream.snapshot(),
            },
        }
    }
}
