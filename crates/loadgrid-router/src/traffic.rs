//! Traffic generation.
//!
//! The router never draws randomness itself: it pulls items from a
//! [`TrafficSource`]. `RandomTraffic` is the default uniform load
//! generator; tests plug in scripted sources.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use loadgrid_core::{Address, JobClass, SimConfig, WorkItem};

pub trait TrafficSource {
    /// Produce one item of the given class (used to seed backlogs).
    fn item(&mut self, class: JobClass) -> WorkItem;

    /// Items arriving during one tick, in arrival order.
    fn arrivals(&mut self) -> Vec<WorkItem>;
}

/// Uniform random traffic: random dotted-quad addresses, duration in
/// `1..=max_process_time`, and an independent draw per job class each
/// tick, arriving with probability `1 / arrival_one_in`.
pub struct RandomTraffic {
    rng: StdRng,
    max_process_time: u32,
    arrival_one_in: u32,
}

impl RandomTraffic {
    pub fn new(seed: Option<u64>, max_process_time: u32, arrival_one_in: u32) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            max_process_time: max_process_time.max(1),
            arrival_one_in: arrival_one_in.max(1),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.seed, config.max_process_time, config.arrival_one_in)
    }

    fn address(&mut self) -> Address {
        let [a, b, c, d] = self.rng.r#gen::<u32>().to_be_bytes();
        format!("{a}.{b}.{c}.{d}")
    }
}

impl TrafficSource for RandomTraffic {
    fn item(&mut self, class: JobClass) -> WorkItem {
        let origin = self.address();
        let destination = self.address();
        let duration = self.rng.gen_range(1..=self.max_process_time);
        WorkItem::new(origin, destination, duration, class)
    }

    fn arrivals(&mut self) -> Vec<WorkItem> {
        let mut items = Vec::new();
        for class in JobClass::ALL {
            if self.rng.gen_range(0..self.arrival_one_in) == 0 {
                items.push(self.item(class));
            }
        }
        items
    }
}
