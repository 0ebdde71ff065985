//! Balancer: owns a dispatch queue and a resizable pool of work units.
//!
//! Each `tick()` dispatches queued items to units that were idle at the
//! start of the tick, advances every unit by one step, and evaluates
//! the autoscaling policy. Scaling actions and blocked requests are
//! reported through an optional event callback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use loadgrid_core::{BalancerEvent, SimConfig, UnitId, WorkItem};

use crate::admission::is_blocked;
use crate::error::{BalancerError, BalancerResult};
use crate::queue::DispatchQueue;
use crate::unit::WorkUnit;

/// Callback type for delivering events to an external sink.
///
/// Called with (balancer name, event).
pub type EventCallback = Arc<dyn Fn(&str, &BalancerEvent) + Send + Sync>;

/// Hysteresis band and cooldown for one balancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingPolicy {
    /// Scale down below `lower_threshold` queued items per unit.
    pub lower_threshold: usize,
    /// Scale up above `upper_threshold` queued items per unit.
    pub upper_threshold: usize,
    /// Ticks with no scaling action after any scaling action.
    pub cooldown: u32,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        Self::from(&SimConfig::default())
    }
}

impl From<&SimConfig> for ScalingPolicy {
    fn from(config: &SimConfig) -> Self {
        Self {
            lower_threshold: config.lower_threshold,
            upper_threshold: config.upper_threshold,
            cooldown: config.scaling_cooldown,
        }
    }
}

/// Outcome of the rescale step of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDecision {
    /// A unit was added; holds the new unit count.
    Up(usize),
    /// The newest unit was removed; holds the new unit count.
    Down(usize),
    /// Cooldown was active; holds the ticks left after this one.
    CoolingDown(u32),
    /// Policy evaluated, no change needed.
    NoChange,
}

/// Per-unit view inside a [`BalancerStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub id: UnitId,
    pub busy: bool,
    pub processed: u64,
}

/// Read-only snapshot of a balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancerStats {
    pub admitted: u64,
    pub blocked: u64,
    pub queue_depth: usize,
    pub cooldown_remaining: u32,
    pub units: Vec<UnitStats>,
    /// Completions by units that have since been scaled away.
    pub retired_processed: u64,
    /// In-flight items lost when a busy unit was scaled away.
    pub discarded: u64,
}

impl BalancerStats {
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn busy_units(&self) -> usize {
        self.units.iter().filter(|u| u.busy).count()
    }

    /// Completions across current and retired units.
    pub fn total_processed(&self) -> u64 {
        self.retired_processed + self.units.iter().map(|u| u.processed).sum::<u64>()
    }
}

pub struct Balancer {
    name: String,
    policy: ScalingPolicy,
    queue: DispatchQueue,
    /// Growth order; scale-down always pops the tail.
    units: Vec<WorkUnit>,
    next_unit_id: UnitId,
    admitted: u64,
    blocked: u64,
    cooldown_remaining: u32,
    retired_processed: u64,
    discarded: u64,
    on_event: Option<EventCallback>,
}

impl Balancer {
    /// Create a balancer with `initial_units` idle units.
    ///
    /// Fails if `initial_units` is zero.
    pub fn new(
        name: impl Into<String>,
        initial_units: usize,
        policy: ScalingPolicy,
    ) -> BalancerResult<Self> {
        let name = name.into();
        if initial_units == 0 {
            return Err(BalancerError::EmptyPool(name));
        }

        let units: Vec<WorkUnit> = (0..initial_units as UnitId).map(WorkUnit::new).collect();
        debug!(balancer = %name, units = units.len(), "balancer created");

        Ok(Self {
            name,
            policy,
            queue: DispatchQueue::new(),
            next_unit_id: units.len() as UnitId,
            units,
            admitted: 0,
            blocked: 0,
            cooldown_remaining: 0,
            retired_processed: 0,
            discarded: 0,
            on_event: None,
        })
    }

    /// Set the callback that receives blocked/scale events.
    pub fn with_event_fn(mut self, f: EventCallback) -> Self {
        self.on_event = Some(f);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> ScalingPolicy {
        self.policy
    }

    /// Filter and enqueue an incoming item. Never fails: blocked items
    /// are dropped and counted.
    pub fn admit(&mut self, item: WorkItem) {
        if is_blocked(&item.origin) {
            self.blocked += 1;
            debug!(balancer = %self.name, origin = %item.origin, "request blocked");
            self.emit(BalancerEvent::Blocked {
                address: item.origin,
            });
            return;
        }

        debug!(
            balancer = %self.name,
            origin = %item.origin,
            duration = item.duration,
            "request admitted"
        );
        self.queue.push(item);
        self.admitted += 1;
    }

    /// Advance the balancer by one time-step.
    pub fn tick(&mut self) -> ScaleDecision {
        // Sampled before dispatch: 1 unit with 81 queued items must scale
        // up, which only holds on the pre-dispatch depth (81 > 80).
        let depth = self.queue.len();
        self.dispatch();
        for unit in &mut self.units {
            unit.advance();
        }
        self.rescale(depth)
    }

    fn dispatch(&mut self) {
        for unit in self.units.iter_mut().filter(|u| !u.is_busy()) {
            let Some(item) = self.queue.pop_front() else {
                break;
            };
            unit.assign(&item);
        }
    }

    fn rescale(&mut self, depth: usize) -> ScaleDecision {
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
            return ScaleDecision::CoolingDown(self.cooldown_remaining);
        }

        let n = self.units.len();
        if depth > self.policy.upper_threshold.saturating_mul(n) {
            self.units.push(WorkUnit::new(self.next_unit_id));
            self.next_unit_id += 1;
            self.cooldown_remaining = self.policy.cooldown;
            let units = self.units.len();
            info!(balancer = %self.name, depth, from = n, to = units, "scaling up");
            self.emit(BalancerEvent::ScaleUp { units });
            return ScaleDecision::Up(units);
        }

        if depth < self.policy.lower_threshold.saturating_mul(n) && n > 1 {
            if let Some(removed) = self.units.pop() {
                self.retired_processed += removed.total_processed();
                if removed.is_busy() {
                    self.discarded += 1;
                    warn!(
                        balancer = %self.name,
                        unit = removed.id(),
                        remaining = removed.remaining(),
                        "in-flight item discarded by scale-down"
                    );
                }
            }
            self.cooldown_remaining = self.policy.cooldown;
            let units = self.units.len();
            info!(balancer = %self.name, depth, from = n, to = units, "scaling down");
            self.emit(BalancerEvent::ScaleDown { units });
            return ScaleDecision::Down(units);
        }

        ScaleDecision::NoChange
    }

    fn emit(&self, event: BalancerEvent) {
        if let Some(ref on_event) = self.on_event {
            on_event(&self.name, &event);
        }
    }

    pub fn snapshot(&self) -> BalancerStats {
        BalancerStats {
            admitted: self.admitted,
            blocked: self.blocked,
            queue_depth: self.queue.len(),
            cooldown_remaining: self.cooldown_remaining,
            units: self
                .units
                .iter()
                .map(|u| UnitStats {
                    id: u.id(),
                    busy: u.is_busy(),
                    processed: u.total_processed(),
                })
                .collect(),
            retired_processed: self.retired_processed,
            discarded: self.discarded,
        }
    }

    pub fn queue_depth(&self) -> usize {
        self.queue.len()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn units(&self) -> &[WorkUnit] {
        &self.units
    }

    pub fn queue(&self) -> &DispatchQueue {
        &self.queue
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadgrid_core::JobClass;
    use std::sync::Mutex;

    fn item(origin: &str, duration: u32) -> WorkItem {
        WorkItem::new(origin, "9.9.9.9", duration, JobClass::Compute)
    }

    fn balancer(units: usize) -> Balancer {
        Balancer::new("test", units, ScalingPolicy::default()).unwrap()
    }

    /// Policy that never scales, to observe dispatch in isolation.
    fn steady(units: usize) -> Balancer {
        let policy = ScalingPolicy {
            lower_threshold: 0,
            upper_threshold: 1000,
            cooldown: 0,
        };
        Balancer::new("steady", units, policy).unwrap()
    }

    fn preload(lb: &mut Balancer, count: usize, duration: u32) {
        for i in 0..count {
            lb.admit(item(&format!("8.8.{}.{}", i / 256, i % 256), duration));
        }
    }

    fn recording(lb: Balancer) -> (Balancer, Arc<Mutex<Vec<BalancerEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let lb = lb.with_event_fn(Arc::new(move |_: &str, e: &BalancerEvent| {
            sink.lock().unwrap().push(e.clone());
        }));
        (lb, events)
    }

    #[test]
    fn zero_units_rejected() {
        let err = Balancer::new("empty", 0, ScalingPolicy::default()).err();
        assert!(matches!(err, Some(BalancerError::EmptyPool(name)) if name == "empty"));
    }

    #[test]
    fn blocked_address_counted_not_queued() {
        let (mut lb, events) = recording(balancer(2));
        lb.admit(item("10.0.0.5", 3));

        let stats = lb.snapshot();
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.admitted, 0);
        assert_eq!(stats.queue_depth, 0);
        assert_eq!(
            *events.lock().unwrap(),
            vec![BalancerEvent::Blocked {
                address: "10.0.0.5".to_string()
            }]
        );
    }

    #[test]
    fn admitted_address_queued() {
        let mut lb = balancer(2);
        lb.admit(item("8.8.8.8", 3));
        lb.admit(item("192.168.1.1", 3));
        lb.admit(item("1.1.1.1", 3));

        let stats = lb.snapshot();
        assert_eq!(stats.admitted, 2);
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.queue_depth, 2);
    }

    #[test]
    fn scale_up_when_backlog_exceeds_upper_threshold() {
        let (mut lb, events) = recording(balancer(1));
        preload(&mut lb, 81, 1);

        let decision = lb.tick();

        assert_eq!(decision, ScaleDecision::Up(2));
        assert_eq!(lb.queue_depth(), 80);
        assert_eq!(lb.unit_count(), 2);
        assert_eq!(lb.cooldown_remaining(), 50);
        // Unit 0 took one item and finished it within the tick.
        assert_eq!(lb.units()[0].total_processed(), 1);
        assert!(!lb.units()[1].is_busy());
        assert_eq!(lb.units()[1].id(), 1);
        assert_eq!(
            *events.lock().unwrap(),
            vec![BalancerEvent::ScaleUp { units: 2 }]
        );
    }

    #[test]
    fn no_scale_up_at_exact_upper_threshold() {
        let mut lb = balancer(1);
        preload(&mut lb, 80, 5);
        assert_eq!(lb.tick(), ScaleDecision::NoChange);
        assert_eq!(lb.unit_count(), 1);
        assert_eq!(lb.cooldown_remaining(), 0);
    }

    #[test]
    fn scale_down_discards_in_flight_item() {
        let (mut lb, events) = recording(balancer(3));
        preload(&mut lb, 10, 5);

        let decision = lb.tick();

        assert_eq!(decision, ScaleDecision::Down(2));
        assert_eq!(lb.unit_count(), 2);
        assert_eq!(lb.cooldown_remaining(), 50);
        // Three items were dispatched; the one on the removed unit is gone.
        assert_eq!(lb.queue_depth(), 7);
        let stats = lb.snapshot();
        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.total_processed(), 0);
        assert_eq!(
            *events.lock().unwrap(),
            vec![BalancerEvent::ScaleDown { units: 2 }]
        );
    }

    #[test]
    fn never_scales_below_one_unit() {
        let mut lb = balancer(1);
        for _ in 0..200 {
            assert_ne!(lb.tick(), ScaleDecision::Down(0));
        }
        assert_eq!(lb.unit_count(), 1);
    }

    #[test]
    fn cooldown_blocks_scaling_for_exactly_cooldown_ticks() {
        let policy = ScalingPolicy {
            cooldown: 5,
            ..ScalingPolicy::default()
        };
        let mut lb = Balancer::new("cd", 4, policy).unwrap();

        // Empty queue with 4 units: scale down every time policy is evaluated.
        assert_eq!(lb.tick(), ScaleDecision::Down(3));
        for left in (0..5).rev() {
            assert_eq!(lb.tick(), ScaleDecision::CoolingDown(left));
            assert_eq!(lb.unit_count(), 3);
        }
        assert_eq!(lb.tick(), ScaleDecision::Down(2));
    }

    #[test]
    fn zero_cooldown_allows_consecutive_actions() {
        let policy = ScalingPolicy {
            cooldown: 0,
            ..ScalingPolicy::default()
        };
        let mut lb = Balancer::new("fast", 3, policy).unwrap();
        assert_eq!(lb.tick(), ScaleDecision::Down(2));
        assert_eq!(lb.tick(), ScaleDecision::Down(1));
        assert_eq!(lb.tick(), ScaleDecision::NoChange);
    }

    #[test]
    fn dispatch_preserves_arrival_order() {
        let mut lb = steady(2);
        for d in [3, 1, 4, 1, 5] {
            lb.admit(item("8.8.8.8", d));
        }

        lb.tick();
        // Heads (3, 1) went to units 0 and 1; the rest stay in order.
        let rest: Vec<u32> = lb.queue().iter().map(|i| i.duration).collect();
        assert_eq!(rest, vec![4, 1, 5]);
        assert!(lb.units()[0].is_busy());
        assert!(!lb.units()[1].is_busy());
        assert_eq!(lb.units()[1].total_processed(), 1);
    }

    #[test]
    fn freed_unit_not_redispatched_same_tick() {
        let mut lb = steady(1);
        lb.admit(item("8.8.8.8", 1));
        lb.admit(item("8.8.4.4", 1));

        lb.tick();
        assert!(!lb.units()[0].is_busy());
        assert_eq!(lb.queue_depth(), 1);

        lb.tick();
        assert_eq!(lb.queue_depth(), 0);
        assert_eq!(lb.units()[0].total_processed(), 2);
    }

    #[test]
    fn unit_ids_are_not_reused_after_scale_down() {
        let policy = ScalingPolicy {
            cooldown: 0,
            ..ScalingPolicy::default()
        };
        let mut lb = Balancer::new("ids", 2, policy).unwrap();
        assert_eq!(lb.tick(), ScaleDecision::Down(1));

        preload(&mut lb, 81, 10);
        assert_eq!(lb.tick(), ScaleDecision::Up(2));
        let ids: Vec<UnitId> = lb.units().iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn huge_thresholds_saturate_instead_of_overflowing() {
        let config = SimConfig::from_toml_str(&format!(
            "lower_threshold = {}\nupper_threshold = {}\nscaling_cooldown = 0\n",
            i64::MAX - 1,
            i64::MAX
        ))
        .unwrap();
        let mut lb = Balancer::new("huge", 3, ScalingPolicy::from(&config)).unwrap();
        preload(&mut lb, 100, 5);

        // Threshold times unit count saturates: never above upper, always below lower.
        assert_eq!(lb.tick(), ScaleDecision::Down(2));
        assert_eq!(lb.tick(), ScaleDecision::Down(1));
        assert_eq!(lb.tick(), ScaleDecision::NoChange);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut lb = balancer(1);
        lb.admit(item("8.8.8.8", 2));
        lb.tick();

        let json = serde_json::to_value(lb.snapshot()).unwrap();
        assert_eq!(json["admitted"], 1);
        assert_eq!(json["units"][0]["busy"], true);
        assert_eq!(json["queue_depth"], 0);
    }
}
