//! Work item data model shared across LoadGrid crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dotted-quad address token (e.g. `"10.0.0.5"`). Not validated beyond
/// the admission filter's prefix check.
pub type Address = String;

/// Identity of a work unit within a single balancer.
pub type UnitId = u32;

/// Traffic category used by the router to pick a balancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobClass {
    Compute,
    Stream,
}

impl JobClass {
    /// Both classes, in routing order.
    pub const ALL: [JobClass; 2] = [JobClass::Compute, JobClass::Stream];

    pub fn label(&self) -> &'static str {
        match self {
            JobClass::Compute => "compute",
            JobClass::Stream => "stream",
        }
    }
}

impl fmt::Display for JobClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single request. Immutable once created; consumed by exactly one
/// work unit and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub origin: Address,
    pub destination: Address,
    /// Ticks of processing required. Always at least 1.
    pub duration: u32,
    pub class: JobClass,
}

impl WorkItem {
    pub fn new(
        origin: impl Into<Address>,
        destination: impl Into<Address>,
        duration: u32,
        class: JobClass,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            duration: duration.max(1),
            class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_raised_to_one() {
        let item = WorkItem::new("1.2.3.4", "5.6.7.8", 0, JobClass::Compute);
        assert_eq!(item.duration, 1);
    }

    #[test]
    fn job_class_labels() {
        assert_eq!(JobClass::Compute.to_string(), "compute");
        assert_eq!(JobClass::Stream.label(), "stream");
        assert_eq!(JobClass::ALL, [JobClass::Compute, JobClass::Stream]);
    }
}
