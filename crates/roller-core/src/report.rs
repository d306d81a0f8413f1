//! Run summary — before/after membership snapshots and elapsed time.
//!
//! No decision logic; pure read-and-format for the operator.

use std::fmt::Write as _;
use std::time::Duration;

use crate::capacity::CapacityOutcome;
use crate::drain::DrainOutcome;

/// Per-instance outcome recorded by the rotation controller.
#[derive(Debug, Clone)]
pub struct NodeOutcome {
    pub instance_id: String,
    /// `None` when no cluster was configured.
    pub drain: Option<DrainOutcome>,
    pub capacity: CapacityOutcome,
}

/// Everything the operator needs to know about one rotation run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// In-service members per subgroup when the run started.
    pub before: Vec<Vec<String>>,
    /// In-service members per subgroup when the run finished.
    pub after: Vec<Vec<String>>,
    pub outcomes: Vec<NodeOutcome>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Render the human-readable report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("--------------------\n");
        let _ = writeln!(out, "Original instances: {:?}", self.before);
        let _ = writeln!(out, "Final instances: {:?}", self.after);
        for outcome in &self.outcomes {
            let _ = writeln!(out, "  {}: {}", outcome.instance_id, describe(outcome));
        }
        let _ = writeln!(out, "Total time: {}", format_hms(self.elapsed));
        out.push_str("Done!");
        out
    }
}

fn describe(outcome: &NodeOutcome) -> String {
    let mut parts = Vec::new();
    match outcome.drain {
        Some(DrainOutcome::Drained) => parts.push("drained".to_string()),
        Some(DrainOutcome::TimedOut { remaining_tasks }) => {
            parts.push(format!("drain timed out ({remaining_tasks} tasks remaining)"));
        }
        None => {}
    }
    match outcome.capacity {
        CapacityOutcome::Healthy => parts.push("replaced".to_string()),
        CapacityOutcome::DeadlineExceeded => parts.push("replacement unconfirmed".to_string()),
    }
    parts.join(", ")
}

fn format_hms(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_elapsed_as_hms() {
        assert_eq!(format_hms(Duration::from_secs(0)), "0:00:00");
        assert_eq!(format_hms(Duration::from_secs(61)), "0:01:01");
        assert_eq!(format_hms(Duration::from_secs(3723)), "1:02:03");
    }

    #[test]
    fn render_lists_memberships_and_outcomes() {
        let summary = RunSummary {
            before: vec![vec!["i-1".to_string(), "i-2".to_string()]],
            after: vec![vec!["i-3".to_string(), "i-4".to_string()]],
            outcomes: vec![
                NodeOutcome {
                    instance_id: "i-1".to_string(),
                    drain: Some(DrainOutcome::Drained),
                    capacity: CapacityOutcome::Healthy,
                },
                NodeOutcome {
                    instance_id: "i-2".to_string(),
                    drain: Some(DrainOutcome::TimedOut { remaining_tasks: 3 }),
                    capacity: CapacityOutcome::DeadlineExceeded,
                },
            ],
            elapsed: Duration::from_secs(323),
        };

        let rendered = summary.render();
        assert!(rendered.contains("Original instances: [[\"i-1\", \"i-2\"]]"));
        assert!(rendered.contains("Final instances: [[\"i-3\", \"i-4\"]]"));
        assert!(rendered.contains("i-1: drained, replaced"));
        assert!(rendered.contains("i-2: drain timed out (3 tasks remaining), replacement unconfirmed"));
        assert!(rendered.contains("Total time: 0:05:23"));
        assert!(rendered.ends_with("Done!"));
    }

    #[test]
    fn render_without_drain_step() {
        let summary = RunSummary {
            before: vec![vec!["i-1".to_string()]],
            after: vec![vec!["i-9".to_string()]],
            outcomes: vec![NodeOutcome {
                instance_id: "i-1".to_string(),
                drain: None,
                capacity: CapacityOutcome::Healthy,
            }],
            elapsed: Duration::from_secs(5),
        };
        assert!(summary.render().contains("i-1: replaced"));
    }
}
