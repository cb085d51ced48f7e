//! Summary counts for provisioning runs

use hookwright_engine::{LinkStatus, ProvisionReport};
use owo_colors::OwoColorize;

/// Per-status link counts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    created: usize,
    corrected: usize,
    unchanged: usize,
    conflicts: usize,
}

impl LinkStats {
    /// Tally the outcomes of a provisioning run
    pub fn from_report(report: &ProvisionReport) -> Self {
        let mut stats = Self::default();
        for outcome in &report.outcomes {
            match outcome.status {
                LinkStatus::Created => stats.created += 1,
                LinkStatus::Corrected { .. } => stats.corrected += 1,
                LinkStatus::Unchanged => stats.unchanged += 1,
                LinkStatus::Conflict { .. } => stats.conflicts += 1,
            }
        }
        stats
    }

    /// Links created from nothing
    pub fn created(&self) -> usize {
        self.created
    }

    /// Links repointed at the canonical target
    pub fn corrected(&self) -> usize {
        self.corrected
    }

    /// Links that were already correct
    pub fn unchanged(&self) -> usize {
        self.unchanged
    }

    /// Locations occupied by something other than a symlink
    pub fn conflicts(&self) -> usize {
        self.conflicts
    }

    /// Links that were (or would be) written
    pub fn changed(&self) -> usize {
        self.created + self.corrected
    }

    /// Print a one-line summary, with a breakdown for mixed runs
    pub fn print_summary(&self, dry_run: bool) {
        let changed = self.changed();

        if dry_run {
            println!(
                "{} {} would be linked",
                "●".bright_green(),
                changed.to_string().bright_white().bold()
            );
        } else if self.conflicts > 0 {
            println!(
                "{} {} linked | {} {} conflict(s)",
                "●".bright_green(),
                changed.to_string().bright_green().bold(),
                "●".bright_red(),
                self.conflicts.to_string().bright_red().bold(),
            );
        } else if changed == 0 {
            println!("{} All links up to date", "●".bright_green());
        } else {
            println!(
                "{} {} linked",
                "●".bright_green(),
                changed.to_string().bright_green().bold()
            );
        }

        // Show breakdown when the run was mixed
        if self.corrected > 0 || (changed > 0 && self.unchanged > 0) {
            let mut parts = Vec::new();
            if self.created > 0 {
                parts.push(format!("{} created", self.created));
            }
            if self.corrected > 0 {
                parts.push(format!("{} corrected", self.corrected));
            }
            if self.unchanged > 0 {
                parts.push(format!("{} unchanged", self.unchanged));
            }
            println!("  {}", parts.join(", ").dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use hookwright_engine::{AbsPath, LinkOutcome};

    fn outcome(status: LinkStatus) -> LinkOutcome {
        LinkOutcome {
            link: AbsPath::new("/i/link".into()).unwrap(),
            target: AbsPath::new("/s/target".into()).unwrap(),
            status,
        }
    }

    #[test]
    fn test_tally() {
        let report = ProvisionReport {
            outcomes: vec![
                outcome(LinkStatus::Created),
                outcome(LinkStatus::Unchanged),
                outcome(LinkStatus::Corrected {
                    previous: "/old".into(),
                }),
                outcome(LinkStatus::Conflict { found: "file" }),
            ],
        };

        let stats = LinkStats::from_report(&report);
        assert_eq!(stats.created(), 1);
        assert_eq!(stats.corrected(), 1);
        assert_eq!(stats.unchanged(), 1);
        assert_eq!(stats.conflicts(), 1);
        assert_eq!(stats.changed(), 2);
    }

    #[test]
    fn test_empty_report() {
        let stats = LinkStats::from_report(&ProvisionReport::default());
        assert_eq!(stats, LinkStats::default());
    }
}
