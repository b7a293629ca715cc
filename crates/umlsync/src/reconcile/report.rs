//! Outcome of a reconciliation run.

use std::fmt;

use crate::document::EdgeKind;

/// How much attention an issue deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Expected situation worth mentioning, such as a base class defined elsewhere.
    Notice,

    /// Part of the model could not be drawn, or part of the diagram was left
    /// untouched because its structure is not understood.
    Warning,
}

impl Severity {
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Notice => write!(f, "notice"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A per-class or per-relation problem. Issues never abort a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncIssue {
    /// A relation was skipped because one of its classes has no container.
    UnresolvedEndpoint {
        kind: EdgeKind,
        source: String,
        target: String,
    },

    /// A container has more blocks than a class can have; it was left as is.
    InconsistentLayout {
        class: String,
        items: usize,
        separators: usize,
    },

    /// A base class is not part of the model, so no inheritance edge is drawn.
    UnknownBase { class: String, base: String },
}

impl SyncIssue {
    pub fn severity(&self) -> Severity {
        match self {
            SyncIssue::UnresolvedEndpoint { .. } | SyncIssue::InconsistentLayout { .. } => {
                Severity::Warning
            }
            SyncIssue::UnknownBase { .. } => Severity::Notice,
        }
    }
}

impl fmt::Display for SyncIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncIssue::UnresolvedEndpoint {
                kind,
                source,
                target,
            } => {
                let relation = match kind {
                    EdgeKind::Extends => "inheritance",
                    EdgeKind::Association | EdgeKind::Bidirectional => "association",
                };
                write!(
                    f,
                    "skipped {relation} `{source}` -> `{target}`: endpoint has no container"
                )
            }
            SyncIssue::InconsistentLayout {
                class,
                items,
                separators,
            } => write!(
                f,
                "class `{class}` left untouched: container has {items} blocks and {separators} separators"
            ),
            SyncIssue::UnknownBase { class, base } => {
                write!(f, "base class `{base}` of `{class}` is not in the model")
            }
        }
    }
}

/// Counts of cells changed by a run, and the issues found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    created: usize,
    updated: usize,
    removed: usize,
    issues: Vec<SyncIssue>,
}

impl SyncReport {
    /// Number of cells added to the document.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Number of existing cells whose label, tooltip, style, direction or
    /// geometry changed.
    pub fn updated(&self) -> usize {
        self.updated
    }

    /// Number of cells removed from the document.
    pub fn removed(&self) -> usize {
        self.removed
    }

    pub fn issues(&self) -> &[SyncIssue] {
        &self.issues
    }

    /// Returns `true` if any issue is a warning.
    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|issue| issue.severity().is_warning())
    }

    /// Returns `true` if the run did not change the document.
    pub fn is_unchanged(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.removed == 0
    }

    pub(crate) fn record_created(&mut self) {
        self.created += 1;
    }

    pub(crate) fn record_updated(&mut self) {
        self.updated += 1;
    }

    pub(crate) fn record_removed(&mut self, count: usize) {
        self.removed += count;
    }

    pub(crate) fn push_issue(&mut self, issue: SyncIssue) {
        self.issues.push(issue);
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} removed",
            self.created, self.updated, self.removed
        )?;
        let warnings = self
            .issues
            .iter()
            .filter(|issue| issue.severity().is_warning())
            .count();
        if warnings > 0 {
            write!(f, ", {warnings} warning(s)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let mut report = SyncReport::default();
        report.record_created();
        report.record_removed(3);
        report.push_issue(SyncIssue::UnknownBase {
            class: "Player".to_string(),
            base: "MonoBehaviour".to_string(),
        });

        assert_eq!(report.to_string(), "1 created, 0 updated, 3 removed");
        assert!(!report.has_warnings());

        report.push_issue(SyncIssue::UnresolvedEndpoint {
            kind: EdgeKind::Association,
            source: "A".to_string(),
            target: "B".to_string(),
        });
        assert_eq!(report.to_string(), "1 created, 0 updated, 3 removed, 1 warning(s)");
        assert!(report.has_warnings());
    }

    #[test]
    fn test_issue_display() {
        let issue = SyncIssue::InconsistentLayout {
            class: "Enemy".to_string(),
            items: 3,
            separators: 1,
        };

        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(
            issue.to_string(),
            "class `Enemy` left untouched: container has 3 blocks and 1 separators"
        );
    }
}
