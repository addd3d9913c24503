//! Block-list and filter-outcome model types.

use serde::Deserialize;
use std::collections::BTreeSet;

/// Block-lists resolved once before a run.
///
/// Ordered sets keep keyword iteration deterministic, so the
/// "first matching keyword" rule means the same thing on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterList {
    /// Sender hosts to exclude.
    #[serde(default)]
    pub domains: BTreeSet<String>,
    /// Sender addresses to exclude.
    #[serde(default)]
    pub emails: BTreeSet<String>,
    /// Case-sensitive subject substrings to exclude.
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    /// Staff addresses: excluded from the filtered export but still counted.
    #[serde(default)]
    pub staff: BTreeSet<String>,
}

impl FilterList {
    /// Whether every list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
            && self.emails.is_empty()
            && self.keywords.is_empty()
            && self.staff.is_empty()
    }
}

/// Why a record was filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    /// Sender host is on the domain block-list.
    Domain,
    /// Sender is a staff member (suppressed in the filtered export).
    Staff,
    /// Sender address is on the address block-list.
    Email,
    /// Subject contains a blocked keyword.
    Keyword,
    /// Record's year does not match the target year.
    IncorrectYear,
}

impl FilterReason {
    /// The exact reason string written to the filtered export.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "Domain in filter list",
            Self::Staff => "Staff",
            Self::Email => "Email address in filter list",
            Self::Keyword => "Subject contains keyword in filter list",
            Self::IncorrectYear => "Incorrect Year",
        }
    }

    /// Whether records with this reason are withheld from the filtered
    /// export file. They still count toward filtered totals.
    #[must_use]
    pub const fn suppressed(&self) -> bool {
        matches!(self, Self::Staff | Self::IncorrectYear)
    }
}

impl std::fmt::Display for FilterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of filter evaluation for one record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterVerdict {
    /// Not evaluated yet.
    #[default]
    Unknown,
    /// Record passed every check.
    Passed,
    /// Record matched a block-list entry.
    Failed {
        /// Which check matched.
        reason: FilterReason,
        /// The matched value (host, address, subject, or year).
        value: String,
    },
}

impl FilterVerdict {
    /// Whether the verdict is a failure.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The failure reason, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<FilterReason> {
        match self {
            Self::Failed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// The matched value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Failed { value, .. } => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(FilterReason::Domain.as_str(), "Domain in filter list");
        assert_eq!(FilterReason::Staff.as_str(), "Staff");
        assert_eq!(
            FilterReason::Email.as_str(),
            "Email address in filter list"
        );
        assert_eq!(
            FilterReason::Keyword.as_str(),
            "Subject contains keyword in filter list"
        );
        assert_eq!(FilterReason::IncorrectYear.as_str(), "Incorrect Year");
    }

    #[test]
    fn test_suppressed_reasons() {
        assert!(FilterReason::Staff.suppressed());
        assert!(FilterReason::IncorrectYear.suppressed());
        assert!(!FilterReason::Domain.suppressed());
        assert!(!FilterReason::Email.suppressed());
        assert!(!FilterReason::Keyword.suppressed());
    }

    #[test]
    fn test_verdict_accessors() {
        let verdict = FilterVerdict::Failed {
            reason: FilterReason::Domain,
            value: "spam.example".to_string(),
        };
        assert!(verdict.is_failed());
        assert_eq!(verdict.reason(), Some(FilterReason::Domain));
        assert_eq!(verdict.value(), Some("spam.example"));

        assert!(!FilterVerdict::Passed.is_failed());
        assert_eq!(FilterVerdict::Unknown.reason(), None);
    }

    #[test]
    fn test_filter_list_is_empty() {
        let mut list = FilterList::default();
        assert!(list.is_empty());
        list.domains.insert("spam.example".to_string());
        assert!(!list.is_empty());
    }
}
