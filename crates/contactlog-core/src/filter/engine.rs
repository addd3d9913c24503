//! Block-list evaluation.

use super::model::{FilterList, FilterReason, FilterVerdict};
use crate::record::EmailRecord;

/// Evaluates a record against the block-lists.
///
/// Checks run in strict priority order and short-circuit at the first
/// match: domain, staff, address, subject keyword. Keyword matching is a
/// case-sensitive substring check; the first keyword in set order wins.
#[must_use]
pub fn evaluate(record: &EmailRecord, list: &FilterList) -> FilterVerdict {
    if list.domains.contains(&record.from_host) {
        return FilterVerdict::Failed {
            reason: FilterReason::Domain,
            value: record.from_host.clone(),
        };
    }
    if list.staff.contains(&record.from_email) {
        return FilterVerdict::Failed {
            reason: FilterReason::Staff,
            value: record.from_email.clone(),
        };
    }
    if list.emails.contains(&record.from_email) {
        return FilterVerdict::Failed {
            reason: FilterReason::Email,
            value: record.from_email.clone(),
        };
    }
    if list
        .keywords
        .iter()
        .any(|keyword| record.subject.contains(keyword.as_str()))
    {
        return FilterVerdict::Failed {
            reason: FilterReason::Keyword,
            value: record.subject.clone(),
        };
    }
    FilterVerdict::Passed
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    fn record(subject: &str, from: &str) -> EmailRecord {
        EmailRecord::build(subject, from, "bob@x.com", "Mon, 2 Jan 2023 10:00:00 +0000")
    }

    fn list() -> FilterList {
        let mut list = FilterList::default();
        list.domains.insert("spam.example".to_string());
        list.emails.insert("alice@bad.com".to_string());
        list.keywords.insert("UNSUBSCRIBE".to_string());
        list.staff.insert("carol@org.example".to_string());
        list
    }

    #[test]
    fn test_passes_clean_record() {
        let verdict = evaluate(&record("Hi", "dave@ok.example"), &list());
        assert_eq!(verdict, FilterVerdict::Passed);
    }

    #[test]
    fn test_domain_match() {
        let verdict = evaluate(&record("Hi", "eve@Spam.example"), &list());
        assert_eq!(
            verdict,
            FilterVerdict::Failed {
                reason: FilterReason::Domain,
                value: "spam.example".to_string(),
            }
        );
    }

    #[test]
    fn test_domain_beats_email() {
        let mut list = list();
        list.domains.insert("bad.com".to_string());
        // alice@bad.com is on both lists; the domain check runs first
        let verdict = evaluate(&record("Hi", "alice@bad.com"), &list);
        assert_eq!(verdict.reason(), Some(FilterReason::Domain));
        assert_eq!(verdict.value(), Some("bad.com"));
    }

    #[test]
    fn test_staff_beats_email() {
        let mut list = list();
        list.emails.insert("carol@org.example".to_string());
        let verdict = evaluate(&record("Hi", "carol@org.example"), &list);
        assert_eq!(verdict.reason(), Some(FilterReason::Staff));
    }

    #[test]
    fn test_email_match() {
        let verdict = evaluate(&record("Hi", "alice@bad.com"), &list());
        assert_eq!(verdict.reason(), Some(FilterReason::Email));
        assert_eq!(verdict.value(), Some("alice@bad.com"));
    }

    #[test]
    fn test_keyword_is_case_sensitive_substring() {
        let verdict = evaluate(&record("Please UNSUBSCRIBE me", "dave@ok.example"), &list());
        assert_eq!(verdict.reason(), Some(FilterReason::Keyword));
        assert_eq!(verdict.value(), Some("Please UNSUBSCRIBE me"));

        let verdict = evaluate(&record("please unsubscribe me", "dave@ok.example"), &list());
        assert_eq!(verdict, FilterVerdict::Passed);
    }
}
