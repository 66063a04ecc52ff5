//! Tests for the triage walk over a dependents page.

use depwatch_core::model::{PackageRecord, PublishDate, Publisher};
use depwatch_core::triage::select_for_scan;

fn pkg(name: &str, ts: i64) -> PackageRecord {
    PackageRecord {
        name: name.to_string(),
        description: String::new(),
        maintainers: Vec::new(),
        publisher: Publisher::default(),
        date: PublishDate {
            ts,
            rel: String::new(),
        },
        version: "1.0.0".to_string(),
    }
}

fn names<'a>(selected: &'a [&'a PackageRecord]) -> Vec<&'a str> {
    selected.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn test_all_recent_unscoped_kept_in_order() {
    let packages = vec![pkg("a", 300), pkg("b", 200), pkg("c", 100)];
    let selected = select_for_scan(&packages, 100);
    assert_eq!(names(&selected), ["a", "b", "c"]);
}

#[test]
fn test_scoped_packages_skipped_but_walk_continues() {
    let packages = vec![pkg("a", 300), pkg("@org/b", 200), pkg("c", 100)];
    let selected = select_for_scan(&packages, 50);
    assert_eq!(names(&selected), ["a", "c"]);
}

#[test]
fn test_walk_stops_at_first_stale_record() {
    // Early exit, not filter-and-continue: the fresh record behind the
    // stale one is never reached.
    let packages = vec![pkg("a", 300), pkg("b", 40), pkg("late", 300)];
    let selected = select_for_scan(&packages, 100);
    assert_eq!(names(&selected), ["a"]);
}

#[test]
fn test_scoped_above_cutoff_then_stale_tail() {
    let packages = vec![pkg("@scope/a", 100), pkg("b", 90), pkg("c", 50)];
    let selected = select_for_scan(&packages, 60);
    assert_eq!(names(&selected), ["b"]);
}

#[test]
fn test_timestamp_equal_to_cutoff_is_kept() {
    let packages = vec![pkg("a", 100)];
    let selected = select_for_scan(&packages, 100);
    assert_eq!(names(&selected), ["a"]);
}

#[test]
fn test_empty_page_selects_nothing() {
    let selected = select_for_scan(&[], 100);
    assert!(selected.is_empty());
}

#[test]
fn test_all_stale_selects_nothing() {
    let packages = vec![pkg("a", 10), pkg("b", 5)];
    assert!(select_for_scan(&packages, 100).is_empty());
}
