mod common;

use common::curriculum;
use roadmap_core::db::{open_db, open_db_in_memory, open_store, StoreLocation};
use roadmap_core::ledger::aggregate::{monthly_percent, weekly_percent, yearly_percent};
use roadmap_core::repo::state_repo::PROGRESS_LEDGER_KEY;
use roadmap_core::{
    ClearScope, Position, ProgressLedger, ProgressSnapshot, SqliteStateRepository,
    StateRepository, WeekBoundary,
};
use std::rc::Rc;

fn memory_repo() -> Rc<SqliteStateRepository> {
    Rc::new(SqliteStateRepository::try_new(open_db_in_memory().unwrap()).unwrap())
}

#[test]
fn unwritten_positions_read_zero() {
    let ledger = ProgressLedger::load(memory_repo()).unwrap();
    assert_eq!(ledger.get(&Position::new("January", 0)), 0);
    assert_eq!(ledger.get(&Position::new("Nowhere", 42)), 0);
}

#[test]
fn set_then_clear_day_round_trips() {
    let hierarchy = curriculum(&[("January", &[3])]);
    let mut ledger = ProgressLedger::load(memory_repo()).unwrap();
    let position = Position::new("January", 1);

    ledger.set(&position, 100).unwrap();
    assert_eq!(ledger.get(&position), 100);

    let removed = ledger
        .clear(ClearScope::Day, &position, &hierarchy, WeekBoundary::Hierarchy)
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(ledger.get(&position), 0);
}

#[test]
fn every_mutation_rewrites_the_full_object() {
    let repo = memory_repo();
    let mut ledger = ProgressLedger::load(Rc::clone(&repo)).unwrap();
    ledger.set(&Position::new("May", 0), 100).unwrap();
    ledger.set(&Position::new("May", 3), 40).unwrap();

    let raw = repo.get_value(PROGRESS_LEDGER_KEY).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, serde_json::json!({"May-0": 100, "May-3": 40}));
}

#[test]
fn ledger_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roadmap.db");
    {
        let repo = SqliteStateRepository::try_new(open_db(&path).unwrap()).unwrap();
        let mut ledger = ProgressLedger::load(repo).unwrap();
        ledger.set(&Position::new("March", 2), 100).unwrap();
    }

    let repo = SqliteStateRepository::try_new(open_db(&path).unwrap()).unwrap();
    let ledger = ProgressLedger::load(repo).unwrap();
    assert_eq!(ledger.get(&Position::new("March", 2)), 100);
}

#[test]
fn ledger_survives_restart_at_the_default_location() {
    let data_dir = tempfile::tempdir().unwrap();
    let location = StoreLocation::resolve(None, Some(data_dir.path().to_path_buf()));
    {
        let repo = SqliteStateRepository::try_new(open_store(&location).unwrap()).unwrap();
        let mut ledger = ProgressLedger::load(repo).unwrap();
        ledger.set(&Position::new("January", 0), 100).unwrap();
    }

    let repo = SqliteStateRepository::try_new(open_store(&location).unwrap()).unwrap();
    let ledger = ProgressLedger::load(repo).unwrap();
    assert_eq!(ledger.get(&Position::new("January", 0)), 100);
}

#[test]
fn corrupt_ledger_starts_empty() {
    let repo = memory_repo();
    repo.put_value(PROGRESS_LEDGER_KEY, "[not an object").unwrap();
    let ledger = ProgressLedger::load(repo).unwrap();
    assert!(ledger.entries().is_empty());
}

#[test]
fn year_clear_empties_every_month() {
    let hierarchy = curriculum(&[("January", &[3]), ("February", &[2])]);
    let mut ledger = ProgressLedger::load(memory_repo()).unwrap();
    ledger.set(&Position::new("January", 0), 100).unwrap();
    ledger.set(&Position::new("February", 1), 100).unwrap();
    ledger.set(&Position::new("Unlisted", 9), 50).unwrap();

    let removed = ledger
        .clear(
            ClearScope::Year,
            &Position::new("January", 0),
            &hierarchy,
            WeekBoundary::Hierarchy,
        )
        .unwrap();
    assert_eq!(removed, 3);
    for (month, offset) in [("January", 0), ("February", 1), ("Unlisted", 9)] {
        assert_eq!(ledger.get(&Position::new(month, offset)), 0);
    }
}

#[test]
fn month_clear_leaves_other_months() {
    let hierarchy = curriculum(&[("January", &[3]), ("February", &[2])]);
    let mut ledger = ProgressLedger::load(memory_repo()).unwrap();
    ledger.set(&Position::new("January", 0), 100).unwrap();
    ledger.set(&Position::new("January", 2), 100).unwrap();
    ledger.set(&Position::new("February", 0), 100).unwrap();

    let removed = ledger
        .clear(
            ClearScope::Month,
            &Position::new("January", 1),
            &hierarchy,
            WeekBoundary::Hierarchy,
        )
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(ledger.get(&Position::new("February", 0)), 100);
}

#[test]
fn clearing_an_empty_scope_is_a_no_op() {
    let hierarchy = curriculum(&[("January", &[3])]);
    let mut ledger = ProgressLedger::load(memory_repo()).unwrap();
    let removed = ledger
        .clear(
            ClearScope::Week,
            &Position::new("January", 0),
            &hierarchy,
            WeekBoundary::FixedSeven,
        )
        .unwrap();
    assert_eq!(removed, 0);
}

#[test]
fn week_clear_follows_the_configured_boundary() {
    // Weeks of 5, 7 and 3 days: offsets 0-4, 5-11, 12-14.
    let hierarchy = curriculum(&[("March", &[5, 7, 3])]);
    let position = Position::new("March", 6);

    let mut by_hierarchy = ProgressLedger::load(memory_repo()).unwrap();
    let mut by_seven = ProgressLedger::load(memory_repo()).unwrap();
    for offset in 0..15 {
        by_hierarchy
            .set(&Position::new("March", offset), 100)
            .unwrap();
        by_seven.set(&Position::new("March", offset), 100).unwrap();
    }

    by_hierarchy
        .clear(ClearScope::Week, &position, &hierarchy, WeekBoundary::Hierarchy)
        .unwrap();
    let cleared: Vec<usize> = (0..15)
        .filter(|offset| by_hierarchy.get(&Position::new("March", *offset)) == 0)
        .collect();
    assert_eq!(cleared, (5..12).collect::<Vec<_>>());

    by_seven
        .clear(ClearScope::Week, &position, &hierarchy, WeekBoundary::FixedSeven)
        .unwrap();
    let cleared: Vec<usize> = (0..15)
        .filter(|offset| by_seven.get(&Position::new("March", *offset)) == 0)
        .collect();
    assert_eq!(cleared, (0..7).collect::<Vec<_>>());
}

#[test]
fn rollups_round_half_up_and_guard_empty_denominators() {
    let hierarchy = curriculum(&[("January", &[3]), ("February", &[]), ("March", &[8])]);
    let mut ledger = ProgressLedger::load(memory_repo()).unwrap();
    ledger.set(&Position::new("January", 0), 100).unwrap();
    ledger.set(&Position::new("January", 1), 60).unwrap();
    ledger.set(&Position::new("March", 7), 100).unwrap();
    let entries = ledger.entries();

    assert_eq!(monthly_percent(entries, &hierarchy, "January"), 33);
    assert_eq!(monthly_percent(entries, &hierarchy, "February"), 0);
    assert_eq!(monthly_percent(entries, &hierarchy, "March"), 13);
    assert_eq!(
        weekly_percent(entries, &hierarchy, "March", 1, WeekBoundary::FixedSeven),
        100
    );
    assert_eq!(
        weekly_percent(entries, &hierarchy, "February", 0, WeekBoundary::Hierarchy),
        0
    );
    // 2 of 11 days.
    assert_eq!(
        yearly_percent(entries, &hierarchy, ["January", "February", "March"]),
        18
    );
}

#[test]
fn snapshot_reports_every_rollup_for_the_active_day() {
    let hierarchy = curriculum(&[("January", &[2, 2]), ("February", &[2])]);
    let mut ledger = ProgressLedger::load(memory_repo()).unwrap();
    ledger.set(&Position::new("January", 2), 100).unwrap();
    ledger.set(&Position::new("February", 0), 100).unwrap();

    let position = Position::new("January", 2);
    let snapshot = ProgressSnapshot::compute(
        ledger.entries(),
        &hierarchy,
        Some("January"),
        Some(&position),
        WeekBoundary::Hierarchy,
    );
    assert_eq!(snapshot.daily, 100);
    assert_eq!(snapshot.weekly, 50);
    assert_eq!(snapshot.monthly, 25);
    assert_eq!(snapshot.yearly, 33);
    assert_eq!(
        snapshot
            .months
            .iter()
            .map(|row| (row.month.as_str(), row.percent))
            .collect::<Vec<_>>(),
        vec![("January", 25), ("February", 50)]
    );
}
