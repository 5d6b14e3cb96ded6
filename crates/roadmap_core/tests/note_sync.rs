mod common;

use common::{record, FakeNoteStore};
use roadmap_core::notes::{LoadOutcome, NoteSettings, NoteStatus, NoteSynchronizer, NoteTarget};
use roadmap_core::{Day, Position};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn target(month: &str, offset: usize, title: &str) -> NoteTarget {
    NoteTarget {
        position: Position::new(month, offset),
        day: Day::new(title, "Networking", "study"),
    }
}

fn synchronizer(store: &Arc<FakeNoteStore>) -> NoteSynchronizer {
    NoteSynchronizer::new(store.clone(), NoteSettings::default())
}

#[tokio::test]
async fn latest_timestamp_wins_for_the_active_day() {
    let store = Arc::new(
        FakeNoteStore::default()
            .with_record(
                "May",
                "May_05_20260101T0900_Intro",
                &record("May", 5, "Intro", "first"),
            )
            .with_record(
                "May",
                "May_15_20270101T0900_Other",
                &record("May", 15, "Other", "other day"),
            )
            .with_record(
                "May",
                "May_05_20260301T0900_Intro",
                &record("May", 5, "Intro", "second"),
            ),
    );
    let mut notes = synchronizer(&store);

    let status = notes.load_for_active_position(target("May", 4, "Intro")).await;
    assert_eq!(status, NoteStatus::Loaded);
    assert_eq!(notes.draft(), "second");
    assert_eq!(
        store.reads.lock().as_slice(),
        ["May_05_20260301T0900_Intro".to_string()]
    );
}

#[tokio::test]
async fn loaded_content_is_truncated_to_the_display_budget() {
    let long = "x".repeat(140);
    let store = Arc::new(FakeNoteStore::default().with_record(
        "May",
        "May_01_20260101T0900_Intro",
        &record("May", 1, "Intro", &long),
    ));
    let mut notes = synchronizer(&store);
    notes.load_for_active_position(target("May", 0, "Intro")).await;
    assert_eq!(notes.draft().chars().count(), 100);
}

#[tokio::test]
async fn missing_or_failed_loads_clear_the_draft() {
    let store = Arc::new(FakeNoteStore::default());
    let mut notes = synchronizer(&store);
    notes.edit("left over");

    let status = notes.load_for_active_position(target("May", 0, "Intro")).await;
    assert_eq!(status, NoteStatus::NotSaved);
    assert_eq!(notes.draft(), "");

    store.fail_reads.store(true, Ordering::SeqCst);
    notes.edit("again");
    let status = notes.load_for_active_position(target("May", 1, "Next")).await;
    assert_eq!(status, NoteStatus::NotSaved);
    assert_eq!(notes.draft(), "");
}

#[tokio::test]
async fn stale_load_results_are_discarded() {
    let store = Arc::new(FakeNoteStore::default());
    let mut notes = synchronizer(&store);

    let old = notes.begin_load(target("May", 0, "Intro"));
    let current = notes.begin_load(target("May", 1, "Next"));

    assert!(!notes.apply_load(&old, LoadOutcome::Found("old day".to_string())));
    assert_eq!(notes.draft(), "");
    assert_eq!(notes.status(), NoteStatus::NotSaved);

    assert!(notes.apply_load(&current, LoadOutcome::Found("new day".to_string())));
    assert_eq!(notes.draft(), "new day");
    assert_eq!(notes.status(), NoteStatus::Loaded);
}

#[tokio::test]
async fn save_now_reports_each_outcome() {
    let store = Arc::new(FakeNoteStore::default());
    let mut notes = synchronizer(&store);
    notes.begin_load(NoteTarget {
        position: Position::new("May", 4),
        day: Day::new("Intro Lesson", "Networking", "study"),
    });

    assert_eq!(notes.save_now("  \n ").await, NoteStatus::Empty);
    assert!(store.saves.lock().is_empty());

    assert_eq!(notes.save_now("  subnetting  ").await, NoteStatus::Saved);
    {
        let saves = store.saves.lock();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].month, "May");
        assert_eq!(saves[0].day, "05");
        assert_eq!(saves[0].title, "Intro_Lesson_NET");
        assert_eq!(saves[0].content, "subnetting");
    }

    store.fail_writes.store(true, Ordering::SeqCst);
    assert_eq!(notes.save_now("retry me").await, NoteStatus::Failed);
    assert_eq!(store.saves.lock().len(), 2);
}

#[tokio::test]
async fn save_now_without_an_active_day_has_nothing_to_save() {
    let store = Arc::new(FakeNoteStore::default());
    let mut notes = synchronizer(&store);
    assert_eq!(notes.save_now("text").await, NoteStatus::Empty);
    assert!(store.saves.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn edit_bursts_coalesce_into_one_autosave() {
    let store = Arc::new(FakeNoteStore::default());
    let mut notes = synchronizer(&store);
    notes.begin_load(target("May", 0, "Intro"));

    assert!(notes.edit("s"));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(notes.edit("su"));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(notes.edit("sub"));
    assert!(store.autosaves.lock().is_empty());

    tokio::time::sleep(Duration::from_millis(600)).await;
    let autosaves = store.autosaves.lock();
    assert_eq!(autosaves.len(), 1);
    assert_eq!(autosaves[0].content, "sub");
    assert_eq!(autosaves[0].title, "Intro");
}

#[tokio::test(start_paused = true)]
async fn blank_edits_and_over_budget_drafts() {
    let store = Arc::new(FakeNoteStore::default());
    let mut notes = synchronizer(&store);
    notes.begin_load(target("May", 0, "Intro"));

    assert!(!notes.edit("   "));
    assert!(notes.edit(&"y".repeat(130)));
    assert_eq!(notes.draft().chars().count(), 100);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(store.autosaves.lock()[0].content.chars().count(), 100);
}

#[tokio::test(start_paused = true)]
async fn scheduled_autosave_keeps_its_original_target() {
    let store = Arc::new(FakeNoteStore::default());
    let mut notes = synchronizer(&store);
    notes.begin_load(target("May", 0, "Intro"));
    notes.edit("about May 1");

    notes.begin_load(target("June", 0, "Routing"));
    assert_eq!(notes.draft(), "");

    tokio::time::sleep(Duration::from_millis(600)).await;
    let autosaves = store.autosaves.lock();
    assert_eq!(autosaves.len(), 1);
    assert_eq!(autosaves[0].month, "May");
    assert_eq!(autosaves[0].title, "Intro");
    assert_eq!(autosaves[0].content, "about May 1");
}

#[tokio::test(start_paused = true)]
async fn autosave_failures_do_not_change_status() {
    let store = Arc::new(FakeNoteStore::default());
    store.fail_writes.store(true, Ordering::SeqCst);
    let mut notes = synchronizer(&store);
    notes.begin_load(target("May", 0, "Intro"));
    notes.edit("draft");

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(store.autosaves.lock().len(), 1);
    assert_eq!(notes.status(), NoteStatus::NotSaved);
    assert!(!notes.has_pending_autosave());
}

#[tokio::test(start_paused = true)]
async fn overlapping_autosaves_finish_in_the_order_they_started() {
    let store = Arc::new(FakeNoteStore::default().with_write_delays(&[Duration::from_secs(3)]));
    let mut notes = synchronizer(&store);
    notes.begin_load(target("May", 0, "Intro"));

    notes.edit("first");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(store.autosaves.lock().len(), 1);

    notes.edit("second");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(store.completed.lock().is_empty());
    assert_eq!(store.autosaves.lock().len(), 1);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(store.completed.lock().as_slice(), ["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn save_now_waits_for_the_in_flight_autosave() {
    let store = Arc::new(FakeNoteStore::default().with_write_delays(&[Duration::from_secs(3)]));
    let mut notes = synchronizer(&store);
    notes.begin_load(target("May", 0, "Intro"));

    notes.edit("draft");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(store.autosaves.lock().len(), 1);
    assert!(store.completed.lock().is_empty());

    assert_eq!(notes.save_now("final").await, NoteStatus::Saved);
    assert_eq!(store.completed.lock().as_slice(), ["draft", "final"]);
    assert_eq!(store.saves.lock().len(), 1);
}
