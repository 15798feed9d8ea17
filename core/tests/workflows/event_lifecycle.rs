// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end lifecycle tests for single events.

use wallcal_core::{Event, EventDraft, EventPatch};

use crate::common::{assert_file_exists, setup_temp_dirs, single_draft, test_calendar};

#[tokio::test]
async fn event_lifecycle_create_flow() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let draft = EventDraft {
        place: Some("Cafe".to_string()),
        participants: vec!["ana".to_string()],
        ..single_draft(
            "Lunch",
            "2026-03-30T12:00:00+02:00",
            "2026-03-30T13:00:00+02:00",
        )
    };

    // Act
    let event = calendar.new_event(draft).await.unwrap();

    // Assert - verify event created
    let Event::Single(single) = &event else {
        panic!("expected a single event");
    };
    assert_eq!(single.info.title, "Lunch");
    assert_eq!(single.info.place.as_deref(), Some("Cafe"));
    assert_eq!(single.end.as_deref(), Some("2026-03-30T13:00:00+02:00"));

    // Assert - verify the store was written
    assert_file_exists(&temp_dirs.store_path);
    let doc = temp_dirs.read_store().await.unwrap();
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["events"][0]["kind"], "single");
    assert_eq!(doc["events"][0]["id"], event.id());

    // Assert - retrieval by full id and by prefix
    let by_id = calendar.get_event(event.id()).await.unwrap();
    assert_eq!(by_id, event);
    let by_prefix = calendar.get_event(&event.id()[..8]).await.unwrap();
    assert_eq!(by_prefix, event);
}

#[tokio::test]
async fn event_lifecycle_update_flow() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let event = calendar
        .new_event(single_draft(
            "Original Title",
            "2026-03-30T12:00:00+02:00",
            "2026-03-30T13:00:00+02:00",
        ))
        .await
        .unwrap();

    // Act
    let patch = EventPatch {
        title: Some("Updated Title".to_string()),
        end: Some(None),
        place: Some(Some("Office".to_string())),
        ..Default::default()
    };
    let updated = calendar.update_event(event.id(), patch).await.unwrap();

    // Assert - verify update in memory and on disk
    assert_eq!(updated.info().title, "Updated Title");
    assert_eq!(updated.end(), None);
    assert_eq!(updated.info().place.as_deref(), Some("Office"));
    let reloaded = calendar.get_event(event.id()).await.unwrap();
    assert_eq!(reloaded, updated);
}

#[tokio::test]
async fn event_lifecycle_invalid_update_keeps_store() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let event = calendar
        .new_event(single_draft(
            "Review",
            "2026-03-30T12:00:00+02:00",
            "2026-03-30T13:00:00+02:00",
        ))
        .await
        .unwrap();

    // Act - end before start, then a loose start string
    let before_start = EventPatch {
        end: Some(Some("2026-03-30T11:00:00+02:00".to_string())),
        ..Default::default()
    };
    let loose_start = EventPatch {
        start: Some("2026-03-30 12:00".to_string()),
        ..Default::default()
    };

    // Assert
    assert!(calendar.update_event(event.id(), before_start).await.is_err());
    assert!(calendar.update_event(event.id(), loose_start).await.is_err());
    assert_eq!(calendar.get_event(event.id()).await.unwrap(), event);
}

#[tokio::test]
async fn event_lifecycle_delete_flow() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let keep = calendar
        .new_event(single_draft(
            "Keep",
            "2026-03-30T12:00:00+02:00",
            "2026-03-30T13:00:00+02:00",
        ))
        .await
        .unwrap();
    let removed = calendar
        .new_event(single_draft(
            "Drop",
            "2026-03-31T12:00:00+02:00",
            "2026-03-31T13:00:00+02:00",
        ))
        .await
        .unwrap();

    // Act
    let deleted = calendar.delete_event(removed.id()).await.unwrap();

    // Assert
    assert_eq!(deleted, removed);
    assert!(calendar.get_event(removed.id()).await.is_err());
    assert_eq!(calendar.list_events().await.unwrap(), vec![keep]);
}

#[tokio::test]
async fn event_lifecycle_rejects_invalid_drafts() {
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;

    for draft in [
        EventDraft::new("", "2026-03-30T12:00:00+02:00"),
        EventDraft::new("Loose", "2026-03-30T12:00:00"),
        EventDraft::new("Zulu", "2026-03-30T12:00:00Z"),
        single_draft(
            "Backwards",
            "2026-03-30T12:00:00+02:00",
            "2026-03-30T11:00:00+02:00",
        ),
    ] {
        assert!(calendar.new_event(draft).await.is_err());
    }
    assert!(calendar.list_events().await.unwrap().is_empty());
    assert!(!temp_dirs.store_path.exists());
}
