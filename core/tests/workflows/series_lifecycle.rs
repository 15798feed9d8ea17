// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end lifecycle tests for recurring series.

use wallcal_core::{Event, EventDraft, EventPatch, ExpandMode};

use crate::common::{setup_temp_dirs, single_draft, test_calendar, weekly_series_draft};

#[tokio::test]
async fn series_expands_across_spring_forward() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let series = calendar
        .new_event(weekly_series_draft("Standup"))
        .await
        .unwrap();

    // Act
    let occurrences = calendar
        .expand(
            series.id(),
            "2026-03-20T00:00:00+01:00",
            "2026-04-07T00:00:00+02:00",
            ExpandMode::WallClock,
        )
        .await
        .unwrap();

    // Assert - the wall-clock time stays at 09:00 while the offset changes
    assert_eq!(
        occurrences,
        [
            "2026-03-23T09:00:00+01:00",
            "2026-03-30T09:00:00+02:00",
            "2026-04-06T09:00:00+02:00",
        ]
    );
}

#[tokio::test]
async fn series_skip_occurrence_flow() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let series = calendar
        .new_event(weekly_series_draft("Standup"))
        .await
        .unwrap();

    // Act
    let updated = calendar
        .skip_occurrence(series.id(), "2026-03-30T09:00:00+02:00")
        .await
        .unwrap();

    // Assert - exception stored and removed from expansion
    assert_eq!(updated.exceptions, ["2026-03-30T09:00:00+02:00"]);
    let occurrences = calendar
        .expand(
            series.id(),
            "2026-03-23T00:00:00+01:00",
            "2026-04-14T00:00:00+02:00",
            ExpandMode::WallClock,
        )
        .await
        .unwrap();
    assert_eq!(
        occurrences,
        [
            "2026-03-23T09:00:00+01:00",
            "2026-04-06T09:00:00+02:00",
            "2026-04-13T09:00:00+02:00",
        ]
    );

    // Assert - skipping again is a no-op
    let again = calendar
        .skip_occurrence(series.id(), "2026-03-30T09:00:00+02:00")
        .await
        .unwrap();
    assert_eq!(again.exceptions.len(), 1);
}

#[tokio::test]
async fn series_skip_requires_exact_occurrence_form() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let series = calendar
        .new_event(weekly_series_draft("Standup"))
        .await
        .unwrap();

    // Act & Assert - same instant, different offset rendering
    let err = calendar
        .skip_occurrence(series.id(), "2026-03-30T08:00:00+01:00")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no occurrence"));

    // Act & Assert - a Tuesday never occurs
    assert!(
        calendar
            .skip_occurrence(series.id(), "2026-03-31T09:00:00+02:00")
            .await
            .is_err()
    );

    // Act & Assert - not a strict instant
    assert!(
        calendar
            .skip_occurrence(series.id(), "2026-03-30 09:00")
            .await
            .is_err()
    );
}

#[tokio::test]
async fn series_operations_reject_single_events() {
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let single = calendar
        .new_event(single_draft(
            "Lunch",
            "2026-03-30T12:00:00+02:00",
            "2026-03-30T13:00:00+02:00",
        ))
        .await
        .unwrap();

    let err = calendar
        .expand(
            single.id(),
            "2026-03-30T00:00:00+02:00",
            "2026-03-31T00:00:00+02:00",
            ExpandMode::WallClock,
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not a recurring series"));

    assert!(
        calendar
            .skip_occurrence(single.id(), "2026-03-30T12:00:00+02:00")
            .await
            .is_err()
    );
}

#[tokio::test]
async fn series_created_by_patching_a_single_event() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let single = calendar
        .new_event(single_draft(
            "Gym",
            "2026-03-24T18:00:00+01:00",
            "2026-03-24T19:00:00+01:00",
        ))
        .await
        .unwrap();

    // Act
    let patch = EventPatch {
        rrule: Some("FREQ=WEEKLY;BYDAY=TU,TH;COUNT=3".to_string()),
        ..Default::default()
    };
    let series = calendar.update_event(single.id(), patch).await.unwrap();

    // Assert - the configured timezone is used for the new series
    let Event::Recurring(recurring) = &series else {
        panic!("expected a recurring series");
    };
    assert_eq!(recurring.id, single.id());
    assert_eq!(recurring.tz, "Europe/Warsaw");

    let occurrences = calendar
        .expand(
            series.id(),
            "2026-03-01T00:00:00+01:00",
            "2026-05-01T00:00:00+02:00",
            ExpandMode::WallClock,
        )
        .await
        .unwrap();
    assert_eq!(
        occurrences,
        [
            "2026-03-24T18:00:00+01:00",
            "2026-03-26T18:00:00+01:00",
            "2026-03-31T18:00:00+02:00",
        ]
    );
}

#[tokio::test]
async fn series_rejects_invalid_rules_and_timezones() {
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;

    let mut draft = weekly_series_draft("Bad rule");
    if let Some(recurrence) = &mut draft.recurrence {
        recurrence.rrule = "FREQ=DAILY".to_string();
    }
    let err = calendar.new_event(draft).await.unwrap_err();
    assert!(err.to_string().contains("frequency"));

    let mut draft = weekly_series_draft("Bad timezone");
    if let Some(recurrence) = &mut draft.recurrence {
        recurrence.tz = Some("Atlantis/Capital".to_string());
    }
    let err = calendar.new_event(draft).await.unwrap_err();
    assert!(err.to_string().contains("Atlantis/Capital"));

    let draft = EventDraft {
        recurrence: None,
        ..weekly_series_draft("Plain")
    };
    assert!(calendar.new_event(draft).await.is_ok());
}

#[tokio::test]
async fn series_anchor_written_in_utc_is_first_occurrence() {
    // Arrange - 08:00 UTC is 09:00 in Warsaw
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let draft = EventDraft {
        end: Some("2026-03-23T08:30:00+00:00".to_string()),
        ..weekly_series_draft("Standup")
    };
    let draft = EventDraft {
        start: "2026-03-23T08:00:00+00:00".to_string(),
        ..draft
    };
    let series = calendar.new_event(draft).await.unwrap();

    // Act
    let occurrences = calendar
        .expand(
            series.id(),
            "2026-03-23T00:00:00+01:00",
            "2026-04-01T00:00:00+02:00",
            ExpandMode::WallClock,
        )
        .await
        .unwrap();
    let listed = calendar
        .list_range("2026-03-23T00:00:00+01:00", "2026-03-23T23:59:59+01:00")
        .await
        .unwrap();

    // Assert - the template follows the Warsaw wall clock of the anchor
    assert_eq!(
        occurrences,
        ["2026-03-23T09:00:00+01:00", "2026-03-30T09:00:00+02:00"]
    );
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].start, "2026-03-23T09:00:00+01:00");
    assert_eq!(listed[0].end.as_deref(), Some("2026-03-23T09:30:00+01:00"));
}
