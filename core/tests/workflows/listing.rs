// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Range, today and week listings merging single events with series.

use jiff::Timestamp;

use crate::common::{
    assert_sorted_by_start, ids_of, setup_temp_dirs, single_draft, starts_of, test_calendar,
    weekly_series_draft,
};

#[tokio::test]
async fn list_range_merges_singles_and_occurrences() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    let series = calendar
        .new_event(weekly_series_draft("Standup"))
        .await
        .unwrap();
    let lunch = calendar
        .new_event(single_draft(
            "Lunch",
            "2026-03-30T12:00:00+02:00",
            "2026-03-30T13:00:00+02:00",
        ))
        .await
        .unwrap();
    // Starts in UTC before the standup, running until it begins.
    let early = calendar
        .new_event(single_draft(
            "Early call",
            "2026-03-30T06:00:00+00:00",
            "2026-03-30T07:00:00+00:00",
        ))
        .await
        .unwrap();

    // Act
    let items = calendar
        .list_range("2026-03-30T00:00:00+02:00", "2026-03-30T23:59:59+02:00")
        .await
        .unwrap();

    // Assert
    assert_sorted_by_start(&items);
    let occurrence_id = format!("{}@2026-03-30T09:00:00+02:00", series.id());
    assert_eq!(
        ids_of(&items),
        [early.id(), occurrence_id.as_str(), lunch.id()]
    );

    let occurrence = &items[1];
    assert_eq!(occurrence.series_id.as_deref(), Some(series.id()));
    assert_eq!(occurrence.end.as_deref(), Some("2026-03-30T09:30:00+02:00"));
    assert_eq!(occurrence.info.place.as_deref(), Some("Room 4"));
    assert_eq!(occurrence.info.participants, ["ana", "bo"]);
    assert!(items[0].series_id.is_none());
}

#[tokio::test]
async fn list_range_includes_events_overlapping_the_start() {
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;
    calendar
        .new_event(weekly_series_draft("Standup"))
        .await
        .unwrap();

    // 09:15 falls inside the 09:00-09:30 occurrence.
    let items = calendar
        .list_range("2026-03-30T09:15:00+02:00", "2026-03-30T10:00:00+02:00")
        .await
        .unwrap();
    assert_eq!(starts_of(&items), ["2026-03-30T09:00:00+02:00"]);

    let items = calendar
        .list_range("2026-03-30T09:31:00+02:00", "2026-03-30T10:00:00+02:00")
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_range_rejects_malformed_bounds() {
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let calendar = test_calendar(&temp_dirs.store_path).await;

    let err = calendar
        .list_range("2026-03-30", "2026-03-31T00:00:00+02:00")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("2026-03-30"));
}

#[tokio::test]
async fn list_today_uses_configured_timezone() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let mut calendar = test_calendar(&temp_dirs.store_path).await;
    calendar
        .new_event(weekly_series_draft("Standup"))
        .await
        .unwrap();
    calendar
        .new_event(single_draft(
            "Late dinner",
            "2026-03-30T23:30:00+02:00",
            "2026-03-31T00:30:00+02:00",
        ))
        .await
        .unwrap();
    calendar
        .new_event(single_draft(
            "Tomorrow",
            "2026-03-31T09:00:00+02:00",
            "2026-03-31T10:00:00+02:00",
        ))
        .await
        .unwrap();

    // Act - 22:30 UTC on Sunday is already Monday in Warsaw
    calendar.set_now("2026-03-29T22:30:00Z".parse::<Timestamp>().unwrap());
    let items = calendar.list_today().await.unwrap();

    // Assert
    assert_eq!(
        starts_of(&items),
        ["2026-03-30T09:00:00+02:00", "2026-03-30T23:30:00+02:00"]
    );
}

#[tokio::test]
async fn list_week_runs_monday_to_sunday() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let mut calendar = test_calendar(&temp_dirs.store_path).await;
    calendar
        .new_event(weekly_series_draft("Standup"))
        .await
        .unwrap();
    for (title, start, end) in [
        ("Before", "2026-03-29T20:00:00+02:00", "2026-03-29T21:00:00+02:00"),
        ("Sunday", "2026-04-05T20:00:00+02:00", "2026-04-05T21:00:00+02:00"),
        ("After", "2026-04-06T00:30:00+02:00", "2026-04-06T01:00:00+02:00"),
    ] {
        calendar
            .new_event(single_draft(title, start, end))
            .await
            .unwrap();
    }

    // Act - a Thursday
    calendar.set_now("2026-04-02T10:00:00Z".parse::<Timestamp>().unwrap());
    let items = calendar.list_week().await.unwrap();

    // Assert
    let titles: Vec<_> = items.iter().map(|o| o.info.title.as_str()).collect();
    assert_eq!(titles, ["Standup", "Sunday"]);
    assert_sorted_by_start(&items);
}
