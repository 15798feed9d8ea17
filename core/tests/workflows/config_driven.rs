// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration-driven behavior workflow tests.

use wallcal_core::{Calendar, Config, Event, EventDraft, RecurrenceDraft};

use crate::common::{setup_temp_dirs, test_config};

#[tokio::test]
async fn config_default_duration_applied() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let mut config: Config = toml::from_str(r#"default_duration = "45m""#).unwrap();
    config.store_path = Some(temp_dirs.store_path.clone());
    config.timezone = Some("Europe/Warsaw".to_string());
    let calendar = Calendar::new(config).await.unwrap();

    // Act
    let event = calendar
        .new_event(EventDraft::new("Call", "2026-03-30T12:00:00+02:00"))
        .await
        .unwrap();
    let explicit = calendar
        .new_event(EventDraft {
            end: Some("2026-03-30T15:00:00+02:00".to_string()),
            ..EventDraft::new("Workshop", "2026-03-30T13:00:00+02:00")
        })
        .await
        .unwrap();

    // Assert - end keeps the offset of the start
    assert_eq!(event.end(), Some("2026-03-30T12:45:00+02:00"));
    assert_eq!(explicit.end(), Some("2026-03-30T15:00:00+02:00"));
}

#[tokio::test]
async fn config_timezone_used_for_new_series() {
    // Arrange
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let config = Config {
        timezone: Some("America/New_York".to_string()),
        ..test_config(&temp_dirs.store_path)
    };
    let calendar = Calendar::new(config).await.unwrap();
    assert_eq!(calendar.timezone(), "America/New_York");

    // Act
    let event = calendar
        .new_event(EventDraft {
            recurrence: Some(RecurrenceDraft {
                rrule: "FREQ=MONTHLY;BYDAY=TU;BYSETPOS=2".to_string(),
                tz: None,
            }),
            ..EventDraft::new("Board", "2026-01-13T10:00:00-05:00")
        })
        .await
        .unwrap();

    // Assert
    let Event::Recurring(series) = event else {
        panic!("expected a recurring series");
    };
    assert_eq!(series.tz, "America/New_York");
}

#[tokio::test]
async fn config_unknown_timezone_fails() {
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let config = Config {
        timezone: Some("Atlantis/Capital".to_string()),
        ..test_config(&temp_dirs.store_path)
    };
    let err = Calendar::new(config).await.unwrap_err();
    assert!(err.to_string().contains("Atlantis/Capital"));
}

#[tokio::test]
async fn config_missing_store_is_empty_calendar() {
    let temp_dirs = setup_temp_dirs().await.unwrap();
    let config = test_config(&temp_dirs.data_dir.join("nested/dir/events.json"));
    let calendar = Calendar::new(config).await.unwrap();

    assert!(calendar.list_events().await.unwrap().is_empty());
    let items = calendar
        .list_range("2026-03-30T00:00:00+02:00", "2026-03-30T23:59:59+02:00")
        .await
        .unwrap();
    assert!(items.is_empty());
}
