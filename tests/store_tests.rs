mod common;
use chrono::{Duration, TimeZone, Utc};
use common::{clock_at, day, memory_pool, noon};
use repcount::core::{AchievementLogic, DeleteLogic, SessionLogic, SettingsLogic, StatsLogic};
use repcount::db::initialize::init_and_seed;
use repcount::errors::AppError;
use repcount::models::{AppSettings, NewSession, SetRecord, SettingsPatch};

#[test]
fn saved_session_comes_back_unchanged() {
    let mut pool = memory_pool();
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

    let id = SessionLogic::save_session(&mut pool, &NewSession::new(date, 30, 120)).unwrap();

    let all = SessionLogic::get_all_sessions(&mut pool).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].date, date);
    assert_eq!(all[0].push_ups, 30);
    assert_eq!(all[0].duration, 120);
    assert_eq!(StatsLogic::total_push_ups(&mut pool).unwrap(), 30);
}

#[test]
fn empty_store_lists_nothing() {
    let mut pool = memory_pool();
    assert!(SessionLogic::get_all_sessions(&mut pool).unwrap().is_empty());
    assert_eq!(StatsLogic::total_push_ups(&mut pool).unwrap(), 0);
}

#[test]
fn zero_push_ups_are_rejected() {
    let mut pool = memory_pool();
    let err = SessionLogic::save_session(&mut pool, &NewSession::new(Utc::now(), 0, 10));
    assert!(matches!(err, Err(AppError::InvalidSession(_))));
    assert_eq!(SessionLogic::count_sessions(&mut pool).unwrap(), 0);
}

#[test]
fn sets_round_trip_and_ids_are_unique() {
    let mut pool = memory_pool();
    let t = Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap();
    let sets = vec![
        SetRecord {
            reps: 10,
            rest_time: 0,
            timestamp: t,
        },
        SetRecord {
            reps: 15,
            rest_time: 45,
            timestamp: t + Duration::seconds(90),
        },
    ];

    let a = SessionLogic::save_session(&mut pool, &NewSession::new(t, 25, 150).with_sets(sets.clone()))
        .unwrap();
    let b = SessionLogic::save_session(&mut pool, &NewSession::new(t, 25, 150)).unwrap();
    assert_ne!(a, b);

    let stored = SessionLogic::get_session(&mut pool, a).unwrap();
    assert_eq!(stored.sets, Some(sets));
    assert!(matches!(
        SessionLogic::get_session(&mut pool, 9999),
        Err(AppError::SessionNotFound(9999))
    ));
}

#[test]
fn sessions_are_listed_newest_first() {
    let mut pool = memory_pool();
    for d in [day(2024, 5, 2), day(2024, 5, 4), day(2024, 5, 3)] {
        SessionLogic::save_session(&mut pool, &NewSession::new(noon(d), 10, 60)).unwrap();
    }
    let dates: Vec<_> = SessionLogic::get_all_sessions(&mut pool)
        .unwrap()
        .iter()
        .map(|s| s.local_day())
        .collect();
    assert_eq!(dates, vec![day(2024, 5, 4), day(2024, 5, 3), day(2024, 5, 2)]);
}

#[test]
fn range_query_includes_both_ends() {
    let mut pool = memory_pool();
    let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();

    for at in [
        start - Duration::milliseconds(1),
        start,
        start + Duration::days(3),
        end,
        end + Duration::milliseconds(1),
    ] {
        SessionLogic::save_session(&mut pool, &NewSession::new(at, 5, 10)).unwrap();
    }

    let got = SessionLogic::get_sessions_in_range(&mut pool, &start, &end).unwrap();
    assert_eq!(got.len(), 3);
    assert!(got.iter().all(|s| s.date >= start && s.date <= end));

    // inverted range
    assert!(SessionLogic::get_sessions_in_range(&mut pool, &end, &start)
        .unwrap()
        .is_empty());
}

#[test]
fn today_sessions_follow_the_local_day() {
    let mut pool = memory_pool();
    let today = day(2024, 6, 15);
    let clock = clock_at(today, 18);

    SessionLogic::save_session(&mut pool, &NewSession::new(noon(today), 20, 60)).unwrap();
    SessionLogic::save_session(&mut pool, &NewSession::new(noon(day(2024, 6, 14)), 20, 60)).unwrap();
    SessionLogic::save_session(&mut pool, &NewSession::new(noon(day(2024, 6, 16)), 20, 60)).unwrap();

    let got = SessionLogic::get_today_sessions(&mut pool, &clock).unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].local_day(), today);
}

#[test]
fn delete_variants_touch_only_their_targets() {
    let mut pool = memory_pool();
    let today = day(2024, 8, 20);
    let clock = clock_at(today, 9);

    let mut ids = Vec::new();
    for back in 0..6 {
        let d = today - Duration::days(back);
        ids.push(SessionLogic::save_session(&mut pool, &NewSession::new(noon(d), 10, 30)).unwrap());
    }

    assert!(DeleteLogic::delete_session(&mut pool, ids[0]).unwrap());
    assert!(!DeleteLogic::delete_session(&mut pool, ids[0]).unwrap());

    assert_eq!(DeleteLogic::delete_sessions(&mut pool, &[ids[1], 4242]).unwrap(), 1);

    assert_eq!(
        DeleteLogic::delete_sessions_on_date(&mut pool, today - Duration::days(2)).unwrap(),
        1
    );

    // only the session 5 days back started before local midnight 4 days ago
    assert_eq!(DeleteLogic::delete_sessions_older_than(&mut pool, 4, &clock).unwrap(), 1);

    let left: Vec<_> = SessionLogic::get_all_sessions(&mut pool)
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(left, vec![ids[3], ids[4]]);
}

#[test]
fn clear_all_is_idempotent_and_keeps_settings() {
    let mut pool = memory_pool();
    let today = day(2024, 4, 1);
    SettingsLogic::update_settings(
        &mut pool,
        &SettingsPatch {
            daily_goal: Some(80),
            ..Default::default()
        },
    )
    .unwrap();
    SessionLogic::save_session(&mut pool, &NewSession::new(noon(today), 120, 300)).unwrap();
    assert!(!AchievementLogic::evaluate_and_unlock(&mut pool, &clock_at(today, 20))
        .unwrap()
        .is_empty());

    let settings_before = SettingsLogic::get_settings(&mut pool).unwrap();

    assert_eq!(DeleteLogic::clear_all_sessions(&mut pool).unwrap(), 1);
    assert_eq!(DeleteLogic::clear_all_sessions(&mut pool).unwrap(), 0);

    assert!(SessionLogic::get_all_sessions(&mut pool).unwrap().is_empty());
    assert!(AchievementLogic::list(&mut pool).unwrap().iter().all(|a| !a.unlocked));
    assert_eq!(SettingsLogic::get_settings(&mut pool).unwrap(), settings_before);
    assert_eq!(settings_before.daily_goal, 80);
}

#[test]
fn reset_restores_default_settings() {
    let mut pool = memory_pool();
    SettingsLogic::update_settings(
        &mut pool,
        &SettingsPatch {
            daily_goal: Some(10),
            dark_mode: Some(true),
            ..Default::default()
        },
    )
    .unwrap();
    SessionLogic::save_session(&mut pool, &NewSession::new(Utc::now(), 5, 5)).unwrap();

    DeleteLogic::reset_everything(&mut pool).unwrap();

    assert!(SessionLogic::get_all_sessions(&mut pool).unwrap().is_empty());
    assert_eq!(SettingsLogic::get_settings(&mut pool).unwrap(), AppSettings::default());
    let rows: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM settings", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn settings_default_is_not_persisted_until_updated() {
    let mut pool = memory_pool();
    let count = |pool: &repcount::db::DbPool| -> i64 {
        pool.conn
            .query_row("SELECT COUNT(*) FROM settings", [], |r| r.get(0))
            .unwrap()
    };

    assert_eq!(SettingsLogic::get_settings(&mut pool).unwrap(), AppSettings::default());
    assert_eq!(count(&pool), 0);

    let merged = SettingsLogic::update_settings(
        &mut pool,
        &SettingsPatch {
            sound_enabled: Some(false),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(!merged.sound_enabled);
    assert_eq!(merged.daily_goal, 50);
    assert_eq!(count(&pool), 1);

    // a second update merges over the first one, still a single row
    let merged = SettingsLogic::update_settings(
        &mut pool,
        &SettingsPatch {
            daily_goal: Some(120),
            reminder_time: Some("7:05".into()),
            days_of_week: Some(vec![4, 0, 4]),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(!merged.sound_enabled);
    assert_eq!(merged.daily_goal, 120);
    assert_eq!(merged.reminder_time.as_deref(), Some("07:05"));
    assert_eq!(merged.days_of_week, Some(vec![0, 4]));
    assert_eq!(count(&pool), 1);
    assert_eq!(SettingsLogic::get_settings(&mut pool).unwrap(), merged);
}

#[test]
fn invalid_settings_leave_the_row_untouched() {
    let mut pool = memory_pool();
    init_and_seed(&pool.conn).unwrap();

    for patch in [
        SettingsPatch {
            daily_goal: Some(0),
            ..Default::default()
        },
        SettingsPatch {
            daily_goal: Some(1001),
            ..Default::default()
        },
        SettingsPatch {
            reminder_time: Some("25:00".into()),
            ..Default::default()
        },
        SettingsPatch {
            days_of_week: Some(vec![7]),
            ..Default::default()
        },
    ] {
        assert!(SettingsLogic::update_settings(&mut pool, &patch).is_err());
    }
    assert_eq!(SettingsLogic::get_settings(&mut pool).unwrap(), AppSettings::default());
}

#[test]
fn reopening_a_store_keeps_its_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite").to_string_lossy().to_string();

    {
        let mut pool = repcount::db::DbPool::open(&path).unwrap();
        SessionLogic::save_session(&mut pool, &NewSession::new(Utc::now(), 42, 90)).unwrap();
    }

    let mut pool = repcount::db::DbPool::open(&path).unwrap();
    let all = SessionLogic::get_all_sessions(&mut pool).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].push_ups, 42);
    assert_eq!(
        repcount::db::migrate::current_version(&pool.conn).unwrap(),
        repcount::db::migrate::SCHEMA_VERSION
    );
}

#[test]
fn achievements_unlock_once_and_stay_unlocked() {
    let mut pool = memory_pool();
    let today = day(2024, 6, 10);
    for back in 0..3 {
        let d = today - Duration::days(back);
        SessionLogic::save_session(&mut pool, &NewSession::new(noon(d), 40, 60)).unwrap();
    }

    let fresh = AchievementLogic::evaluate_and_unlock(&mut pool, &clock_at(today, 21)).unwrap();
    let mut ids: Vec<_> = fresh.iter().map(|a| a.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["first_session", "streak_3", "total_100"]);
    assert!(fresh.iter().all(|a| a.unlocked && a.unlocked_date.is_some()));

    // nothing new the second time
    assert!(AchievementLogic::evaluate_and_unlock(&mut pool, &clock_at(today, 22))
        .unwrap()
        .is_empty());

    // streak broken later: the unlock sticks
    let later = today + Duration::days(5);
    AchievementLogic::evaluate_and_unlock(&mut pool, &clock_at(later, 9)).unwrap();
    let streak = AchievementLogic::list(&mut pool)
        .unwrap()
        .into_iter()
        .find(|a| a.id == "streak_3")
        .unwrap();
    assert!(streak.unlocked);
}
