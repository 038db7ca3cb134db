mod common;
use chrono::Duration;
use common::{clock_at, day, memory_pool, noon, session};
use repcount::core::stats::{
    Period, StatsSummary, average_per_session, best_day, current_streak, period_buckets,
    period_stats,
};
use repcount::core::{SessionLogic, SettingsLogic, StatsLogic};
use repcount::models::{NewSession, SettingsPatch};

#[test]
fn streak_counts_consecutive_days_ending_today() {
    let today = day(2024, 3, 20);
    for k in 0..5u32 {
        let mut sessions: Vec<_> = (0..=k as i64)
            .map(|back| session(back, noon(today - Duration::days(back)), 10, 10))
            .collect();
        // gap at D-k-1, then older activity that must not count
        sessions.push(session(99, noon(today - Duration::days(k as i64 + 2)), 10, 10));
        assert_eq!(current_streak(&sessions, today), k + 1);
    }
}

#[test]
fn streak_is_zero_without_a_session_today() {
    let today = day(2024, 3, 20);
    let sessions = vec![session(1, noon(today - Duration::days(1)), 10, 10)];
    assert_eq!(current_streak(&sessions, today), 0);
    assert_eq!(current_streak(&[], today), 0);
}

#[test]
fn several_sessions_on_one_day_count_once_for_streak() {
    let today = day(2024, 3, 20);
    let sessions = vec![
        session(1, noon(today), 10, 10),
        session(2, noon(today) + Duration::hours(2), 10, 10),
        session(3, noon(today - Duration::days(1)), 10, 10),
    ];
    assert_eq!(current_streak(&sessions, today), 2);
}

#[test]
fn best_day_sums_sessions_and_prefers_the_earliest_tie() {
    let sessions = vec![
        session(1, noon(day(2024, 1, 1)), 30, 0),
        session(2, noon(day(2024, 1, 1)) + Duration::hours(1), 30, 0),
        session(3, noon(day(2024, 1, 5)), 50, 0),
        session(4, noon(day(2024, 1, 9)), 60, 0),
    ];
    assert_eq!(best_day(&sessions), Some((day(2024, 1, 1), 60)));
    assert_eq!(best_day(&[]), None);
}

#[test]
fn average_rounds_to_nearest() {
    let t = noon(day(2024, 1, 1));
    assert_eq!(average_per_session(&[]), 0);
    assert_eq!(
        average_per_session(&[session(1, t, 10, 0), session(2, t, 11, 0)]),
        11
    );
    assert_eq!(
        average_per_session(&[session(1, t, 10, 0), session(2, t, 10, 0), session(3, t, 11, 0)]),
        10
    );
}

#[test]
fn bucket_shapes_per_period() {
    let today = day(2024, 3, 15);

    let week = period_buckets(Period::Week, today, None);
    assert_eq!(week.len(), 7);
    assert_eq!(week[6].start, today);
    assert_eq!(week[0].start, day(2024, 3, 9));

    let month = period_buckets(Period::Month, today, None);
    assert_eq!(month.len(), 4);
    assert_eq!(month[3].end, today);
    assert_eq!(month[3].start, day(2024, 3, 9));
    assert_eq!(month[0].start, day(2024, 2, 17));

    let year = period_buckets(Period::Year, today, None);
    assert_eq!(year.len(), 12);
    assert_eq!(year[11].start, day(2024, 3, 1));
    assert_eq!(year[11].end, day(2024, 3, 31));
    assert_eq!(year[0].start, day(2023, 4, 1));

    let all = period_buckets(Period::All, today, Some(day(2021, 7, 4)));
    let labels: Vec<_> = all.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["2021", "2022", "2023", "2024"]);
}

#[test]
fn period_stats_sum_into_the_right_buckets() {
    let today = day(2024, 3, 15);
    let sessions = vec![
        session(1, noon(today), 20, 60),
        session(2, noon(today) + Duration::hours(3), 5, 30),
        session(3, noon(today - Duration::days(6)), 7, 10),
        // outside the week
        session(4, noon(today - Duration::days(7)), 100, 100),
    ];

    let week = period_stats(&sessions, Period::Week, today);
    assert_eq!(week.buckets[6].push_ups, 25);
    assert_eq!(week.buckets[6].sessions, 2);
    assert_eq!(week.buckets[6].duration, 90);
    assert_eq!(week.buckets[0].push_ups, 7);
    assert_eq!(week.push_ups, 32);
    assert_eq!(week.sessions, 3);

    let month = period_stats(&sessions, Period::Month, today);
    assert_eq!(month.push_ups, 132);
    assert_eq!(month.buckets[2].push_ups, 100);
}

#[test]
fn period_names_parse() {
    assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
    assert_eq!("M".parse::<Period>().unwrap(), Period::Month);
    assert_eq!("all".parse::<Period>().unwrap(), Period::All);
    assert!("decade".parse::<Period>().is_err());
}

#[test]
fn goal_is_reached_when_today_meets_the_daily_goal() {
    let today = day(2024, 7, 1);
    let mut pool = memory_pool();
    SettingsLogic::update_settings(
        &mut pool,
        &SettingsPatch {
            daily_goal: Some(50),
            ..Default::default()
        },
    )
    .unwrap();
    SessionLogic::save_session(&mut pool, &NewSession::new(noon(today), 35, 60)).unwrap();
    SessionLogic::save_session(&mut pool, &NewSession::new(noon(today) + Duration::hours(1), 25, 60))
        .unwrap();

    let s = StatsLogic::summary(&mut pool, &clock_at(today, 20)).unwrap();
    assert_eq!(s.today_push_ups, 60);
    assert!(s.goal_reached);
    assert_eq!(s.today_progress, 100);
    assert_eq!(s.current_streak, 1);
}

#[test]
fn summary_of_an_empty_history() {
    let s = StatsSummary::compute(&[], 50, day(2024, 1, 1));
    assert_eq!(s.total_push_ups, 0);
    assert_eq!(s.average_per_session, 0);
    assert_eq!(s.best_day, None);
    assert!(!s.goal_reached);
    assert_eq!(s.today_progress, 0);
}
