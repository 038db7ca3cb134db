mod common;
use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{clock_at, day, memory_pool};
use repcount::core::counter::{Counter, CounterState};
use repcount::core::reminder::{
    DAILY_REMINDER_ID, LogScheduler, ReminderScheduler, next_reminder, sync_reminder,
};
use repcount::db::log::load_log;
use repcount::errors::AppResult;
use repcount::models::AppSettings;
use repcount::utils::Clock;
use repcount::utils::date::local_to_utc;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap()
}

fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

#[test]
fn first_rep_starts_the_counter() {
    let mut c = Counter::new(None);
    assert_eq!(c.state(), CounterState::Idle);
    c.add_reps(1, at(0));
    assert_eq!(c.state(), CounterState::Running);
    assert_eq!(c.reps(), 1);
}

#[test]
fn reps_are_ignored_while_paused() {
    let mut c = Counter::new(None);
    c.add_reps(3, at(0));
    c.pause(at(5));
    c.add_reps(10, at(6));
    assert_eq!(c.reps(), 3);
    c.resume(at(10));
    c.add_reps(2, at(11));
    assert_eq!(c.reps(), 5);
}

#[test]
fn pause_closes_the_current_set() {
    let mut c = Counter::new(None);
    c.add_reps(10, at(0));
    c.pause(at(20));
    assert_eq!(c.sets().len(), 1);
    assert_eq!(c.sets()[0].reps, 10);
    assert_eq!(c.sets()[0].rest_time, 0);

    // pausing again records nothing
    c.resume(at(30));
    c.pause(at(31));
    assert_eq!(c.sets().len(), 1);
}

#[test]
fn elapsed_time_excludes_pauses() {
    let mut c = Counter::new(None);
    c.start(at(0));
    c.add_reps(5, at(1));
    c.pause(at(30));
    assert_eq!(c.elapsed_secs(at(100)), 30);
    c.resume(at(100));
    assert_eq!(c.elapsed_secs(at(110)), 40);

    let s = c.finish(at(120)).expect("session with reps");
    assert_eq!(s.duration, 50);
    assert_eq!(s.date, at(0));
    assert_eq!(s.push_ups, 5);
}

#[test]
fn rest_time_is_the_gap_since_the_previous_set() {
    let mut c = Counter::new(Some(30));
    c.add_reps(10, at(0));
    c.complete_set(at(20));
    c.add_reps(8, at(80));
    c.complete_set(at(95));
    c.add_reps(4, at(100));

    let s = c.finish(at(130)).unwrap();
    let sets = s.sets.expect("sets recorded");
    let shape: Vec<_> = sets.iter().map(|r| (r.reps, r.rest_time)).collect();
    assert_eq!(shape, vec![(10, 0), (8, 75), (4, 35)]);
    assert_eq!(s.push_ups, 22);
    assert_eq!(s.goal, Some(30));
}

#[test]
fn empty_sets_are_not_recorded() {
    let mut c = Counter::new(None);
    c.start(at(0));
    c.complete_set(at(10));
    assert!(c.sets().is_empty());
}

#[test]
fn finishing_without_reps_yields_nothing() {
    let mut idle = Counter::new(None);
    assert!(idle.finish(at(0)).is_none());
    assert_eq!(idle.state(), CounterState::Finished);

    let mut started = Counter::new(None);
    started.start(at(0));
    started.pause(at(10));
    assert!(started.finish(at(20)).is_none());
    assert_eq!(started.state(), CounterState::Finished);
}

#[test]
fn finished_counter_stays_finished() {
    let mut c = Counter::new(None);
    c.add_reps(4, at(0));
    assert!(c.finish(at(5)).is_some());
    c.add_reps(4, at(6));
    c.resume(at(7));
    assert_eq!(c.state(), CounterState::Finished);
    assert!(c.finish(at(8)).is_none());
}

fn reminder_settings(time: Option<&str>, days: Option<Vec<u8>>) -> AppSettings {
    AppSettings {
        reminder_time: time.map(str::to_string),
        days_of_week: days,
        ..Default::default()
    }
}

#[test]
fn next_reminder_later_today_or_tomorrow() {
    // 2024-03-20 is a Wednesday
    let wed = day(2024, 3, 20);
    let s = reminder_settings(Some("07:30"), None);

    let early = clock_at(wed, 6).now();
    assert_eq!(
        next_reminder(&s, early),
        Some(local_to_utc(wed.and_hms_opt(7, 30, 0).unwrap()))
    );

    let late = clock_at(wed, 9).now();
    let thu = day(2024, 3, 21);
    assert_eq!(
        next_reminder(&s, late),
        Some(local_to_utc(thu.and_hms_opt(7, 30, 0).unwrap()))
    );
}

#[test]
fn next_reminder_honours_weekdays() {
    let wed = day(2024, 3, 20);
    // Friday and Monday
    let s = reminder_settings(Some("19:00"), Some(vec![0, 4]));
    let fri = day(2024, 3, 22);
    assert_eq!(
        next_reminder(&s, clock_at(wed, 8).now()),
        Some(local_to_utc(fri.and_hms_opt(19, 0, 0).unwrap()))
    );

    // Wednesday only, already past: one week later
    let s = reminder_settings(Some("07:00"), Some(vec![2]));
    let next_wed = day(2024, 3, 27);
    assert_eq!(
        next_reminder(&s, clock_at(wed, 8).now()),
        Some(local_to_utc(next_wed.and_hms_opt(7, 0, 0).unwrap()))
    );
}

#[test]
fn no_reminder_without_a_time() {
    let s = reminder_settings(None, Some(vec![1]));
    assert_eq!(next_reminder(&s, clock_at(day(2024, 3, 20), 8).now()), None);
}

#[derive(Default)]
struct RecordingScheduler {
    scheduled: Vec<(String, DateTime<Utc>, String)>,
    cancelled: Vec<String>,
}

impl ReminderScheduler for RecordingScheduler {
    fn schedule(&mut self, id: &str, at: DateTime<Utc>, message: &str) -> AppResult<()> {
        self.scheduled.push((id.to_string(), at, message.to_string()));
        Ok(())
    }

    fn cancel(&mut self, id: &str) -> AppResult<()> {
        self.cancelled.push(id.to_string());
        Ok(())
    }

    fn cancel_all(&mut self) -> AppResult<()> {
        self.scheduled.clear();
        Ok(())
    }
}

#[test]
fn sync_replaces_the_daily_reminder() {
    let mut sched = RecordingScheduler::default();
    let wed = day(2024, 3, 20);
    let s = AppSettings {
        daily_goal: 80,
        ..reminder_settings(Some("18:00"), None)
    };

    let at = sync_reminder(&mut sched, &s, clock_at(wed, 8).now()).unwrap();
    assert_eq!(at, Some(local_to_utc(wed.and_hms_opt(18, 0, 0).unwrap())));
    assert_eq!(sched.cancelled, vec![DAILY_REMINDER_ID.to_string()]);
    assert_eq!(sched.scheduled.len(), 1);
    assert_eq!(sched.scheduled[0].0, DAILY_REMINDER_ID);
    assert!(sched.scheduled[0].2.contains("80"));
}

#[test]
fn sync_only_cancels_when_reminders_are_off() {
    let mut sched = RecordingScheduler::default();
    let s = reminder_settings(None, None);
    let at = sync_reminder(&mut sched, &s, clock_at(day(2024, 3, 20), 8).now()).unwrap();
    assert_eq!(at, None);
    assert_eq!(sched.cancelled.len(), 1);
    assert!(sched.scheduled.is_empty());
}

#[test]
fn log_scheduler_records_each_plan() {
    let pool = memory_pool();
    let wed = day(2024, 3, 20);
    let s = reminder_settings(Some("18:00"), None);

    let mut sched = LogScheduler::new(&pool.conn);
    sync_reminder(&mut sched, &s, clock_at(wed, 8).now()).unwrap();
    sync_reminder(&mut sched, &reminder_settings(None, None), clock_at(wed, 9).now()).unwrap();

    let entries: Vec<_> = load_log(&pool.conn)
        .unwrap()
        .into_iter()
        .filter(|e| e.operation == "reminder")
        .collect();
    let messages: Vec<_> = entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], "cancelled");
    assert!(messages[1].starts_with("scheduled 2024-03-20 18:00"));
    assert_eq!(messages[2], "cancelled");
    assert!(entries.iter().all(|e| e.target == DAILY_REMINDER_ID));
}
