#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use repcount::db::DbPool;
use repcount::models::WorkoutSession;
use repcount::utils::FixedClock;
use repcount::utils::date::local_to_utc;
use std::path::Path;
use tempfile::TempDir;

/// Binary under test, with HOME pointed into `home` so no real config is touched.
pub fn rc(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("repcount");
    cmd.env("HOME", home);
    cmd
}

/// Temp home plus a DB path inside it, initialized with `--test init`.
pub fn setup_test_db() -> (TempDir, String) {
    let home = tempfile::tempdir().expect("create temp home");
    let db_path = home
        .path()
        .join("test_repcount.sqlite")
        .to_string_lossy()
        .to_string();

    rc(home.path())
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    (home, db_path)
}

pub fn temp_out(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().to_string()
}

pub fn memory_pool() -> DbPool {
    DbPool::open_in_memory().expect("in-memory store")
}

/// Local noon of `day` as UTC; noon keeps DST transitions out of the way.
pub fn noon(day: NaiveDate) -> DateTime<Utc> {
    local_to_utc(day.and_hms_opt(12, 0, 0).expect("valid time"))
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn clock_at(day: NaiveDate, hour: u32) -> FixedClock {
    let naive = day.and_hms_opt(hour, 0, 0).expect("valid time");
    FixedClock(Local.from_local_datetime(&naive).earliest().expect("local time"))
}

/// Plain session value for the pure statistics functions.
pub fn session(id: i64, date: DateTime<Utc>, push_ups: u32, duration: u32) -> WorkoutSession {
    WorkoutSession {
        id,
        date,
        push_ups,
        duration,
        goal: None,
        sets: None,
    }
}
