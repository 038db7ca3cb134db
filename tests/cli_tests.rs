mod common;
use common::{rc, setup_test_db, temp_out};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;

fn add(home: &Path, db: &str, args: &[&str]) {
    let mut full = vec!["--db", db, "add"];
    full.extend_from_slice(args);
    rc(home).args(&full).assert().success();
}

#[test]
fn init_creates_database() {
    let (home, db_path) = setup_test_db();
    assert!(Path::new(&db_path).exists());
    // test mode never writes the config file
    assert!(!home.path().join(".repcount").join("repcount.conf").exists());
}

#[test]
fn add_then_list_and_stats() {
    let (home, db) = setup_test_db();

    rc(home.path())
        .args(["--db", &db, "add", "25", "-d", "90", "--date", "2024-03-01 08:00"])
        .assert()
        .success()
        .stdout(contains("Session #1 saved: 25 push-ups"))
        .stdout(contains("Achievement unlocked").and(contains("First Steps")));

    add(home.path(), &db, &["30", "--date", "2024-03-02 09:15"]);
    add(home.path(), &db, &["5", "--date", "2024-04-10"]);

    rc(home.path())
        .args(["--db", &db, "list", "--range", "2024-03"])
        .assert()
        .success()
        .stdout(contains("2024-03-01 08:00"))
        .stdout(contains("2 sessions, 55 push-ups"));

    rc(home.path())
        .args(["--db", &db, "list", "--range", "2024-03-02:2024-04-30"])
        .assert()
        .success()
        .stdout(contains("2 sessions, 35 push-ups"));

    rc(home.path())
        .args(["--db", &db, "list", "-r", "2023-01-01"])
        .assert()
        .success()
        .stdout(contains("No sessions found."));

    rc(home.path())
        .args(["--db", &db, "stats", "--period", "all"])
        .assert()
        .success()
        .stdout(contains("Total:").and(contains("60")))
        .stdout(contains("2024"))
        .stdout(contains("Best day:"));
}

#[test]
fn add_rejects_zero_and_bad_dates() {
    let (home, db) = setup_test_db();

    rc(home.path())
        .args(["--db", &db, "add", "0"])
        .assert()
        .failure()
        .stderr(contains("Invalid session"));

    rc(home.path())
        .args(["--db", &db, "add", "10", "--date", "yesterday-ish"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn stats_rejects_unknown_period() {
    let (home, db) = setup_test_db();
    rc(home.path())
        .args(["--db", &db, "stats", "-p", "decade"])
        .assert()
        .failure()
        .stderr(contains("unknown period"));
}

#[test]
fn settings_update_and_show() {
    let (home, db) = setup_test_db();

    rc(home.path())
        .args(["--db", &db, "settings"])
        .assert()
        .success()
        .stdout(contains("Daily goal:").and(contains("50")))
        .stdout(contains("every day"));

    rc(home.path())
        .args([
            "--db", &db, "settings", "--goal", "80", "--sound", "off", "--reminder", "7:05",
            "--days", "4,0",
        ])
        .assert()
        .success()
        .stdout(contains("Settings updated."))
        .stdout(contains("Next reminder:"));

    rc(home.path())
        .args(["--db", &db, "settings", "--show"])
        .assert()
        .success()
        .stdout(contains("80"))
        .stdout(contains("07:05"))
        .stdout(contains("0,4"))
        .stdout(contains("Next:"));

    rc(home.path())
        .args(["--db", &db, "settings", "--goal", "5000"])
        .assert()
        .failure()
        .stderr(contains("between 1 and 1000"));
}

#[test]
fn reminder_changes_are_planned_and_logged() {
    let (home, db) = setup_test_db();

    rc(home.path())
        .args(["--db", &db, "settings", "--reminder", "18:30"])
        .assert()
        .success()
        .stdout(contains("Next reminder:"));

    rc(home.path())
        .args(["--db", &db, "settings", "--reminder", ""])
        .assert()
        .success()
        .stdout(contains("Reminders are off."));

    // unrelated settings leave the plan alone
    rc(home.path())
        .args(["--db", &db, "settings", "--dark", "on"])
        .assert()
        .success()
        .stdout(contains("Reminders are off.").not());

    rc(home.path())
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("reminder").and(contains("scheduled")))
        .stdout(contains("cancelled"));
}

#[test]
fn del_by_id_and_by_date() {
    let (home, db) = setup_test_db();
    add(home.path(), &db, &["10", "--date", "2024-05-01 07:00"]);
    add(home.path(), &db, &["11", "--date", "2024-05-01 19:00"]);
    add(home.path(), &db, &["12", "--date", "2024-05-02 07:00"]);

    rc(home.path())
        .args(["--db", &db, "del", "--id", "3"])
        .assert()
        .success()
        .stdout(contains("Session #3 has been deleted."));

    rc(home.path())
        .args(["--db", &db, "del", "--id", "3"])
        .assert()
        .success()
        .stdout(contains("Session #3 not found."));

    rc(home.path())
        .args(["--db", &db, "del", "--date", "2024-05-01"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled."));

    rc(home.path())
        .args(["--db", &db, "del", "--date", "2024-05-01"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("2 sessions of 2024-05-01 deleted."));

    rc(home.path())
        .args(["--db", &db, "list"])
        .assert()
        .success()
        .stdout(contains("No sessions found."));
}

#[test]
fn del_needs_a_target() {
    let (home, db) = setup_test_db();
    rc(home.path()).args(["--db", &db, "del"]).assert().failure();
}

#[test]
fn reset_restores_default_settings() {
    let (home, db) = setup_test_db();
    add(home.path(), &db, &["10"]);
    rc(home.path())
        .args(["--db", &db, "settings", "--goal", "70"])
        .assert()
        .success();

    rc(home.path())
        .args(["--db", &db, "reset", "--force"])
        .assert()
        .success()
        .stdout(contains("Default settings restored"));

    rc(home.path())
        .args(["--db", &db, "settings"])
        .assert()
        .success()
        .stdout(contains("50"));
    rc(home.path())
        .args(["--db", &db, "list"])
        .assert()
        .success()
        .stdout(contains("No sessions found."));
}

#[test]
fn export_then_import_reports_duplicates() {
    let (home, db) = setup_test_db();
    add(home.path(), &db, &["20", "--date", "2024-02-01 10:00"]);
    add(home.path(), &db, &["22", "--date", "2024-02-02 10:00"]);

    let file = temp_out(&home, "out/sessions.json");
    rc(home.path())
        .args(["--db", &db, "export", "--file", &file])
        .assert()
        .success()
        .stdout(contains("JSON export completed"));
    assert!(fs::read_to_string(&file).unwrap().contains("\"pushUps\""));

    rc(home.path())
        .args(["--db", &db, "import", &file])
        .assert()
        .success()
        .stdout(contains("0 imported, 2 duplicates, 0 errors"));

    let (other_home, other_db) = setup_test_db();
    rc(other_home.path())
        .args(["--db", &other_db, "import", &file])
        .assert()
        .success()
        .stdout(contains("2 imported, 0 duplicates"));
    rc(other_home.path())
        .args(["--db", &other_db, "list"])
        .assert()
        .success()
        .stdout(contains("2 sessions, 42 push-ups"));
}

#[test]
fn export_csv_asks_before_overwriting() {
    let (home, db) = setup_test_db();
    add(home.path(), &db, &["20"]);
    let file = temp_out(&home, "sessions.csv");

    rc(home.path())
        .args(["--db", &db, "export", "--format", "csv", "--file", &file])
        .assert()
        .success();
    assert!(fs::read_to_string(&file).unwrap().starts_with("id,date"));

    rc(home.path())
        .args(["--db", &db, "export", "--format", "csv", "--file", &file, "--force"])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));
}

#[test]
fn import_failures_are_reported_not_fatal() {
    let (home, db) = setup_test_db();

    let txt = temp_out(&home, "notes.txt");
    fs::write(&txt, "hello").unwrap();
    rc(home.path())
        .args(["--db", &db, "import", &txt])
        .assert()
        .success()
        .stderr(contains("Import failed"))
        .stderr(contains("Invalid file"));

    let broken = temp_out(&home, "broken.json");
    fs::write(&broken, r#"{"version":"1.0"}"#).unwrap();
    rc(home.path())
        .args(["--db", &db, "import", &broken])
        .assert()
        .success()
        .stderr(contains("no 'sessions' list"));
}

#[test]
fn import_keeps_good_sessions_and_lists_bad_ones() {
    let (home, db) = setup_test_db();
    let file = temp_out(&home, "mixed.json");
    fs::write(
        &file,
        r#"{"sessions":[
            {"date":"2024-01-01T08:00:00Z","pushUps":10,"duration":60},
            {"date":"not a date","pushUps":5,"duration":30}
        ]}"#,
    )
    .unwrap();

    rc(home.path())
        .args(["--db", &db, "import", &file])
        .assert()
        .success()
        .stdout(contains("1 imported, 0 duplicates, 1 errors"))
        .stdout(contains("Session 2:"));
}

#[test]
fn config_check_without_file_uses_defaults() {
    let (home, db) = setup_test_db();
    rc(home.path())
        .args(["--db", &db, "config", "--check"])
        .assert()
        .success()
        .stdout(contains("defaults in use"))
        .stdout(contains("Configuration values are valid."));
}

#[test]
fn config_migrate_adds_missing_keys() {
    let (home, db) = setup_test_db();
    let dir = home.path().join(".repcount");
    fs::create_dir_all(&dir).unwrap();
    let conf = dir.join("repcount.conf");
    fs::write(&conf, "database: /tmp/x.sqlite\ndefault_period: month\n").unwrap();

    rc(home.path())
        .args(["--db", &db, "config", "--check"])
        .assert()
        .success()
        .stdout(contains("Missing fields").and(contains("cache_prefix")));

    rc(home.path())
        .args(["--db", &db, "config", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Added fields"));

    let migrated = fs::read_to_string(&conf).unwrap();
    assert!(migrated.contains("default_period: month"));
    assert!(migrated.contains("separator_char"));

    rc(home.path())
        .args(["--db", &db, "config", "--check"])
        .assert()
        .success()
        .stdout(contains("All configuration fields are present."));
}

#[test]
fn db_integrity_check() {
    let (home, db) = setup_test_db();
    rc(home.path())
        .args(["--db", &db, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed."));

    rc(home.path())
        .args(["--db", &db, "db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Schema already at v"));
}

#[test]
fn log_rows_can_be_filtered() {
    let (home, db) = setup_test_db();
    add(home.path(), &db, &["10", "--date", "2024-05-01 07:00"]);
    add(home.path(), &db, &["12", "--date", "2024-05-02 07:00"]);

    rc(home.path())
        .args(["--db", &db, "log", "--print", "--op", "add", "--last", "1"])
        .assert()
        .success()
        .stdout(contains("add (session 2)"))
        .stdout(contains("session 1").not())
        .stdout(contains("achievement").not());

    rc(home.path())
        .args(["--db", &db, "log", "--print", "--op", "backup"])
        .assert()
        .success()
        .stdout(contains("No matching log rows."));
}

/// A deployed build with every shell asset, tagged `version`.
fn deploy(dist: &Path, version: &str) {
    for dir in ["assets", "icons"] {
        fs::create_dir_all(dist.join(dir)).unwrap();
    }
    fs::write(dist.join("index.html"), format!("<title>repcount {}</title>", version)).unwrap();
    fs::write(dist.join("assets/app.js"), "console.log(1)").unwrap();
    fs::write(dist.join("assets/app.css"), "body{}").unwrap();
    fs::write(dist.join("manifest.webmanifest"), "{}").unwrap();
    fs::write(dist.join("icons/icon-192.png"), [0u8; 4]).unwrap();
    fs::write(dist.join("icons/icon-512.png"), [0u8; 4]).unwrap();
    fs::write(
        dist.join("sw-manifest.json"),
        format!(r#"{{"version":"{}"}}"#, version),
    )
    .unwrap();
}

#[test]
fn cache_lifecycle_against_a_build_directory() {
    let home = tempfile::tempdir().unwrap();
    let dist = home.path().join("dist");
    let cache_db = temp_out(&home, "cache.sqlite");
    let origin = dist.to_string_lossy().to_string();
    deploy(&dist, "v1");

    let cache = |args: &[&str]| {
        let mut cmd = rc(home.path());
        cmd.args(["--cache-db", &cache_db, "--origin", &origin, "cache"]);
        cmd.args(args);
        cmd
    };

    cache(&["status"])
        .assert()
        .success()
        .stdout(contains("Active:").and(contains("http://localhost")));

    cache(&["update"])
        .assert()
        .success()
        .stdout(contains("offline-ready (v1)"))
        .stdout(contains("Generation v1 installed and active."));

    cache(&["update"])
        .assert()
        .success()
        .stdout(contains("Already up to date."));

    cache(&["get", "/index.html", "--offline"])
        .assert()
        .success()
        .stdout(contains("200 basic text/html"))
        .stdout(contains("repcount v1"));

    cache(&["get", "/history/2024", "--offline", "--navigate"])
        .assert()
        .success()
        .stdout(contains("repcount v1"));

    cache(&["get", "/api/none.json", "--offline"])
        .assert()
        .success()
        .stdout(contains("503 synthetic"));

    cache(&["get", "https://cdn.example.com/x.js", "--offline"])
        .assert()
        .success()
        .stderr(contains("Request failed"));

    deploy(&dist, "v2");
    cache(&["update"])
        .assert()
        .success()
        .stdout(contains("update-available (v2)"))
        .stdout(contains("Generation v2 is waiting."));

    cache(&["status"])
        .assert()
        .success()
        .stdout(contains("v1").and(contains("v2")).and(contains("[waiting]")));

    cache(&["skip-waiting"])
        .assert()
        .success()
        .stdout(contains("update-installed (v2)"))
        .stdout(contains("Reloaded entry page"))
        .stdout(contains("Generation v2 is now active."));

    cache(&["skip-waiting"])
        .assert()
        .success()
        .stdout(contains("No generation is waiting."));

    cache(&["buckets"])
        .assert()
        .success()
        .stdout(contains("repcount-static-v2"))
        .stdout(contains("repcount-static-v1").not());

    cache(&["get", "/index.html", "--offline"])
        .assert()
        .success()
        .stdout(contains("repcount v2"));
}

#[test]
fn cache_update_with_incomplete_build_fails_cleanly() {
    let home = tempfile::tempdir().unwrap();
    let dist = home.path().join("dist");
    deploy(&dist, "v1");
    fs::remove_file(dist.join("assets/app.css")).unwrap();
    let cache_db = temp_out(&home, "cache.sqlite");
    let origin = dist.to_string_lossy().to_string();

    rc(home.path())
        .args(["--cache-db", &cache_db, "--origin", &origin, "cache", "update"])
        .assert()
        .success()
        .stderr(contains("install-failed (v1)"))
        .stderr(contains("Update failed"));

    rc(home.path())
        .args(["--cache-db", &cache_db, "--origin", &origin, "cache", "buckets"])
        .assert()
        .success()
        .stdout(contains("No cache buckets."));
}
