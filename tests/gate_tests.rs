use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{cg, checkin_at, enroll, failed_checkin_at, init_db, setup_test_db};

#[test]
fn test_rfid_scan_creates_event_and_attendance() {
    let db_path = setup_test_db("rfid_scan");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    cg().args([
        "--db",
        &db_path,
        "scan",
        "--rfid",
        "TAG-001",
        "--action",
        "entry",
        "--date",
        "2024-05-01",
        "--time",
        "07:30",
    ])
    .assert()
    .success()
    .stdout(contains("entry granted"))
    .stdout(contains("rfid"));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");

    let events: i64 = conn
        .query_row("SELECT COUNT(*) FROM gate_events", [], |r| r.get(0))
        .expect("count events");
    assert_eq!(events, 1);

    let (present, first_entry): (i64, Option<String>) = conn
        .query_row(
            "SELECT present, first_entry_time FROM attendance WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .expect("load attendance");

    assert_eq!(present, 1);
    assert_eq!(first_entry.as_deref(), Some("07:30:00"));
}

#[test]
fn test_scan_unknown_rfid_falls_back_to_manual() {
    let db_path = setup_test_db("unknown_rfid");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    // No match is a normal outcome: exit 0, nothing written
    cg().args(["--db", &db_path, "scan", "--rfid", "TAG-999"])
        .assert()
        .success()
        .stdout(contains("No matching student found"))
        .stdout(contains("manual check-in"));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let events: i64 = conn
        .query_row("SELECT COUNT(*) FROM gate_events", [], |r| r.get(0))
        .expect("count events");
    assert_eq!(events, 0);
}

#[test]
fn test_scan_without_credentials_is_rejected() {
    let db_path = setup_test_db("scan_no_credentials");
    init_db(&db_path);

    cg().args(["--db", &db_path, "scan"])
        .assert()
        .failure()
        .stderr(contains("--rfid or --sample"));
}

#[test]
fn test_biometric_scan_matches_enrolled_sample() {
    let db_path = setup_test_db("biometric_scan");
    init_db(&db_path);

    cg().args([
        "--db",
        &db_path,
        "enroll",
        "S002",
        "--name",
        "Ada Lovelace",
        "--sample",
        "A1 B2 C3 D4",
    ])
    .assert()
    .success()
    .stdout(contains("Biometric sample enrolled"));

    // template matching is case- and whitespace-insensitive
    cg().args([
        "--db",
        &db_path,
        "scan",
        "--sample",
        "  a1 b2   c3 d4 ",
        "--date",
        "2024-05-01",
        "--time",
        "08:00",
    ])
    .assert()
    .success()
    .stdout(contains("entry granted"))
    .stdout(contains("Ada Lovelace"))
    .stdout(contains("face_scan"));
}

#[test]
fn test_first_entry_time_is_set_exactly_once() {
    let db_path = setup_test_db("first_entry_once");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    checkin_at(&db_path, "S001", "entry", "2024-05-01", "08:15");

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let first_entry: String = conn
        .query_row(
            "SELECT first_entry_time FROM attendance WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| r.get(0),
        )
        .expect("load first_entry_time");

    // the second entry must not overwrite the first
    assert_eq!(first_entry, "07:30:00");
}

#[test]
fn test_last_exit_time_is_overwritten() {
    let db_path = setup_test_db("last_exit_wins");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    checkin_at(&db_path, "S001", "exit", "2024-05-01", "12:00");
    checkin_at(&db_path, "S001", "entry", "2024-05-01", "13:00");
    checkin_at(&db_path, "S001", "exit", "2024-05-01", "16:05");

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let last_exit: String = conn
        .query_row(
            "SELECT last_exit_time FROM attendance WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| r.get(0),
        )
        .expect("load last_exit_time");

    // latest exit always wins
    assert_eq!(last_exit, "16:05:00");
}

#[test]
fn test_attendance_row_is_unique_per_student_and_day() {
    let db_path = setup_test_db("attendance_unique");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    for time in ["07:30", "08:00", "12:00", "13:00", "16:00"] {
        let action = if time < "12:30" { "entry" } else { "exit" };
        checkin_at(&db_path, "S001", action, "2024-05-01", time);
    }

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM attendance WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| r.get(0),
        )
        .expect("count attendance");

    assert_eq!(rows, 1, "events must reduce to a single attendance row");
}

#[test]
fn test_concurrent_checkins_keep_attendance_unique() {
    let db_path = setup_test_db("concurrent_checkins");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    // two simultaneous first-events for the same (student, date): the
    // race loser must land as an update, never as a second row
    let handles: Vec<_> = ["07:30", "07:31"]
        .into_iter()
        .map(|time| {
            let db = db_path.clone();
            std::thread::spawn(move || {
                cg().args([
                    "--db",
                    &db,
                    "checkin",
                    "S001",
                    "--action",
                    "entry",
                    "--date",
                    "2024-05-01",
                    "--time",
                    time,
                ])
                .assert()
                .success();
            })
        })
        .collect();

    for h in handles {
        h.join().expect("checkin thread panicked");
    }

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM attendance WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| r.get(0),
        )
        .expect("count attendance");
    let events: i64 = conn
        .query_row("SELECT COUNT(*) FROM gate_events", [], |r| r.get(0))
        .expect("count events");

    assert_eq!(rows, 1);
    assert_eq!(events, 2);
}

#[test]
fn test_failed_checkin_logs_event_without_presence() {
    let db_path = setup_test_db("failed_checkin");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    failed_checkin_at(&db_path, "S001", "2024-05-01", "07:45");

    let conn = rusqlite::Connection::open(&db_path).expect("open db");

    let (success, reason): (i64, String) = conn
        .query_row(
            "SELECT success, reason FROM gate_events WHERE student_id = 'S001'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .expect("load event");
    assert_eq!(success, 0);
    assert_eq!(reason, "Card rejected");

    // the day's record exists so reconciliation can see the student,
    // but the failure granted no presence
    let (present, first_entry): (i64, Option<String>) = conn
        .query_row(
            "SELECT present, first_entry_time FROM attendance WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .expect("load attendance");
    assert_eq!(present, 0);
    assert!(first_entry.is_none());
}

#[test]
fn test_checkin_unknown_student_is_not_found() {
    let db_path = setup_test_db("checkin_unknown");
    init_db(&db_path);

    cg().args(["--db", &db_path, "checkin", "GHOST"])
        .assert()
        .failure()
        .stderr(contains("Student not found: GHOST"));
}

#[test]
fn test_enroll_duplicate_student_is_rejected() {
    let db_path = setup_test_db("enroll_duplicate");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    cg().args(["--db", &db_path, "enroll", "S001", "--rfid", "TAG-002"])
        .assert()
        .failure()
        .stderr(contains("already enrolled"));
}

#[test]
fn test_list_shows_attendance_and_events() {
    let db_path = setup_test_db("list_day");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    checkin_at(&db_path, "S001", "exit", "2024-05-01", "16:05");

    cg().args(["--db", &db_path, "list", "2024-05-01"])
        .assert()
        .success()
        .stdout(contains("S001"))
        .stdout(contains("present"))
        .stdout(contains("07:30"))
        .stdout(contains("16:05"));

    cg().args(["--db", &db_path, "list", "2024-05-01", "--events"])
        .assert()
        .success()
        .stdout(contains("entry"))
        .stdout(contains("exit"))
        .stdout(contains("Manual check-in"));

    // month period includes the day, another month does not
    cg().args(["--db", &db_path, "list", "2024-05"])
        .assert()
        .success()
        .stdout(contains("May 2024"))
        .stdout(contains("S001"));

    cg().args(["--db", &db_path, "list", "2024-06"])
        .assert()
        .success()
        .stdout(contains("No data for the selected period."))
        .stdout(contains("S001").not());
}

#[test]
fn test_list_invalid_period() {
    let db_path = setup_test_db("list_invalid_period");
    init_db(&db_path);

    cg().args(["--db", &db_path, "list", "2024-5"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}
