use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{cg, checkin_at, enroll, failed_checkin_at, init_db, setup_test_db};

#[test]
fn test_grant_access_creates_exactly_one_event() {
    let db_path = setup_test_db("grant_access");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    cg().args([
        "--db",
        &db_path,
        "override",
        "S001",
        "2024-05-01",
        "--type",
        "grant_access",
        "--reason",
        "Lost ID card",
    ])
    .assert()
    .success()
    .stdout(contains("access_granted"))
    .stdout(contains("Guardian notified."));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");

    let (events, reason, source): (i64, String, String) = conn
        .query_row(
            "SELECT COUNT(*), MAX(reason), MAX(source) FROM gate_events WHERE student_id = 'S001'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .expect("load events");
    assert_eq!(events, 1, "grant_access must create exactly one event");
    assert_eq!(reason, "Admin override: Lost ID card");
    assert_eq!(source, "override");

    let (present, verified, override_reason): (i64, i64, String) = conn
        .query_row(
            "SELECT present, verified, override_reason FROM attendance
             WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .expect("load attendance");
    assert_eq!(present, 1);
    assert_eq!(verified, 1);
    assert_eq!(override_reason, "Lost ID card");
}

#[test]
fn test_unknown_override_type_mutates_nothing() {
    let db_path = setup_test_db("bogus_override");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    cg().args([
        "--db",
        &db_path,
        "override",
        "S001",
        "2024-05-01",
        "--type",
        "bogus",
        "--reason",
        "Should not apply",
    ])
    .assert()
    .failure()
    .stderr(contains("Invalid override type: bogus"));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");

    let events: i64 = conn
        .query_row("SELECT COUNT(*) FROM gate_events", [], |r| r.get(0))
        .expect("count events");
    let records: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))
        .expect("count attendance");

    assert_eq!(events, 0);
    assert_eq!(records, 0);
}

#[test]
fn test_override_unknown_student_is_not_found() {
    let db_path = setup_test_db("override_unknown_student");
    init_db(&db_path);

    cg().args([
        "--db",
        &db_path,
        "override",
        "GHOST",
        "--type",
        "mark_present",
        "--reason",
        "Typo in id",
    ])
    .assert()
    .failure()
    .stderr(contains("Student not found: GHOST"));
}

#[test]
fn test_mark_present_and_mark_absent_toggle_presence() {
    let db_path = setup_test_db("mark_toggle");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    cg().args([
        "--db",
        &db_path,
        "override",
        "S001",
        "2024-05-01",
        "--type",
        "mark_present",
        "--reason",
        "Sensor missed the entry",
    ])
    .assert()
    .success()
    .stdout(contains("marked_present"));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let (present, first_entry): (i64, Option<String>) = conn
        .query_row(
            "SELECT present, first_entry_time FROM attendance
             WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .expect("load attendance");
    assert_eq!(present, 1);
    assert!(first_entry.is_some(), "mark_present backfills the entry time");

    cg().args([
        "--db",
        &db_path,
        "override",
        "S001",
        "2024-05-01",
        "--type",
        "mark_absent",
        "--reason",
        "Left early, never present",
    ])
    .assert()
    .success()
    .stdout(contains("marked_absent"));

    let present: i64 = conn
        .query_row(
            "SELECT present FROM attendance WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| r.get(0),
        )
        .expect("reload attendance");
    assert_eq!(present, 0);
}

#[test]
fn test_approve_daily_attendance_summary() {
    let db_path = setup_test_db("approve_daily");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");
    enroll(&db_path, "S002", "TAG-002");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    failed_checkin_at(&db_path, "S002", "2024-05-01", "07:45");

    cg().args([
        "--db",
        &db_path,
        "approve",
        "2024-05-01",
        "--by",
        "Dean Rivers",
    ])
    .assert()
    .success()
    .stdout(contains("Daily attendance approved for 2024-05-01."))
    .stdout(contains("Total students : 2"))
    .stdout(contains("Present        : 1"))
    .stdout(contains("Absent         : 1"))
    .stdout(contains("Dean Rivers"));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let (approved, verified): (i64, i64) = conn
        .query_row(
            "SELECT COALESCE(SUM(approved), 0), COALESCE(SUM(verified), 0)
             FROM attendance WHERE date = '2024-05-01'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .expect("load approvals");
    assert_eq!(approved, 2);
    assert_eq!(verified, 2);

    let approved_by: String = conn
        .query_row(
            "SELECT approved_by FROM attendance WHERE student_id = 'S002' AND date = '2024-05-01'",
            [],
            |r| r.get(0),
        )
        .expect("load approver");
    assert_eq!(approved_by, "Dean Rivers");
}

#[test]
fn test_approve_requires_approver() {
    let db_path = setup_test_db("approve_no_name");
    init_db(&db_path);

    cg().args(["--db", &db_path, "approve", "2024-05-01", "--by", "  "])
        .assert()
        .failure()
        .stderr(contains("approver must not be empty"));
}

#[test]
fn test_verify_sets_flag_and_notes() {
    let db_path = setup_test_db("verify_flag");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");

    cg().args([
        "--db",
        &db_path,
        "verify",
        "S001",
        "2024-05-01",
        "--notes",
        "Confirmed by homeroom teacher",
    ])
    .assert()
    .success()
    .stdout(contains("Attendance verified for S001 on 2024-05-01"));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let (verified, notes): (i64, String) = conn
        .query_row(
            "SELECT verified, verification_notes FROM attendance
             WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .expect("load verification");
    assert_eq!(verified, 1);
    assert_eq!(notes, "Confirmed by homeroom teacher");
}

#[test]
fn test_verify_missing_record_is_not_found() {
    let db_path = setup_test_db("verify_missing");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    cg().args(["--db", &db_path, "verify", "S001", "2024-05-01"])
        .assert()
        .failure()
        .stderr(contains("No attendance record for S001 on 2024-05-01"));
}

#[test]
fn test_verify_does_not_fabricate_entry_time_by_default() {
    let db_path = setup_test_db("verify_no_fabrication");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    // record exists (failed attempt), but no entry time
    failed_checkin_at(&db_path, "S001", "2024-05-01", "07:45");

    cg().args(["--db", &db_path, "verify", "S001", "2024-05-01"])
        .assert()
        .success();

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let first_entry: Option<String> = conn
        .query_row(
            "SELECT first_entry_time FROM attendance WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| r.get(0),
        )
        .expect("load first_entry_time");
    assert!(
        first_entry.is_none(),
        "verification must not invent an entry time unless configured to"
    );
}

#[test]
fn test_verify_fabricates_entry_time_when_configured() {
    let db_path = setup_test_db("verify_fabrication_on");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    failed_checkin_at(&db_path, "S001", "2024-05-01", "07:45");

    // config with the legacy behavior enabled, loaded via a scratch HOME
    let home = std::env::temp_dir().join("verify_fabrication_on_home");
    let conf_dir = home.join(".campusgate");
    fs::create_dir_all(&conf_dir).expect("create config dir");
    fs::write(
        conf_dir.join("campusgate.conf"),
        format!("database: {}\nverify_sets_entry_time: true\n", db_path),
    )
    .expect("write config");

    cg().env("HOME", &home)
        .args(["--db", &db_path, "verify", "S001", "2024-05-01"])
        .assert()
        .success();

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let first_entry: Option<String> = conn
        .query_row(
            "SELECT first_entry_time FROM attendance WHERE student_id = 'S001' AND date = '2024-05-01'",
            [],
            |r| r.get(0),
        )
        .expect("load first_entry_time");
    assert!(first_entry.is_some());
}

#[test]
fn test_pending_reviews_drain_after_verification() {
    let db_path = setup_test_db("pending_reviews");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");
    enroll(&db_path, "S002", "TAG-002");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    checkin_at(&db_path, "S002", "entry", "2024-05-01", "07:35");

    cg().args(["--db", &db_path, "pending", "2024-05-01"])
        .assert()
        .success()
        .stdout(contains("S001"))
        .stdout(contains("S002"));

    cg().args(["--db", &db_path, "verify", "S001", "2024-05-01"])
        .assert()
        .success();

    // verified records leave the queue; pending flags unconfirmed
    // records, not incorrect ones
    cg().args(["--db", &db_path, "pending", "2024-05-01"])
        .assert()
        .success()
        .stdout(contains("S002"))
        .stdout(contains("S001").not());
}

#[test]
fn test_override_writes_audit_trail() {
    let db_path = setup_test_db("override_audit");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    cg().args([
        "--db",
        &db_path,
        "override",
        "S001",
        "2024-05-01",
        "--type",
        "mark_present",
        "--reason",
        "Scanner offline",
    ])
    .assert()
    .success();

    cg().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("override"))
        .stdout(contains("marked_present on 2024-05-01 (Scanner offline)"));
}
