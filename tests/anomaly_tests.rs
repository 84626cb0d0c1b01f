use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{cg, checkin_at, enroll, failed_checkin_at, init_db, setup_test_db};

#[test]
fn test_clean_day_has_no_anomalies() {
    let db_path = setup_test_db("clean_day");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    checkin_at(&db_path, "S001", "exit", "2024-05-01", "16:05");

    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "17:00"])
        .assert()
        .success()
        .stdout(contains("No anomalies detected for 2024-05-01."));
}

#[test]
fn test_entry_marked_absent_is_critical() {
    let db_path = setup_test_db("entry_marked_absent");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    checkin_at(&db_path, "S001", "exit", "2024-05-01", "16:05");

    // flip the derived state under the event log
    cg().args([
        "--db",
        &db_path,
        "override",
        "S001",
        "2024-05-01",
        "--type",
        "mark_absent",
        "--reason",
        "Record correction",
    ])
    .assert()
    .success();

    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "17:00"])
        .assert()
        .success()
        .stdout(contains("entry_marked_absent"))
        .stdout(contains("[critical]"))
        .stdout(contains("Entry recorded but marked absent"))
        .stdout(contains("1 anomalies (1 critical, 0 warning)."));
}

#[test]
fn test_repeated_failures_warning() {
    let db_path = setup_test_db("repeated_failures");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    failed_checkin_at(&db_path, "S001", "2024-05-01", "07:40");
    failed_checkin_at(&db_path, "S001", "2024-05-01", "07:41");

    // two failures stay under the threshold
    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "12:00"])
        .assert()
        .success()
        .stdout(contains("repeated_failures").not());

    failed_checkin_at(&db_path, "S001", "2024-05-01", "07:42");

    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "12:00"])
        .assert()
        .success()
        .stdout(contains("repeated_failures"))
        .stdout(contains("[warning]"))
        .stdout(contains("Multiple failed access attempts (3)"));
}

#[test]
fn test_no_exit_after_hours_depends_on_cutoff() {
    let db_path = setup_test_db("after_hours");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");

    // before the cutoff nothing fires
    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "17:59"])
        .assert()
        .success()
        .stdout(contains("no_exit_after_hours").not());

    // past 18:00 the student is still recorded on-site
    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "18:30"])
        .assert()
        .success()
        .stdout(contains("no_exit_after_hours"))
        .stdout(contains("Present without exit after hours"));
}

#[test]
fn test_duplicate_entries_warning() {
    let db_path = setup_test_db("duplicate_entries");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    checkin_at(&db_path, "S001", "entry", "2024-05-01", "08:15");

    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "12:00"])
        .assert()
        .success()
        .stdout(contains("duplicate_entries"))
        .stdout(contains("2 entries vs 0 exits"));

    // an intervening exit clears the rule
    checkin_at(&db_path, "S001", "exit", "2024-05-01", "12:30");

    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "13:00"])
        .assert()
        .success()
        .stdout(contains("duplicate_entries").not());
}

#[test]
fn test_rules_are_non_exclusive() {
    let db_path = setup_test_db("non_exclusive_rules");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    // double entry, no exit, three failures, then marked absent:
    // one student trips every rule in a single pass
    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    checkin_at(&db_path, "S001", "entry", "2024-05-01", "08:15");
    failed_checkin_at(&db_path, "S001", "2024-05-01", "08:20");
    failed_checkin_at(&db_path, "S001", "2024-05-01", "08:21");
    failed_checkin_at(&db_path, "S001", "2024-05-01", "08:22");

    cg().args([
        "--db",
        &db_path,
        "override",
        "S001",
        "2024-05-01",
        "--type",
        "mark_absent",
        "--reason",
        "Test correction",
    ])
    .assert()
    .success();

    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "19:00"])
        .assert()
        .success()
        .stdout(contains("entry_marked_absent"))
        .stdout(contains("repeated_failures"))
        .stdout(contains("no_exit_after_hours"))
        .stdout(contains("duplicate_entries"))
        .stdout(contains("4 anomalies (1 critical, 3 warning)."));
}

#[test]
fn test_report_order_is_rule_then_student() {
    let db_path = setup_test_db("report_order");
    init_db(&db_path);
    enroll(&db_path, "S_ZZ", "TAG-ZZ");
    enroll(&db_path, "S_AA", "TAG-AA");

    for student in ["S_ZZ", "S_AA"] {
        checkin_at(&db_path, student, "entry", "2024-05-01", "07:30");
        cg().args([
            "--db",
            &db_path,
            "override",
            student,
            "2024-05-01",
            "--type",
            "mark_absent",
            "--reason",
            "Order test",
        ])
        .assert()
        .success();
    }

    // same rule for both students: ascending student id, regardless of
    // insertion order
    cg().args(["--db", &db_path, "anomalies", "2024-05-01", "--asof", "12:00"])
        .assert()
        .success()
        .stdout(predicates::str::is_match("(?s)S_AA.*S_ZZ").expect("Invalid regex"));
}

#[test]
fn test_alerts_are_flat_projection() {
    let db_path = setup_test_db("alerts_projection");
    init_db(&db_path);
    enroll(&db_path, "S001", "TAG-001");

    checkin_at(&db_path, "S001", "entry", "2024-05-01", "07:30");
    cg().args([
        "--db",
        &db_path,
        "override",
        "S001",
        "2024-05-01",
        "--type",
        "mark_absent",
        "--reason",
        "Projection test",
    ])
    .assert()
    .success();

    cg().args(["--db", &db_path, "alerts", "2024-05-01", "--asof", "12:00"])
        .assert()
        .success()
        .stdout(contains("[critical] S001 => Entry recorded but marked absent"));

    cg().args(["--db", &db_path, "alerts", "2024-06-01", "--asof", "12:00"])
        .assert()
        .success()
        .stdout(contains("No alerts for 2024-06-01."));
}
