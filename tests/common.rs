#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn cg() -> Command {
    cargo_bin_cmd!("campusgate")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_campusgate.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the schema at the given DB path
pub fn init_db(db_path: &str) {
    cg().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Enroll a student with an RFID tag and a guardian contact
pub fn enroll(db_path: &str, student_id: &str, rfid: &str) {
    cg().args([
        "--db",
        db_path,
        "enroll",
        student_id,
        "--rfid",
        rfid,
        "--guardian",
        "guardian@example.com",
    ])
    .assert()
    .success();
}

/// Log a successful manual check-in at a fixed date/time
pub fn checkin_at(db_path: &str, student_id: &str, action: &str, date: &str, time: &str) {
    cg().args([
        "--db", db_path, "checkin", student_id, "--action", action, "--date", date, "--time", time,
    ])
    .assert()
    .success();
}

/// Log a denied attempt at a fixed date/time
pub fn failed_checkin_at(db_path: &str, student_id: &str, date: &str, time: &str) {
    cg().args([
        "--db",
        db_path,
        "checkin",
        student_id,
        "--failed",
        "--reason",
        "Card rejected",
        "--date",
        date,
        "--time",
        time,
    ])
    .assert()
    .success();
}
