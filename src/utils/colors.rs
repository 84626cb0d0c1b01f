use crate::models::anomaly::AnomalyLevel;

/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Report color for an anomaly level: critical → red, warning → yellow.
pub fn color_for_level(level: AnomalyLevel) -> &'static str {
    match level {
        AnomalyLevel::Critical => RED,
        AnomalyLevel::Warning => YELLOW,
    }
}
