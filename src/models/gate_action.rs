use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum GateAction {
    Entry,
    Exit,
}

impl GateAction {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            GateAction::Entry => "entry",
            GateAction::Exit => "exit",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(GateAction::Entry),
            "exit" => Some(GateAction::Exit),
            _ => None,
        }
    }

    /// Helper: convert input code from CLI (case-insensitive)
    pub fn from_code(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "entry" | "in" => Some(GateAction::Entry),
            "exit" | "out" => Some(GateAction::Exit),
            _ => None,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, GateAction::Entry)
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, GateAction::Exit)
    }
}
