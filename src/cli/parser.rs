use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for campusgate
/// CLI application to track gate access and attendance with SQLite
#[derive(Parser)]
#[command(
    name = "campusgate",
    version = env!("CARGO_PKG_VERSION"),
    about = "A campus gate CLI: log entry/exit scans, reconcile attendance and flag anomalies using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Enroll a student in the identity registry
    Enroll {
        /// Campus identifier (unique)
        student_id: String,

        #[arg(long = "name", help = "Full name of the student")]
        name: Option<String>,

        #[arg(long = "rfid", help = "RFID tag to associate with the student")]
        rfid: Option<String>,

        #[arg(long = "guardian", help = "Guardian contact e-mail")]
        guardian: Option<String>,

        #[arg(long = "sample", help = "Biometric sample template to enroll")]
        sample: Option<String>,
    },

    /// Process a gate scan: verify identity, then log the access attempt
    Scan {
        #[arg(long = "rfid", help = "RFID tag presented at the gate")]
        rfid: Option<String>,

        #[arg(long = "sample", help = "Biometric sample captured at the gate")]
        sample: Option<String>,

        #[arg(
            long = "action",
            default_value = "entry",
            help = "Gate action: entry or exit"
        )]
        action: String,

        #[arg(long = "date", help = "Event date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long = "time", help = "Event time (HH:MM[:SS], default now)")]
        time: Option<String>,
    },

    /// Manual check-in for a resolved student (operator path)
    Checkin {
        student_id: String,

        #[arg(
            long = "action",
            default_value = "entry",
            help = "Gate action: entry or exit"
        )]
        action: String,

        #[arg(long = "reason", help = "Reason recorded with the event")]
        reason: Option<String>,

        #[arg(long = "failed", help = "Log the attempt as denied")]
        failed: bool,

        #[arg(long = "date", help = "Event date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long = "time", help = "Event time (HH:MM[:SS], default now)")]
        time: Option<String>,
    },

    /// Apply an operator override to an attendance record
    Override {
        student_id: String,

        /// Date of the record (YYYY-MM-DD, default today)
        date: Option<String>,

        #[arg(
            long = "type",
            help = "Override type: mark_present, mark_absent or grant_access"
        )]
        override_type: String,

        #[arg(long = "reason", default_value = "Manual override")]
        reason: String,
    },

    /// Approve a whole day of attendance records
    Approve {
        /// Date to approve (YYYY-MM-DD, default today)
        date: Option<String>,

        #[arg(long = "by", help = "Name of the approving operator")]
        approver: String,
    },

    /// Verify (or un-verify) a single attendance record
    Verify {
        student_id: String,

        /// Date of the record (YYYY-MM-DD, default today)
        date: Option<String>,

        #[arg(
            long = "status",
            default_value = "true",
            help = "Verification flag: true/false (also accepts yes/no/1/0)"
        )]
        status: String,

        #[arg(long = "notes", default_value = "")]
        notes: String,
    },

    /// Reconcile a day's events against attendance and report anomalies
    Anomalies {
        /// Date to reconcile (YYYY-MM-DD, default today)
        date: Option<String>,

        #[arg(
            long = "asof",
            help = "Wall-clock time (HH:MM) for the after-hours rule, default now"
        )]
        asof: Option<String>,
    },

    /// Flat alert feed derived from the anomaly report
    Alerts {
        date: Option<String>,

        #[arg(long = "asof", help = "Wall-clock time (HH:MM), default now")]
        asof: Option<String>,
    },

    /// List attendance records still waiting for verification
    Pending {
        date: Option<String>,
    },

    /// Show the attendance log (or raw gate events) for a period
    List {
        /// Period: YYYY, YYYY-MM or YYYY-MM-DD (default today)
        period: Option<String>,

        #[arg(long = "events", help = "List raw gate events instead of attendance")]
        events: bool,
    },

    /// Live gate statistics for today
    Stats,

    /// Print or manage the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Export gate events or attendance records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'e', help = "Export raw gate events instead of attendance")]
        events: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
