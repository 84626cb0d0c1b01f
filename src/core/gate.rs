use crate::db::pool::DbPool;
use crate::db::{attendance, log, queries};
use crate::errors::AppResult;
use crate::models::gate_action::GateAction;
use crate::models::gate_event::GateEvent;
use crate::models::student::Student;
use chrono::NaiveDateTime;
use rusqlite::TransactionBehavior;

/// Gate controller: the single write path for access attempts.
///
/// Identity resolution happens before this point: the controller always
/// receives an already-resolved student.
pub struct GateController;

impl GateController {
    /// Append an immutable gate event and fold it into the day's
    /// attendance record.
    ///
    /// Event insert, attendance upsert and audit row commit as one
    /// transaction: the event log and the attendance store cannot diverge
    /// on this path. A divergence found by reconciliation therefore means
    /// the stores were touched outside the controller.
    pub fn record_access(
        pool: &mut DbPool,
        student: &Student,
        action: GateAction,
        success: bool,
        reason: &str,
        source: &str,
        when: NaiveDateTime,
    ) -> AppResult<GateEvent> {
        let mut ev = GateEvent::new(
            &student.student_id,
            when.date(),
            when.time(),
            action,
            success,
            reason,
            source,
        );

        // immediate: take the write lock up front so two gates racing on
        // the same student serialize instead of deadlocking on upgrade
        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        ev.id = queries::insert_event(&tx, &ev)?;
        attendance::apply_event(&tx, &ev)?;

        let outcome = if success { "granted" } else { "denied" };
        log::ttlog(
            &tx,
            source,
            &student.student_id,
            &format!(
                "{} {} at {} {} ({})",
                ev.action.to_db_str(),
                outcome,
                ev.date_str(),
                ev.time_str(),
                reason
            ),
        )?;

        tx.commit()?;

        Ok(ev)
    }
}
