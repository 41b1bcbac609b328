//! Side effects attached to status transitions.

use joblead_core::JobStatus;
use tracing::info;

/// Invoked after every successful status update. Implementations must not
/// fail the transition; the new status is already stored when this runs.
pub trait StatusHook: Send + Sync {
    fn on_transition(&self, job_id: i64, old: JobStatus, new: JobStatus);
}

/// Default hook: logs the transition and dispatches per status. Each arm is
/// the attachment point for that status's future side effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingStatusHook;

impl StatusHook for LoggingStatusHook {
    fn on_transition(&self, job_id: i64, old: JobStatus, new: JobStatus) {
        info!(job_id, from = %old, to = %new, "job status changed");

        match new {
            JobStatus::AwaitingApproval => {
                // approver notification goes here
            }
            JobStatus::CreateEmail => {
                // email-template generation goes here
            }
            JobStatus::EmailSent => {
                // send timestamp + tracking setup go here
            }
            JobStatus::EmailOpened => {
                // open-time recording and follow-up reminder go here
            }
            JobStatus::RespondedToEmail => {
                // follow-up task creation goes here
            }
            JobStatus::NotInterested => {
                // archival / future-follow-up marking goes here
            }
            JobStatus::New => {}
        }
    }
}
