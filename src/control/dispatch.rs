use crate::model::TerminalTask;
use crate::session::SessionManager;
use tracing::{debug, info, warn};

/// Name of the task that kills a session; its args carry the session id
pub const KILL_SESSION: &str = "kill_session";

/// Task kinds this proxy understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind<'a> {
    KillSession { session_id: &'a str },
    Unknown(&'a str),
}

impl<'a> TaskKind<'a> {
    pub fn parse(task: &'a TerminalTask) -> Self {
        match task.name.as_str() {
            KILL_SESSION => TaskKind::KillSession {
                session_id: task.args.trim(),
            },
            other => TaskKind::Unknown(other),
        }
    }
}

/// What happened to a dispatched task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Handled and acknowledged to the core server
    Completed,
    /// Recognized but could not be carried out; left unacknowledged so the
    /// core server may send it again
    Failed,
    /// Unknown task name, left untouched
    Ignored,
}

/// Map a control task onto the session lifecycle.
///
/// Unknown task names are ignored rather than rejected so that newer core
/// servers can introduce task kinds without breaking older proxies.
pub async fn handle_session_task(manager: &SessionManager, task: &TerminalTask) -> TaskOutcome {
    match TaskKind::parse(task) {
        TaskKind::KillSession { session_id } => {
            if manager.kill_session(session_id).await.is_err() {
                return TaskOutcome::Failed;
            }

            // acknowledgement is best-effort, the kill already happened
            match manager.control_plane().finish_task(&task.id).await {
                Ok(()) => info!("Task {} finished", task.id),
                Err(e) => warn!("Finish task {} failed: {}", task.id, e),
            }
            TaskOutcome::Completed
        }
        TaskKind::Unknown(name) => {
            debug!("Ignore task {} with unknown name {:?}", task.id, name);
            TaskOutcome::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kill_session() {
        let task = TerminalTask::new("t1", "kill_session", " abc-123 ");
        assert_eq!(
            TaskKind::parse(&task),
            TaskKind::KillSession {
                session_id: "abc-123"
            }
        );
    }

    #[test]
    fn test_parse_unknown_task() {
        let task = TerminalTask::new("t2", "restart", "");
        assert_eq!(TaskKind::parse(&task), TaskKind::Unknown("restart"));
    }

    #[test]
    fn test_task_names_are_case_sensitive() {
        let task = TerminalTask::new("t3", "KILL_SESSION", "abc");
        assert_eq!(TaskKind::parse(&task), TaskKind::Unknown("KILL_SESSION"));
    }
}
