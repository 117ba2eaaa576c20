use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result envelope produced by every command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

impl CommandStatus {
    /// The process exit code for this status. The CLI surface promises
    /// 0 for success and 1 for any failure, so user errors and internal
    /// failures collapse to the same code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandStatus::Ok => 0,
            CommandStatus::UserError | CommandStatus::Failure => 1,
        }
    }
}
