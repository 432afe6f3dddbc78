//! Asynchronous task models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a spawned task, as returned with HTTP 202
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    #[serde(rename = "_href", alias = "task")]
    pub href: String,
}

/// Body of a 202 response: one task or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SpawnedTasks {
    One(TaskRef),
    Many(Vec<TaskRef>),
}

impl SpawnedTasks {
    pub fn into_vec(self) -> Vec<TaskRef> {
        match self {
            SpawnedTasks::One(task) => vec![task],
            SpawnedTasks::Many(tasks) => tasks,
        }
    }
}

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Waiting,
    Running,
    Completed,
    Failed,
    Canceled,
    Skipped,
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// True once the task will not change state again
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled | TaskState::Skipped
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Waiting => "waiting",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
            TaskState::Skipped => "skipped",
            TaskState::Unknown => "unknown",
        }
    }
}

/// Task status record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_href")]
    pub href: String,

    pub state: TaskState,

    #[serde(default)]
    pub error: Option<Value>,
}
