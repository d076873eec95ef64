use std::fmt;

use chrono::NaiveDateTime;
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseTemplateID, Name, ReadError, Reps, SessionTemplateID, Sets,
    UpdateError, UserID, Weight,
};

#[allow(async_fn_in_trait)]
pub trait TrainingLogService {
    /// Starts a logged workout from a session template, snapshotting the
    /// planned values of every exercise template into execution logs.
    async fn start(
        &self,
        session_template_id: SessionTemplateID,
        notes: Option<String>,
    ) -> Result<SessionLogDetail, CreateError>;
    /// Records actual values for one execution while the parent session
    /// log is in progress.
    async fn update_execution(
        &self,
        update: ExecutionUpdate,
    ) -> Result<ExecutionLogView, UpdateError>;
    async fn complete(&self, id: SessionLogID) -> Result<SessionLogSummary, UpdateError>;
    /// Discards an in-progress session log and its executions entirely.
    async fn abort(&self, id: SessionLogID) -> Result<SessionLogID, DeleteError>;
    async fn get_log_detail(&self, id: SessionLogID) -> Result<SessionLogDetail, ReadError>;
    /// The current user's session logs, most recent start time first.
    async fn get_history(&self) -> Result<Vec<SessionLogSummary>, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait SessionLogRepository {
    /// The session log with the given id, regardless of owner.
    async fn read_session_log(&self, id: SessionLogID) -> Result<SessionLog, ReadError>;
    /// The session log with the given id if it is owned by `user_id`.
    async fn find_session_log(
        &self,
        id: SessionLogID,
        user_id: UserID,
    ) -> Result<Option<SessionLog>, ReadError>;
    /// All session logs of a user, most recent start time first.
    async fn read_session_logs_for_user(
        &self,
        user_id: UserID,
    ) -> Result<Vec<SessionLog>, ReadError>;
    async fn count_session_logs_for_template(
        &self,
        session_template_id: SessionTemplateID,
    ) -> Result<usize, ReadError>;
    /// Persists a new session log; the given id is replaced by a
    /// store-assigned one.
    async fn create_session_log(&self, log: SessionLog) -> Result<SessionLog, CreateError>;
    async fn replace_session_log(&self, log: SessionLog) -> Result<SessionLog, UpdateError>;
    async fn delete_session_log(&self, id: SessionLogID) -> Result<SessionLogID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait ExecutionLogRepository {
    async fn find_execution_log(
        &self,
        id: ExecutionLogID,
    ) -> Result<Option<ExecutionLog>, ReadError>;
    /// The unique execution log of a (session log, exercise template)
    /// pair, if one exists.
    async fn find_execution_log_for_pair(
        &self,
        session_log_id: SessionLogID,
        exercise_template_id: ExerciseTemplateID,
    ) -> Result<Option<ExecutionLog>, ReadError>;
    async fn read_execution_logs_for_session_log(
        &self,
        session_log_id: SessionLogID,
    ) -> Result<Vec<ExecutionLog>, ReadError>;
    /// Persists a new execution log; the given id is replaced by a
    /// store-assigned one.
    async fn create_execution_log(&self, log: ExecutionLog) -> Result<ExecutionLog, CreateError>;
    async fn replace_execution_log(&self, log: ExecutionLog) -> Result<ExecutionLog, UpdateError>;
    /// Removes every execution log of the given session log. Not an
    /// error if none exist.
    async fn delete_execution_logs_for_session_log(
        &self,
        session_log_id: SessionLogID,
    ) -> Result<(), DeleteError>;
}

/// A time-boxed record of performing a session template. Mutable only
/// while in progress; completion is terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLog {
    pub id: SessionLogID,
    pub session_template_id: SessionTemplateID,
    pub user_id: UserID,
    pub status: LogStatus,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

impl SessionLog {
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == LogStatus::InProgress
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: UserID) -> bool {
        self.user_id == user_id
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionLogID(Uuid);

impl SessionLogID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for SessionLogID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for SessionLogID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    InProgress,
    Completed,
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LogStatus::InProgress => "in progress",
                LogStatus::Completed => "completed",
            }
        )
    }
}

/// Actual values recorded against one exercise template of a session
/// log. Created as a snapshot of the planned values at start time; at
/// most one exists per (session log, exercise template) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionLog {
    pub id: ExecutionLogID,
    pub session_log_id: SessionLogID,
    pub exercise_template_id: ExerciseTemplateID,
    pub actual_sets: Sets,
    pub actual_reps: Reps,
    pub actual_weight: Weight,
    pub completed: bool,
    pub notes: Option<String>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExecutionLogID(Uuid);

impl ExecutionLogID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExecutionLogID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExecutionLogID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Request to record actual values for one execution.
///
/// Addressed by `execution_log_id` when it resolves to an existing row.
/// Otherwise the (`session_log_id`, `exercise_template_id`) pair is
/// used, updating the pair's execution log or lazily creating a missing
/// one — this tolerates a client that lost track of an execution log id.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionUpdate {
    pub execution_log_id: Option<ExecutionLogID>,
    pub session_log_id: Option<SessionLogID>,
    pub exercise_template_id: Option<ExerciseTemplateID>,
    pub actual_sets: Sets,
    pub actual_reps: Reps,
    pub actual_weight: Weight,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionLogSummary {
    pub id: SessionLogID,
    pub session_template_id: SessionTemplateID,
    pub session_name: Name,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub status: LogStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionLogDetail {
    pub id: SessionLogID,
    pub session_template_id: SessionTemplateID,
    pub session_name: Name,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub status: LogStatus,
    pub notes: Option<String>,
    pub executions: Vec<ExecutionLogView>,
}

/// An execution log joined with the planned values of its template and
/// the name of the referenced exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionLogView {
    pub id: ExecutionLogID,
    pub exercise_template_id: ExerciseTemplateID,
    pub exercise_name: Name,
    pub planned_sets: Sets,
    pub planned_reps: Reps,
    pub planned_weight: Weight,
    pub actual_sets: Sets,
    pub actual_reps: Reps,
    pub actual_weight: Weight,
    pub completed: bool,
    pub notes: Option<String>,
}
