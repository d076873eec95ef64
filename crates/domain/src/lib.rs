#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod exercise_template;
mod identity;
mod name;
mod plan;
mod plan_link;
mod service;
mod session_log;
mod session_template;
mod training;

pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use exercise::{
    Exercise, ExerciseID, ExerciseRepository, ExerciseService, MuscleGroup, MuscleGroupError,
};
pub use exercise_template::{
    ExerciseTemplate, ExerciseTemplateID, ExerciseTemplateRepository, ExerciseTemplateService,
    ExerciseTemplateView,
};
pub use identity::{IdentityRepository, UserID};
pub use name::{Name, NameError};
pub use plan::{
    PlanDetail, PlanID, PlanOverview, PlanRepository, PlanService, PlanSessionSummary,
    TrainingPlan,
};
pub use plan_link::{PlanLinkRepository, PlanLinkService, PlanSessionLink, insert_position, renumber};
pub use service::Service;
pub use session_log::{
    ExecutionLog, ExecutionLogID, ExecutionLogRepository, ExecutionLogView, ExecutionUpdate,
    LogStatus, SessionLog, SessionLogDetail, SessionLogID, SessionLogRepository, SessionLogSummary,
    TrainingLogService,
};
pub use session_template::{
    SessionTemplate, SessionTemplateID, SessionTemplateOverview, SessionTemplateRepository,
    SessionTemplateService,
};
pub use training::{
    OrderIndex, OrderIndexError, Reps, RepsError, Sets, SetsError, Weight, WeightError,
};
