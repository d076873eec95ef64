use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseID, Name, OrderIndex, ReadError, Reps, SessionTemplateID,
    Sets, UpdateError, Weight,
};

#[allow(async_fn_in_trait)]
pub trait ExerciseTemplateService {
    async fn get_exercise_templates(
        &self,
        session_id: SessionTemplateID,
    ) -> Result<Vec<ExerciseTemplateView>, ReadError>;
    async fn create_exercise_template(
        &self,
        session_id: SessionTemplateID,
        exercise_id: ExerciseID,
        planned_sets: Sets,
        planned_reps: Reps,
        planned_weight: Weight,
        order_index: OrderIndex,
    ) -> Result<ExerciseTemplateView, CreateError>;
    async fn update_exercise_template(
        &self,
        id: ExerciseTemplateID,
        exercise_id: ExerciseID,
        planned_sets: Sets,
        planned_reps: Reps,
        planned_weight: Weight,
        order_index: OrderIndex,
    ) -> Result<ExerciseTemplateView, UpdateError>;
    async fn delete_exercise_template(
        &self,
        id: ExerciseTemplateID,
    ) -> Result<ExerciseTemplateID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseTemplateRepository {
    /// The exercise templates of a session, ordered by order index. An
    /// unknown session yields an empty list.
    async fn read_exercise_templates_for_session(
        &self,
        session_id: SessionTemplateID,
    ) -> Result<Vec<ExerciseTemplate>, ReadError>;
    async fn read_exercise_template(
        &self,
        id: ExerciseTemplateID,
    ) -> Result<ExerciseTemplate, ReadError>;
    async fn create_exercise_template(
        &self,
        session_id: SessionTemplateID,
        exercise_id: ExerciseID,
        planned_sets: Sets,
        planned_reps: Reps,
        planned_weight: Weight,
        order_index: OrderIndex,
    ) -> Result<ExerciseTemplate, CreateError>;
    async fn replace_exercise_template(
        &self,
        exercise_template: ExerciseTemplate,
    ) -> Result<ExerciseTemplate, UpdateError>;
    async fn delete_exercise_template(
        &self,
        id: ExerciseTemplateID,
    ) -> Result<ExerciseTemplateID, DeleteError>;
}

/// Planned targets for one exercise within a session template. An
/// exercise appears at most once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseTemplate {
    pub id: ExerciseTemplateID,
    pub session_id: SessionTemplateID,
    pub exercise_id: ExerciseID,
    pub planned_sets: Sets,
    pub planned_reps: Reps,
    pub planned_weight: Weight,
    pub order_index: OrderIndex,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseTemplateID(Uuid);

impl ExerciseTemplateID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseTemplateID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseTemplateID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// An exercise template joined with the name and category of the
/// exercise it references.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseTemplateView {
    pub id: ExerciseTemplateID,
    pub session_id: SessionTemplateID,
    pub exercise_id: ExerciseID,
    pub exercise_name: Name,
    pub exercise_category: String,
    pub planned_sets: Sets,
    pub planned_reps: Reps,
    pub planned_weight: Weight,
    pub order_index: OrderIndex,
}
