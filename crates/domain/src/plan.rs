use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError, SessionTemplateID, UpdateError};

#[allow(async_fn_in_trait)]
pub trait PlanService {
    async fn get_plans(&self) -> Result<Vec<PlanOverview>, ReadError>;
    async fn get_plan(&self, id: PlanID) -> Result<PlanDetail, ReadError>;
    async fn create_plan(
        &self,
        name: Name,
        description: String,
    ) -> Result<TrainingPlan, CreateError>;
    async fn update_plan(
        &self,
        id: PlanID,
        name: Name,
        description: String,
    ) -> Result<TrainingPlan, UpdateError>;
    async fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait PlanRepository {
    async fn read_plans(&self) -> Result<Vec<TrainingPlan>, ReadError>;
    async fn read_plan(&self, id: PlanID) -> Result<TrainingPlan, ReadError>;
    async fn create_plan(
        &self,
        name: Name,
        description: String,
    ) -> Result<TrainingPlan, CreateError>;
    async fn replace_plan(&self, plan: TrainingPlan) -> Result<TrainingPlan, UpdateError>;
    async fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPlan {
    pub id: PlanID,
    pub name: Name,
    pub description: String,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlanID(Uuid);

impl PlanID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for PlanID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for PlanID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOverview {
    pub id: PlanID,
    pub name: Name,
    pub description: String,
    pub session_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDetail {
    pub id: PlanID,
    pub name: Name,
    pub description: String,
    pub sessions: Vec<PlanSessionSummary>,
    pub has_sessions: bool,
    pub sessions_hint: Option<String>,
}

/// One row of a plan detail: a linked session template at its position
/// within the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSessionSummary {
    pub id: SessionTemplateID,
    pub name: Name,
    pub position: u32,
    pub exercise_count: usize,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plan_id_nil() {
        assert!(PlanID::nil().is_nil());
        assert_eq!(PlanID::nil(), PlanID::default());
    }
}
