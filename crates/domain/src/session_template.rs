use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, OrderIndex, PlanID, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait SessionTemplateService {
    async fn get_session_templates(&self) -> Result<Vec<SessionTemplateOverview>, ReadError>;
    async fn get_session_template(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplateOverview, ReadError>;
    async fn create_session_template(
        &self,
        name: Name,
        order_index: OrderIndex,
        plan_id: Option<PlanID>,
    ) -> Result<SessionTemplateOverview, CreateError>;
    async fn update_session_template(
        &self,
        id: SessionTemplateID,
        name: Name,
        order_index: OrderIndex,
        plan_id: Option<PlanID>,
    ) -> Result<SessionTemplateOverview, UpdateError>;
    async fn delete_session_template(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplateID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait SessionTemplateRepository {
    /// All session templates, ordered by id.
    async fn read_session_templates(&self) -> Result<Vec<SessionTemplate>, ReadError>;
    async fn read_session_template(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplate, ReadError>;
    async fn create_session_template(
        &self,
        name: Name,
        plan_id: Option<PlanID>,
        order_index: OrderIndex,
    ) -> Result<SessionTemplate, CreateError>;
    async fn replace_session_template(
        &self,
        session_template: SessionTemplate,
    ) -> Result<SessionTemplate, UpdateError>;
    async fn delete_session_template(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplateID, DeleteError>;
}

/// A planned workout: an ordered set of exercise templates, optionally
/// attached to a training plan. Templates are never performed themselves;
/// session logs record performances against them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTemplate {
    pub id: SessionTemplateID,
    pub name: Name,
    pub plan_id: Option<PlanID>,
    pub order_index: OrderIndex,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionTemplateID(Uuid);

impl SessionTemplateID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for SessionTemplateID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for SessionTemplateID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTemplateOverview {
    pub id: SessionTemplateID,
    pub name: Name,
    pub plan_id: Option<PlanID>,
    pub plan_name: Option<Name>,
    pub order_index: OrderIndex,
    pub exercise_count: usize,
    pub execution_count: usize,
}
