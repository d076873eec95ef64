use crate::{CreateError, DeleteError, PlanID, ReadError, SessionTemplateID, UpdateError};

#[allow(async_fn_in_trait)]
pub trait PlanLinkService {
    async fn add_link(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
        position: Option<u32>,
    ) -> Result<PlanSessionLink, CreateError>;
    async fn remove_link(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
    ) -> Result<(), DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait PlanLinkRepository {
    /// Links of a plan, ordered by position.
    async fn read_links_for_plan(
        &self,
        plan_id: PlanID,
    ) -> Result<Vec<PlanSessionLink>, ReadError>;
    async fn find_link(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
    ) -> Result<Option<PlanSessionLink>, ReadError>;
    async fn create_link(&self, link: PlanSessionLink) -> Result<PlanSessionLink, CreateError>;
    async fn replace_link(&self, link: PlanSessionLink) -> Result<PlanSessionLink, UpdateError>;
    async fn delete_link(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
    ) -> Result<(), DeleteError>;
    /// Removes every link of the given plan. Not an error if none exist.
    async fn delete_links_for_plan(&self, plan_id: PlanID) -> Result<(), DeleteError>;
    /// Removes every link referencing the given session template. Not an
    /// error if none exist.
    async fn delete_links_for_session(
        &self,
        session_id: SessionTemplateID,
    ) -> Result<(), DeleteError>;
}

/// Attachment of a session template to a plan. Positions of a plan's
/// links form a dense sequence 1..N; a (plan, session) pair is linked at
/// most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSessionLink {
    pub plan_id: PlanID,
    pub session_id: SessionTemplateID,
    pub position: u32,
}

/// Reassigns positions 1..N in the current order of `links`, closing any
/// gaps left behind by interrupted earlier operations.
pub fn renumber(links: &mut [PlanSessionLink]) {
    for (i, link) in links.iter_mut().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        {
            link.position = i as u32 + 1;
        }
    }
}

/// Resolves a requested insertion position against a plan that currently
/// holds `len` links: clamped to `1..=len + 1`, appending by default.
#[must_use]
pub fn insert_position(requested: Option<u32>, len: usize) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    let append = len as u32 + 1;
    match requested {
        Some(position) => position.clamp(1, append),
        None => append,
    }
}
