use std::collections::BTreeSet;

use chrono::Local;
use log::{debug, error};

use crate::{
    CreateError, DeleteError, ExecutionLog, ExecutionLogID, ExecutionLogRepository,
    ExecutionLogView, ExecutionUpdate, Exercise, ExerciseID, ExerciseRepository, ExerciseService,
    ExerciseTemplate, ExerciseTemplateID, ExerciseTemplateRepository, ExerciseTemplateService,
    ExerciseTemplateView, IdentityRepository, LogStatus, MuscleGroup, Name, OrderIndex, PlanDetail,
    PlanID, PlanLinkRepository, PlanLinkService, PlanOverview, PlanRepository, PlanService,
    PlanSessionLink, PlanSessionSummary, ReadError, Reps, SessionLog, SessionLogDetail,
    SessionLogID, SessionLogRepository, SessionLogSummary, SessionTemplate, SessionTemplateID,
    SessionTemplateOverview, SessionTemplateRepository, SessionTemplateService, Sets,
    TrainingLogService, TrainingPlan, UpdateError, Weight, insert_position, renumber,
};

const EDITS_REQUIRE_IN_PROGRESS: &str = "changes are only allowed while the session is in progress";
const COMPLETE_REQUIRES_IN_PROGRESS: &str = "only session logs in progress can be completed";
const ABORT_REQUIRES_IN_PROGRESS: &str = "only session logs in progress can be deleted";

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        log_on_error!(
            self.repository.read_exercise(id),
            ReadError,
            "get",
            "exercise"
        )
    }

    async fn create_exercise(
        &self,
        name: Name,
        category: String,
        muscle_groups: BTreeSet<MuscleGroup>,
        description: Option<String>,
    ) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.add_exercise(name, category, muscle_groups, description),
            CreateError,
            "create",
            "exercise"
        )
    }

    async fn update_exercise(
        &self,
        id: ExerciseID,
        name: Name,
        category: String,
        muscle_groups: BTreeSet<MuscleGroup>,
        description: Option<String>,
    ) -> Result<Exercise, UpdateError> {
        log_on_error!(
            self.modify_exercise(id, name, category, muscle_groups, description),
            UpdateError,
            "update",
            "exercise"
        )
    }

    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(id),
            DeleteError,
            "delete",
            "exercise"
        )
    }
}

impl<R: ExerciseRepository> Service<R> {
    async fn add_exercise(
        &self,
        name: Name,
        category: String,
        muscle_groups: BTreeSet<MuscleGroup>,
        description: Option<String>,
    ) -> Result<Exercise, CreateError> {
        validate_exercise_fields(&category, &muscle_groups)?;
        let exercises = self.repository.read_exercises().await?;
        if exercises.iter().any(|e| e.name == name) {
            return Err(CreateError::Conflict);
        }
        self.repository
            .create_exercise(name, category, muscle_groups, description)
            .await
    }

    async fn modify_exercise(
        &self,
        id: ExerciseID,
        name: Name,
        category: String,
        muscle_groups: BTreeSet<MuscleGroup>,
        description: Option<String>,
    ) -> Result<Exercise, UpdateError> {
        self.repository.read_exercise(id).await?;
        validate_exercise_fields(&category, &muscle_groups).map_err(UpdateError::from)?;
        let exercises = self.repository.read_exercises().await?;
        if exercises.iter().any(|e| e.id != id && e.name == name) {
            return Err(UpdateError::Conflict);
        }
        self.repository
            .replace_exercise(Exercise {
                id,
                name,
                category,
                muscle_groups,
                description,
            })
            .await
    }
}

fn validate_exercise_fields(
    category: &str,
    muscle_groups: &BTreeSet<MuscleGroup>,
) -> Result<(), CreateError> {
    if category.trim().is_empty() {
        return Err(CreateError::InvalidInput(
            "category is required".to_string(),
        ));
    }
    if muscle_groups.is_empty() {
        return Err(CreateError::InvalidInput(
            "at least one muscle group is required".to_string(),
        ));
    }
    Ok(())
}

impl<R> SessionTemplateService for Service<R>
where
    R: SessionTemplateRepository
        + PlanRepository
        + ExerciseTemplateRepository
        + PlanLinkRepository
        + SessionLogRepository,
{
    async fn get_session_templates(&self) -> Result<Vec<SessionTemplateOverview>, ReadError> {
        log_on_error!(
            self.session_template_overviews(),
            ReadError,
            "get",
            "session templates"
        )
    }

    async fn get_session_template(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplateOverview, ReadError> {
        log_on_error!(
            self.single_session_template_overview(id),
            ReadError,
            "get",
            "session template"
        )
    }

    async fn create_session_template(
        &self,
        name: Name,
        order_index: OrderIndex,
        plan_id: Option<PlanID>,
    ) -> Result<SessionTemplateOverview, CreateError> {
        log_on_error!(
            self.add_session_template(name, order_index, plan_id),
            CreateError,
            "create",
            "session template"
        )
    }

    async fn update_session_template(
        &self,
        id: SessionTemplateID,
        name: Name,
        order_index: OrderIndex,
        plan_id: Option<PlanID>,
    ) -> Result<SessionTemplateOverview, UpdateError> {
        log_on_error!(
            self.modify_session_template(id, name, order_index, plan_id),
            UpdateError,
            "update",
            "session template"
        )
    }

    async fn delete_session_template(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplateID, DeleteError> {
        log_on_error!(
            self.remove_session_template(id),
            DeleteError,
            "delete",
            "session template"
        )
    }
}

impl<R> Service<R>
where
    R: SessionTemplateRepository
        + PlanRepository
        + ExerciseTemplateRepository
        + PlanLinkRepository
        + SessionLogRepository,
{
    async fn session_template_overviews(&self) -> Result<Vec<SessionTemplateOverview>, ReadError> {
        let sessions = self.repository.read_session_templates().await?;
        let mut overviews = Vec::with_capacity(sessions.len());
        for session in sessions {
            overviews.push(self.session_template_overview(session).await?);
        }
        Ok(overviews)
    }

    async fn single_session_template_overview(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplateOverview, ReadError> {
        let session = self.repository.read_session_template(id).await?;
        self.session_template_overview(session).await
    }

    async fn session_template_overview(
        &self,
        session: SessionTemplate,
    ) -> Result<SessionTemplateOverview, ReadError> {
        let exercise_count = self
            .repository
            .read_exercise_templates_for_session(session.id)
            .await?
            .len();
        let execution_count = self
            .repository
            .count_session_logs_for_template(session.id)
            .await?;
        let plan_name = match session.plan_id {
            Some(plan_id) => Some(self.repository.read_plan(plan_id).await?.name),
            None => None,
        };
        Ok(SessionTemplateOverview {
            id: session.id,
            name: session.name,
            plan_id: session.plan_id,
            plan_name,
            order_index: session.order_index,
            exercise_count,
            execution_count,
        })
    }

    async fn add_session_template(
        &self,
        name: Name,
        order_index: OrderIndex,
        plan_id: Option<PlanID>,
    ) -> Result<SessionTemplateOverview, CreateError> {
        validate_session_order(order_index)?;
        let sessions = self.repository.read_session_templates().await?;
        if sessions.iter().any(|s| s.name == name) {
            return Err(CreateError::Conflict);
        }
        if let Some(plan_id) = plan_id {
            self.repository.read_plan(plan_id).await?;
            let in_plan = sessions
                .iter()
                .filter(|s| s.plan_id == Some(plan_id))
                .collect::<Vec<_>>();
            if in_plan.len() >= OrderIndex::MAX_PER_PLAN as usize {
                return Err(CreateError::InvalidInput(format!(
                    "a training plan can hold at most {} sessions",
                    OrderIndex::MAX_PER_PLAN
                )));
            }
            if in_plan.iter().any(|s| s.order_index == order_index) {
                return Err(CreateError::Conflict);
            }
        }
        let session = self
            .repository
            .create_session_template(name, plan_id, order_index)
            .await?;
        self.session_template_overview(session)
            .await
            .map_err(CreateError::from)
    }

    async fn modify_session_template(
        &self,
        id: SessionTemplateID,
        name: Name,
        order_index: OrderIndex,
        plan_id: Option<PlanID>,
    ) -> Result<SessionTemplateOverview, UpdateError> {
        self.repository.read_session_template(id).await?;
        validate_session_order(order_index).map_err(UpdateError::from)?;
        let sessions = self.repository.read_session_templates().await?;
        if sessions.iter().any(|s| s.id != id && s.name == name) {
            return Err(UpdateError::Conflict);
        }
        if let Some(plan_id) = plan_id {
            self.repository.read_plan(plan_id).await?;
            if sessions.iter().any(|s| {
                s.id != id && s.plan_id == Some(plan_id) && s.order_index == order_index
            }) {
                return Err(UpdateError::Conflict);
            }
        }
        let session = self
            .repository
            .replace_session_template(SessionTemplate {
                id,
                name,
                plan_id,
                order_index,
            })
            .await?;
        self.session_template_overview(session)
            .await
            .map_err(UpdateError::from)
    }

    async fn remove_session_template(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplateID, DeleteError> {
        self.repository.read_session_template(id).await?;
        self.repository.delete_links_for_session(id).await?;
        let templates = self
            .repository
            .read_exercise_templates_for_session(id)
            .await?;
        for template in templates {
            self.repository.delete_exercise_template(template.id).await?;
        }
        // Session logs referencing the template are retained: execution
        // history must survive template deletion.
        self.repository.delete_session_template(id).await
    }
}

fn validate_session_order(order_index: OrderIndex) -> Result<(), CreateError> {
    if u32::from(order_index) > OrderIndex::MAX_PER_PLAN {
        return Err(CreateError::InvalidInput(format!(
            "order index must be between 1 and {}",
            OrderIndex::MAX_PER_PLAN
        )));
    }
    Ok(())
}

impl<R> ExerciseTemplateService for Service<R>
where
    R: ExerciseTemplateRepository + SessionTemplateRepository + ExerciseRepository,
{
    async fn get_exercise_templates(
        &self,
        session_id: SessionTemplateID,
    ) -> Result<Vec<ExerciseTemplateView>, ReadError> {
        log_on_error!(
            self.exercise_template_views(session_id),
            ReadError,
            "get",
            "exercise templates"
        )
    }

    async fn create_exercise_template(
        &self,
        session_id: SessionTemplateID,
        exercise_id: ExerciseID,
        planned_sets: Sets,
        planned_reps: Reps,
        planned_weight: Weight,
        order_index: OrderIndex,
    ) -> Result<ExerciseTemplateView, CreateError> {
        log_on_error!(
            self.add_exercise_template(
                session_id,
                exercise_id,
                planned_sets,
                planned_reps,
                planned_weight,
                order_index
            ),
            CreateError,
            "create",
            "exercise template"
        )
    }

    async fn update_exercise_template(
        &self,
        id: ExerciseTemplateID,
        exercise_id: ExerciseID,
        planned_sets: Sets,
        planned_reps: Reps,
        planned_weight: Weight,
        order_index: OrderIndex,
    ) -> Result<ExerciseTemplateView, UpdateError> {
        log_on_error!(
            self.modify_exercise_template(
                id,
                exercise_id,
                planned_sets,
                planned_reps,
                planned_weight,
                order_index
            ),
            UpdateError,
            "update",
            "exercise template"
        )
    }

    async fn delete_exercise_template(
        &self,
        id: ExerciseTemplateID,
    ) -> Result<ExerciseTemplateID, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise_template(id),
            DeleteError,
            "delete",
            "exercise template"
        )
    }
}

impl<R> Service<R>
where
    R: ExerciseTemplateRepository + SessionTemplateRepository + ExerciseRepository,
{
    async fn exercise_template_views(
        &self,
        session_id: SessionTemplateID,
    ) -> Result<Vec<ExerciseTemplateView>, ReadError> {
        let templates = self
            .repository
            .read_exercise_templates_for_session(session_id)
            .await?;
        let mut views = Vec::with_capacity(templates.len());
        for template in templates {
            views.push(self.exercise_template_view(template).await?);
        }
        Ok(views)
    }

    async fn exercise_template_view(
        &self,
        template: ExerciseTemplate,
    ) -> Result<ExerciseTemplateView, ReadError> {
        let exercise = self.repository.read_exercise(template.exercise_id).await?;
        Ok(ExerciseTemplateView {
            id: template.id,
            session_id: template.session_id,
            exercise_id: template.exercise_id,
            exercise_name: exercise.name,
            exercise_category: exercise.category,
            planned_sets: template.planned_sets,
            planned_reps: template.planned_reps,
            planned_weight: template.planned_weight,
            order_index: template.order_index,
        })
    }

    async fn add_exercise_template(
        &self,
        session_id: SessionTemplateID,
        exercise_id: ExerciseID,
        planned_sets: Sets,
        planned_reps: Reps,
        planned_weight: Weight,
        order_index: OrderIndex,
    ) -> Result<ExerciseTemplateView, CreateError> {
        self.repository.read_session_template(session_id).await?;
        self.repository.read_exercise(exercise_id).await?;
        let templates = self
            .repository
            .read_exercise_templates_for_session(session_id)
            .await?;
        if templates.iter().any(|t| t.order_index == order_index) {
            return Err(CreateError::Conflict);
        }
        if templates.iter().any(|t| t.exercise_id == exercise_id) {
            return Err(CreateError::Conflict);
        }
        let template = self
            .repository
            .create_exercise_template(
                session_id,
                exercise_id,
                planned_sets,
                planned_reps,
                planned_weight,
                order_index,
            )
            .await?;
        self.exercise_template_view(template)
            .await
            .map_err(CreateError::from)
    }

    async fn modify_exercise_template(
        &self,
        id: ExerciseTemplateID,
        exercise_id: ExerciseID,
        planned_sets: Sets,
        planned_reps: Reps,
        planned_weight: Weight,
        order_index: OrderIndex,
    ) -> Result<ExerciseTemplateView, UpdateError> {
        let existing = self.repository.read_exercise_template(id).await?;
        let templates = self
            .repository
            .read_exercise_templates_for_session(existing.session_id)
            .await?;
        // Changing unrelated fields must never conflict with the row
        // itself, so the checks only apply to changed values.
        if existing.order_index != order_index
            && templates.iter().any(|t| t.order_index == order_index)
        {
            return Err(UpdateError::Conflict);
        }
        self.repository.read_exercise(exercise_id).await?;
        if existing.exercise_id != exercise_id
            && templates.iter().any(|t| t.exercise_id == exercise_id)
        {
            return Err(UpdateError::Conflict);
        }
        let template = self
            .repository
            .replace_exercise_template(ExerciseTemplate {
                id,
                session_id: existing.session_id,
                exercise_id,
                planned_sets,
                planned_reps,
                planned_weight,
                order_index,
            })
            .await?;
        self.exercise_template_view(template)
            .await
            .map_err(UpdateError::from)
    }
}

impl<R> PlanService for Service<R>
where
    R: PlanRepository + PlanLinkRepository + SessionTemplateRepository + ExerciseTemplateRepository,
{
    async fn get_plans(&self) -> Result<Vec<PlanOverview>, ReadError> {
        log_on_error!(self.plan_overviews(), ReadError, "get", "plans")
    }

    async fn get_plan(&self, id: PlanID) -> Result<PlanDetail, ReadError> {
        log_on_error!(self.plan_detail(id), ReadError, "get", "plan")
    }

    async fn create_plan(
        &self,
        name: Name,
        description: String,
    ) -> Result<TrainingPlan, CreateError> {
        log_on_error!(self.add_plan(name, description), CreateError, "create", "plan")
    }

    async fn update_plan(
        &self,
        id: PlanID,
        name: Name,
        description: String,
    ) -> Result<TrainingPlan, UpdateError> {
        log_on_error!(
            self.modify_plan(id, name, description),
            UpdateError,
            "update",
            "plan"
        )
    }

    async fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError> {
        log_on_error!(self.remove_plan(id), DeleteError, "delete", "plan")
    }
}

impl<R> Service<R>
where
    R: PlanRepository + PlanLinkRepository + SessionTemplateRepository + ExerciseTemplateRepository,
{
    async fn plan_overviews(&self) -> Result<Vec<PlanOverview>, ReadError> {
        let plans = self.repository.read_plans().await?;
        let mut overviews = Vec::with_capacity(plans.len());
        for plan in plans {
            let session_count = self.repository.read_links_for_plan(plan.id).await?.len();
            overviews.push(PlanOverview {
                id: plan.id,
                name: plan.name,
                description: plan.description,
                session_count,
            });
        }
        Ok(overviews)
    }

    async fn plan_detail(&self, id: PlanID) -> Result<PlanDetail, ReadError> {
        let plan = self.repository.read_plan(id).await?;
        let links = self.repository.read_links_for_plan(id).await?;
        let mut sessions = Vec::with_capacity(links.len());
        for link in links {
            let session = self.repository.read_session_template(link.session_id).await?;
            let exercise_count = self
                .repository
                .read_exercise_templates_for_session(session.id)
                .await?
                .len();
            sessions.push(PlanSessionSummary {
                id: session.id,
                name: session.name,
                position: link.position,
                exercise_count,
            });
        }
        let has_sessions = !sessions.is_empty();
        Ok(PlanDetail {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            sessions,
            has_sessions,
            sessions_hint: if has_sessions {
                None
            } else {
                Some("No sessions scheduled yet".to_string())
            },
        })
    }

    async fn add_plan(&self, name: Name, description: String) -> Result<TrainingPlan, CreateError> {
        let plans = self.repository.read_plans().await?;
        if plans.iter().any(|p| p.name == name) {
            return Err(CreateError::Conflict);
        }
        self.repository.create_plan(name, description).await
    }

    async fn modify_plan(
        &self,
        id: PlanID,
        name: Name,
        description: String,
    ) -> Result<TrainingPlan, UpdateError> {
        self.repository.read_plan(id).await?;
        let plans = self.repository.read_plans().await?;
        if plans.iter().any(|p| p.id != id && p.name == name) {
            return Err(UpdateError::Conflict);
        }
        self.repository
            .replace_plan(TrainingPlan {
                id,
                name,
                description,
            })
            .await
    }

    async fn remove_plan(&self, id: PlanID) -> Result<PlanID, DeleteError> {
        self.repository.read_plan(id).await?;
        let sessions = self.repository.read_session_templates().await?;
        for mut session in sessions.into_iter().filter(|s| s.plan_id == Some(id)) {
            session.plan_id = None;
            self.repository.replace_session_template(session).await?;
        }
        self.repository.delete_links_for_plan(id).await?;
        self.repository.delete_plan(id).await
    }
}

impl<R> PlanLinkService for Service<R>
where
    R: PlanLinkRepository + PlanRepository + SessionTemplateRepository,
{
    async fn add_link(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
        position: Option<u32>,
    ) -> Result<PlanSessionLink, CreateError> {
        log_on_error!(
            self.attach_session(plan_id, session_id, position),
            CreateError,
            "create",
            "plan link"
        )
    }

    async fn remove_link(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
    ) -> Result<(), DeleteError> {
        log_on_error!(
            self.detach_session(plan_id, session_id),
            DeleteError,
            "delete",
            "plan link"
        )
    }
}

impl<R> Service<R>
where
    R: PlanLinkRepository + PlanRepository + SessionTemplateRepository,
{
    async fn attach_session(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
        position: Option<u32>,
    ) -> Result<PlanSessionLink, CreateError> {
        self.repository.read_plan(plan_id).await?;
        self.repository.read_session_template(session_id).await?;
        if self
            .repository
            .find_link(plan_id, session_id)
            .await?
            .is_some()
        {
            return Err(CreateError::Conflict);
        }
        let mut links = self.repository.read_links_for_plan(plan_id).await?;
        // Re-derive a dense 1..N sequence before inserting, tolerating
        // gaps left behind by an interrupted earlier attempt.
        renumber(&mut links);
        let insert_pos = insert_position(position, links.len());
        for link in &mut links {
            if link.position >= insert_pos {
                link.position += 1;
            }
        }
        for link in links {
            self.repository.replace_link(link).await?;
        }
        self.repository
            .create_link(PlanSessionLink {
                plan_id,
                session_id,
                position: insert_pos,
            })
            .await
    }

    async fn detach_session(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
    ) -> Result<(), DeleteError> {
        let link = self
            .repository
            .find_link(plan_id, session_id)
            .await?
            .ok_or(DeleteError::NotFound)?;
        self.repository
            .delete_link(link.plan_id, link.session_id)
            .await?;
        let mut remaining = self.repository.read_links_for_plan(plan_id).await?;
        renumber(&mut remaining);
        for link in remaining {
            self.repository.replace_link(link).await?;
        }
        Ok(())
    }
}

impl<R> TrainingLogService for Service<R>
where
    R: IdentityRepository
        + SessionLogRepository
        + ExecutionLogRepository
        + SessionTemplateRepository
        + ExerciseTemplateRepository
        + ExerciseRepository,
{
    async fn start(
        &self,
        session_template_id: SessionTemplateID,
        notes: Option<String>,
    ) -> Result<SessionLogDetail, CreateError> {
        log_on_error!(
            self.start_session(session_template_id, notes),
            CreateError,
            "start",
            "session log"
        )
    }

    async fn update_execution(
        &self,
        update: ExecutionUpdate,
    ) -> Result<ExecutionLogView, UpdateError> {
        log_on_error!(
            self.record_execution(update),
            UpdateError,
            "update",
            "execution log"
        )
    }

    async fn complete(&self, id: SessionLogID) -> Result<SessionLogSummary, UpdateError> {
        log_on_error!(self.finish_session(id), UpdateError, "complete", "session log")
    }

    async fn abort(&self, id: SessionLogID) -> Result<SessionLogID, DeleteError> {
        log_on_error!(self.discard_session(id), DeleteError, "abort", "session log")
    }

    async fn get_log_detail(&self, id: SessionLogID) -> Result<SessionLogDetail, ReadError> {
        log_on_error!(self.session_log_detail(id), ReadError, "get", "session log")
    }

    async fn get_history(&self) -> Result<Vec<SessionLogSummary>, ReadError> {
        log_on_error!(self.training_history(), ReadError, "get", "training history")
    }
}

impl<R> Service<R>
where
    R: IdentityRepository
        + SessionLogRepository
        + ExecutionLogRepository
        + SessionTemplateRepository
        + ExerciseTemplateRepository
        + ExerciseRepository,
{
    async fn start_session(
        &self,
        session_template_id: SessionTemplateID,
        notes: Option<String>,
    ) -> Result<SessionLogDetail, CreateError> {
        let user_id = self.repository.current_user().await?;
        let session = self
            .repository
            .read_session_template(session_template_id)
            .await?;
        let templates = self
            .repository
            .read_exercise_templates_for_session(session.id)
            .await?;
        if templates.is_empty() {
            return Err(CreateError::InvalidInput(
                "a session template must contain at least one exercise to be logged".to_string(),
            ));
        }
        let log = self
            .repository
            .create_session_log(SessionLog {
                id: SessionLogID::nil(),
                session_template_id: session.id,
                user_id,
                status: LogStatus::InProgress,
                start_time: Local::now().naive_local(),
                end_time: None,
                notes,
            })
            .await?;
        for template in &templates {
            self.repository
                .create_execution_log(ExecutionLog {
                    id: ExecutionLogID::nil(),
                    session_log_id: log.id,
                    exercise_template_id: template.id,
                    actual_sets: template.planned_sets,
                    actual_reps: template.planned_reps,
                    actual_weight: template.planned_weight,
                    completed: false,
                    notes: None,
                })
                .await?;
        }
        // Reload after the fan-out so the returned detail reflects the
        // fully populated graph.
        let reloaded = self.repository.read_session_log(log.id).await?;
        self.session_log_detail_view(reloaded)
            .await
            .map_err(CreateError::from)
    }

    async fn record_execution(
        &self,
        update: ExecutionUpdate,
    ) -> Result<ExecutionLogView, UpdateError> {
        let existing = match update.execution_log_id {
            Some(id) => self.repository.find_execution_log(id).await?,
            None => None,
        };

        let saved = if let Some(exec) = existing {
            let log = self.repository.read_session_log(exec.session_log_id).await?;
            let user_id = self.repository.current_user().await?;
            if !log.is_owned_by(user_id) {
                return Err(UpdateError::Forbidden);
            }
            if !log.is_in_progress() {
                return Err(UpdateError::InvalidState(EDITS_REQUIRE_IN_PROGRESS));
            }
            self.repository
                .replace_execution_log(ExecutionLog {
                    id: exec.id,
                    session_log_id: exec.session_log_id,
                    exercise_template_id: exec.exercise_template_id,
                    actual_sets: update.actual_sets,
                    actual_reps: update.actual_reps,
                    actual_weight: update.actual_weight,
                    completed: update.completed.unwrap_or(false),
                    notes: update.notes,
                })
                .await?
        } else {
            let (Some(session_log_id), Some(exercise_template_id)) =
                (update.session_log_id, update.exercise_template_id)
            else {
                return Err(UpdateError::InvalidInput(
                    "session log id and exercise template id are required when no execution \
                     log id is given"
                        .to_string(),
                ));
            };
            let user_id = self.repository.current_user().await?;
            let log = self
                .repository
                .find_session_log(session_log_id, user_id)
                .await?
                .ok_or(UpdateError::NotFound)?;
            if !log.is_in_progress() {
                return Err(UpdateError::InvalidState(EDITS_REQUIRE_IN_PROGRESS));
            }
            let template = self
                .repository
                .read_exercise_template(exercise_template_id)
                .await?;
            match self
                .repository
                .find_execution_log_for_pair(log.id, template.id)
                .await?
            {
                Some(exec) => {
                    // Notes are only replaced when supplied on this path;
                    // the client addressing by pair may not resend them.
                    let notes = update.notes.or(exec.notes);
                    self.repository
                        .replace_execution_log(ExecutionLog {
                            id: exec.id,
                            session_log_id: exec.session_log_id,
                            exercise_template_id: exec.exercise_template_id,
                            actual_sets: update.actual_sets,
                            actual_reps: update.actual_reps,
                            actual_weight: update.actual_weight,
                            completed: update.completed.unwrap_or(false),
                            notes,
                        })
                        .await?
                }
                None => {
                    self.repository
                        .create_execution_log(ExecutionLog {
                            id: ExecutionLogID::nil(),
                            session_log_id: log.id,
                            exercise_template_id: template.id,
                            actual_sets: update.actual_sets,
                            actual_reps: update.actual_reps,
                            actual_weight: update.actual_weight,
                            completed: update.completed.unwrap_or(false),
                            notes: update.notes,
                        })
                        .await?
                }
            }
        };
        self.execution_log_view(saved).await.map_err(UpdateError::from)
    }

    async fn finish_session(&self, id: SessionLogID) -> Result<SessionLogSummary, UpdateError> {
        let user_id = self.repository.current_user().await?;
        let mut log = self
            .repository
            .find_session_log(id, user_id)
            .await?
            .ok_or(UpdateError::NotFound)?;
        if !log.is_in_progress() {
            return Err(UpdateError::InvalidState(COMPLETE_REQUIRES_IN_PROGRESS));
        }
        log.status = LogStatus::Completed;
        log.end_time = Some(Local::now().naive_local());
        let saved = self.repository.replace_session_log(log).await?;
        self.session_log_summary_view(saved)
            .await
            .map_err(UpdateError::from)
    }

    async fn discard_session(&self, id: SessionLogID) -> Result<SessionLogID, DeleteError> {
        let user_id = self.repository.current_user().await?;
        let log = self
            .repository
            .find_session_log(id, user_id)
            .await?
            .ok_or(DeleteError::NotFound)?;
        if !log.is_in_progress() {
            return Err(DeleteError::InvalidState(ABORT_REQUIRES_IN_PROGRESS));
        }
        self.repository
            .delete_execution_logs_for_session_log(log.id)
            .await?;
        self.repository.delete_session_log(log.id).await
    }

    async fn session_log_detail(&self, id: SessionLogID) -> Result<SessionLogDetail, ReadError> {
        let user_id = self.repository.current_user().await?;
        let log = self
            .repository
            .find_session_log(id, user_id)
            .await?
            .ok_or(ReadError::NotFound)?;
        self.session_log_detail_view(log).await
    }

    async fn training_history(&self) -> Result<Vec<SessionLogSummary>, ReadError> {
        let user_id = self.repository.current_user().await?;
        let logs = self.repository.read_session_logs_for_user(user_id).await?;
        let mut summaries = Vec::with_capacity(logs.len());
        for log in logs {
            summaries.push(self.session_log_summary_view(log).await?);
        }
        Ok(summaries)
    }

    async fn session_log_summary_view(
        &self,
        log: SessionLog,
    ) -> Result<SessionLogSummary, ReadError> {
        let session = self
            .repository
            .read_session_template(log.session_template_id)
            .await?;
        Ok(SessionLogSummary {
            id: log.id,
            session_template_id: log.session_template_id,
            session_name: session.name,
            start_time: log.start_time,
            end_time: log.end_time,
            status: log.status,
        })
    }

    async fn session_log_detail_view(&self, log: SessionLog) -> Result<SessionLogDetail, ReadError> {
        let session = self
            .repository
            .read_session_template(log.session_template_id)
            .await?;
        let execs = self
            .repository
            .read_execution_logs_for_session_log(log.id)
            .await?;
        let mut executions = Vec::with_capacity(execs.len());
        for exec in execs {
            let order_index = self
                .repository
                .read_exercise_template(exec.exercise_template_id)
                .await?
                .order_index;
            executions.push((order_index, self.execution_log_view(exec).await?));
        }
        executions.sort_by_key(|(order_index, _)| *order_index);
        Ok(SessionLogDetail {
            id: log.id,
            session_template_id: log.session_template_id,
            session_name: session.name,
            start_time: log.start_time,
            end_time: log.end_time,
            status: log.status,
            notes: log.notes,
            executions: executions.into_iter().map(|(_, view)| view).collect(),
        })
    }

    async fn execution_log_view(&self, log: ExecutionLog) -> Result<ExecutionLogView, ReadError> {
        let template = self
            .repository
            .read_exercise_template(log.exercise_template_id)
            .await?;
        let exercise = self.repository.read_exercise(template.exercise_id).await?;
        Ok(ExecutionLogView {
            id: log.id,
            exercise_template_id: template.id,
            exercise_name: exercise.name,
            planned_sets: template.planned_sets,
            planned_reps: template.planned_reps,
            planned_weight: template.planned_weight,
            actual_sets: log.actual_sets,
            actual_reps: log.actual_reps,
            actual_weight: log.actual_weight,
            completed: log.completed,
            notes: log.notes,
        })
    }
}
