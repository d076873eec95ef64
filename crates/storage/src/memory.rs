use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use uuid::Uuid;

use kraft_domain::{
    CreateError, DeleteError, ExecutionLog, ExecutionLogID, ExecutionLogRepository, Exercise,
    ExerciseID, ExerciseRepository, ExerciseTemplate, ExerciseTemplateID,
    ExerciseTemplateRepository, IdentityRepository, MuscleGroup, Name, OrderIndex, PlanID,
    PlanLinkRepository, PlanRepository, PlanSessionLink, ReadError, Reps, SessionLog,
    SessionLogID, SessionLogRepository, SessionTemplate, SessionTemplateID,
    SessionTemplateRepository, Sets, StorageError, TrainingPlan, UpdateError, UserID, Weight,
};

/// A store keeping every entity in an in-process arena, one map per
/// entity keyed by id. Rows reference each other by id only; reads joining
/// entities are performed by the domain service. Each operation locks a
/// single arena, giving per-entity atomicity and nothing more.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<State>,
}

#[derive(Default)]
struct State {
    current_user: RwLock<UserID>,
    exercises: RwLock<HashMap<ExerciseID, Exercise>>,
    plans: RwLock<HashMap<PlanID, TrainingPlan>>,
    session_templates: RwLock<HashMap<SessionTemplateID, SessionTemplate>>,
    exercise_templates: RwLock<HashMap<ExerciseTemplateID, ExerciseTemplate>>,
    links: RwLock<HashMap<(PlanID, SessionTemplateID), PlanSessionLink>>,
    session_logs: RwLock<HashMap<SessionLogID, SessionLog>>,
    execution_logs: RwLock<HashMap<ExecutionLogID, ExecutionLog>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `user_id` the identity returned by [`IdentityRepository`]
    /// until signed out.
    pub fn sign_in(&self, user_id: UserID) -> Result<(), StorageError> {
        *write_lock(&self.state.current_user)? = user_id;
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), StorageError> {
        *write_lock(&self.state.current_user)? = UserID::nil();
        Ok(())
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StorageError> {
    lock.read()
        .map_err(|err| StorageError::Other(err.to_string().into()))
}

fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StorageError> {
    lock.write()
        .map_err(|err| StorageError::Other(err.to_string().into()))
}

impl IdentityRepository for InMemoryStore {
    async fn current_user(&self) -> Result<UserID, ReadError> {
        let user_id = *read_lock(&self.state.current_user)?;
        if user_id.is_nil() {
            return Err(ReadError::Unauthenticated);
        }
        Ok(user_id)
    }
}

impl ExerciseRepository for InMemoryStore {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        let exercises = read_lock(&self.state.exercises)?;
        let mut result = exercises.values().cloned().collect::<Vec<_>>();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        read_lock(&self.state.exercises)?
            .get(&id)
            .cloned()
            .ok_or(ReadError::NotFound)
    }

    async fn create_exercise(
        &self,
        name: Name,
        category: String,
        muscle_groups: BTreeSet<MuscleGroup>,
        description: Option<String>,
    ) -> Result<Exercise, CreateError> {
        let exercise = Exercise {
            id: Uuid::new_v4().into(),
            name,
            category,
            muscle_groups,
            description,
        };
        write_lock(&self.state.exercises)?.insert(exercise.id, exercise.clone());
        Ok(exercise)
    }

    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
        let mut exercises = write_lock(&self.state.exercises)?;
        if !exercises.contains_key(&exercise.id) {
            return Err(UpdateError::NotFound);
        }
        exercises.insert(exercise.id, exercise.clone());
        Ok(exercise)
    }

    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        write_lock(&self.state.exercises)?
            .remove(&id)
            .map(|_| id)
            .ok_or(DeleteError::NotFound)
    }
}

impl PlanRepository for InMemoryStore {
    async fn read_plans(&self) -> Result<Vec<TrainingPlan>, ReadError> {
        let plans = read_lock(&self.state.plans)?;
        let mut result = plans.values().cloned().collect::<Vec<_>>();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn read_plan(&self, id: PlanID) -> Result<TrainingPlan, ReadError> {
        read_lock(&self.state.plans)?
            .get(&id)
            .cloned()
            .ok_or(ReadError::NotFound)
    }

    async fn create_plan(
        &self,
        name: Name,
        description: String,
    ) -> Result<TrainingPlan, CreateError> {
        let plan = TrainingPlan {
            id: Uuid::new_v4().into(),
            name,
            description,
        };
        write_lock(&self.state.plans)?.insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn replace_plan(&self, plan: TrainingPlan) -> Result<TrainingPlan, UpdateError> {
        let mut plans = write_lock(&self.state.plans)?;
        if !plans.contains_key(&plan.id) {
            return Err(UpdateError::NotFound);
        }
        plans.insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError> {
        write_lock(&self.state.plans)?
            .remove(&id)
            .map(|_| id)
            .ok_or(DeleteError::NotFound)
    }
}

impl SessionTemplateRepository for InMemoryStore {
    async fn read_session_templates(&self) -> Result<Vec<SessionTemplate>, ReadError> {
        let session_templates = read_lock(&self.state.session_templates)?;
        let mut result = session_templates.values().cloned().collect::<Vec<_>>();
        result.sort_by_key(|s| s.id);
        Ok(result)
    }

    async fn read_session_template(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplate, ReadError> {
        read_lock(&self.state.session_templates)?
            .get(&id)
            .cloned()
            .ok_or(ReadError::NotFound)
    }

    async fn create_session_template(
        &self,
        name: Name,
        plan_id: Option<PlanID>,
        order_index: OrderIndex,
    ) -> Result<SessionTemplate, CreateError> {
        let session_template = SessionTemplate {
            id: Uuid::new_v4().into(),
            name,
            plan_id,
            order_index,
        };
        write_lock(&self.state.session_templates)?
            .insert(session_template.id, session_template.clone());
        Ok(session_template)
    }

    async fn replace_session_template(
        &self,
        session_template: SessionTemplate,
    ) -> Result<SessionTemplate, UpdateError> {
        let mut session_templates = write_lock(&self.state.session_templates)?;
        if !session_templates.contains_key(&session_template.id) {
            return Err(UpdateError::NotFound);
        }
        session_templates.insert(session_template.id, session_template.clone());
        Ok(session_template)
    }

    async fn delete_session_template(
        &self,
        id: SessionTemplateID,
    ) -> Result<SessionTemplateID, DeleteError> {
        write_lock(&self.state.session_templates)?
            .remove(&id)
            .map(|_| id)
            .ok_or(DeleteError::NotFound)
    }
}

impl ExerciseTemplateRepository for InMemoryStore {
    async fn read_exercise_templates_for_session(
        &self,
        session_id: SessionTemplateID,
    ) -> Result<Vec<ExerciseTemplate>, ReadError> {
        let exercise_templates = read_lock(&self.state.exercise_templates)?;
        let mut result = exercise_templates
            .values()
            .filter(|t| t.session_id == session_id)
            .cloned()
            .collect::<Vec<_>>();
        result.sort_by_key(|t| t.order_index);
        Ok(result)
    }

    async fn read_exercise_template(
        &self,
        id: ExerciseTemplateID,
    ) -> Result<ExerciseTemplate, ReadError> {
        read_lock(&self.state.exercise_templates)?
            .get(&id)
            .cloned()
            .ok_or(ReadError::NotFound)
    }

    async fn create_exercise_template(
        &self,
        session_id: SessionTemplateID,
        exercise_id: ExerciseID,
        planned_sets: Sets,
        planned_reps: Reps,
        planned_weight: Weight,
        order_index: OrderIndex,
    ) -> Result<ExerciseTemplate, CreateError> {
        let exercise_template = ExerciseTemplate {
            id: Uuid::new_v4().into(),
            session_id,
            exercise_id,
            planned_sets,
            planned_reps,
            planned_weight,
            order_index,
        };
        write_lock(&self.state.exercise_templates)?
            .insert(exercise_template.id, exercise_template.clone());
        Ok(exercise_template)
    }

    async fn replace_exercise_template(
        &self,
        exercise_template: ExerciseTemplate,
    ) -> Result<ExerciseTemplate, UpdateError> {
        let mut exercise_templates = write_lock(&self.state.exercise_templates)?;
        if !exercise_templates.contains_key(&exercise_template.id) {
            return Err(UpdateError::NotFound);
        }
        exercise_templates.insert(exercise_template.id, exercise_template.clone());
        Ok(exercise_template)
    }

    async fn delete_exercise_template(
        &self,
        id: ExerciseTemplateID,
    ) -> Result<ExerciseTemplateID, DeleteError> {
        write_lock(&self.state.exercise_templates)?
            .remove(&id)
            .map(|_| id)
            .ok_or(DeleteError::NotFound)
    }
}

impl PlanLinkRepository for InMemoryStore {
    async fn read_links_for_plan(
        &self,
        plan_id: PlanID,
    ) -> Result<Vec<PlanSessionLink>, ReadError> {
        let links = read_lock(&self.state.links)?;
        let mut result = links
            .values()
            .filter(|l| l.plan_id == plan_id)
            .cloned()
            .collect::<Vec<_>>();
        result.sort_by_key(|l| l.position);
        Ok(result)
    }

    async fn find_link(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
    ) -> Result<Option<PlanSessionLink>, ReadError> {
        Ok(read_lock(&self.state.links)?
            .get(&(plan_id, session_id))
            .cloned())
    }

    async fn create_link(&self, link: PlanSessionLink) -> Result<PlanSessionLink, CreateError> {
        let mut links = write_lock(&self.state.links)?;
        if links.contains_key(&(link.plan_id, link.session_id)) {
            return Err(CreateError::Conflict);
        }
        links.insert((link.plan_id, link.session_id), link.clone());
        Ok(link)
    }

    async fn replace_link(&self, link: PlanSessionLink) -> Result<PlanSessionLink, UpdateError> {
        let mut links = write_lock(&self.state.links)?;
        if !links.contains_key(&(link.plan_id, link.session_id)) {
            return Err(UpdateError::NotFound);
        }
        links.insert((link.plan_id, link.session_id), link.clone());
        Ok(link)
    }

    async fn delete_link(
        &self,
        plan_id: PlanID,
        session_id: SessionTemplateID,
    ) -> Result<(), DeleteError> {
        write_lock(&self.state.links)?
            .remove(&(plan_id, session_id))
            .map(|_| ())
            .ok_or(DeleteError::NotFound)
    }

    async fn delete_links_for_plan(&self, plan_id: PlanID) -> Result<(), DeleteError> {
        write_lock(&self.state.links)?.retain(|_, l| l.plan_id != plan_id);
        Ok(())
    }

    async fn delete_links_for_session(
        &self,
        session_id: SessionTemplateID,
    ) -> Result<(), DeleteError> {
        write_lock(&self.state.links)?.retain(|_, l| l.session_id != session_id);
        Ok(())
    }
}

impl SessionLogRepository for InMemoryStore {
    async fn read_session_log(&self, id: SessionLogID) -> Result<SessionLog, ReadError> {
        read_lock(&self.state.session_logs)?
            .get(&id)
            .cloned()
            .ok_or(ReadError::NotFound)
    }

    async fn find_session_log(
        &self,
        id: SessionLogID,
        user_id: UserID,
    ) -> Result<Option<SessionLog>, ReadError> {
        Ok(read_lock(&self.state.session_logs)?
            .get(&id)
            .filter(|l| l.user_id == user_id)
            .cloned())
    }

    async fn read_session_logs_for_user(
        &self,
        user_id: UserID,
    ) -> Result<Vec<SessionLog>, ReadError> {
        let session_logs = read_lock(&self.state.session_logs)?;
        let mut result = session_logs
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        result.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(result)
    }

    async fn count_session_logs_for_template(
        &self,
        session_template_id: SessionTemplateID,
    ) -> Result<usize, ReadError> {
        Ok(read_lock(&self.state.session_logs)?
            .values()
            .filter(|l| l.session_template_id == session_template_id)
            .count())
    }

    async fn create_session_log(&self, log: SessionLog) -> Result<SessionLog, CreateError> {
        let log = SessionLog {
            id: Uuid::new_v4().into(),
            ..log
        };
        write_lock(&self.state.session_logs)?.insert(log.id, log.clone());
        Ok(log)
    }

    async fn replace_session_log(&self, log: SessionLog) -> Result<SessionLog, UpdateError> {
        let mut session_logs = write_lock(&self.state.session_logs)?;
        if !session_logs.contains_key(&log.id) {
            return Err(UpdateError::NotFound);
        }
        session_logs.insert(log.id, log.clone());
        Ok(log)
    }

    async fn delete_session_log(&self, id: SessionLogID) -> Result<SessionLogID, DeleteError> {
        write_lock(&self.state.session_logs)?
            .remove(&id)
            .map(|_| id)
            .ok_or(DeleteError::NotFound)
    }
}

impl ExecutionLogRepository for InMemoryStore {
    async fn find_execution_log(
        &self,
        id: ExecutionLogID,
    ) -> Result<Option<ExecutionLog>, ReadError> {
        Ok(read_lock(&self.state.execution_logs)?.get(&id).cloned())
    }

    async fn find_execution_log_for_pair(
        &self,
        session_log_id: SessionLogID,
        exercise_template_id: ExerciseTemplateID,
    ) -> Result<Option<ExecutionLog>, ReadError> {
        Ok(read_lock(&self.state.execution_logs)?
            .values()
            .find(|l| {
                l.session_log_id == session_log_id
                    && l.exercise_template_id == exercise_template_id
            })
            .cloned())
    }

    async fn read_execution_logs_for_session_log(
        &self,
        session_log_id: SessionLogID,
    ) -> Result<Vec<ExecutionLog>, ReadError> {
        let execution_logs = read_lock(&self.state.execution_logs)?;
        let mut result = execution_logs
            .values()
            .filter(|l| l.session_log_id == session_log_id)
            .cloned()
            .collect::<Vec<_>>();
        result.sort_by_key(|l| l.id);
        Ok(result)
    }

    async fn create_execution_log(&self, log: ExecutionLog) -> Result<ExecutionLog, CreateError> {
        let log = ExecutionLog {
            id: Uuid::new_v4().into(),
            ..log
        };
        write_lock(&self.state.execution_logs)?.insert(log.id, log.clone());
        Ok(log)
    }

    async fn replace_execution_log(&self, log: ExecutionLog) -> Result<ExecutionLog, UpdateError> {
        let mut execution_logs = write_lock(&self.state.execution_logs)?;
        if !execution_logs.contains_key(&log.id) {
            return Err(UpdateError::NotFound);
        }
        execution_logs.insert(log.id, log.clone());
        Ok(log)
    }

    async fn delete_execution_logs_for_session_log(
        &self,
        session_log_id: SessionLogID,
    ) -> Result<(), DeleteError> {
        write_lock(&self.state.execution_logs)?
            .retain(|_, l| l.session_log_id != session_log_id);
        Ok(())
    }
}
