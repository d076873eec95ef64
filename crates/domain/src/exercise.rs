use std::collections::BTreeSet;

use derive_more::{AsRef, Deref, Display};
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(
        &self,
        name: Name,
        category: String,
        muscle_groups: BTreeSet<MuscleGroup>,
        description: Option<String>,
    ) -> Result<Exercise, CreateError>;
    async fn update_exercise(
        &self,
        id: ExerciseID,
        name: Name,
        category: String,
        muscle_groups: BTreeSet<MuscleGroup>,
        description: Option<String>,
    ) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(
        &self,
        name: Name,
        category: String,
        muscle_groups: BTreeSet<MuscleGroup>,
        description: Option<String>,
    ) -> Result<Exercise, CreateError>;
    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub category: String,
    pub muscle_groups: BTreeSet<MuscleGroup>,
    pub description: Option<String>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MuscleGroup(String);

impl MuscleGroup {
    pub fn new(name: &str) -> Result<Self, MuscleGroupError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(MuscleGroupError::Empty);
        }

        let len = trimmed_name.len();

        if len > 64 {
            return Err(MuscleGroupError::TooLong(len));
        }

        Ok(MuscleGroup(trimmed_name.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleGroupError {
    #[error("Muscle group must not be empty")]
    Empty,
    #[error("Muscle group must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}
