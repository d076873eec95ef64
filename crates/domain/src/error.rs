#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error("not authenticated")]
    Unauthenticated,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("{0}")]
    InvalidInput(String),
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("not authenticated")]
    Unauthenticated,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("{0}")]
    InvalidInput(String),
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("not authenticated")]
    Unauthenticated,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("{0}")]
    InvalidInput(String),
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("not authenticated")]
    Unauthenticated,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for CreateError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => CreateError::NotFound,
            ReadError::Unauthenticated => CreateError::Unauthenticated,
            ReadError::Storage(storage) => CreateError::Storage(storage),
            ReadError::Other(other) => CreateError::Other(other),
        }
    }
}

impl From<ReadError> for UpdateError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => UpdateError::NotFound,
            ReadError::Unauthenticated => UpdateError::Unauthenticated,
            ReadError::Storage(storage) => UpdateError::Storage(storage),
            ReadError::Other(other) => UpdateError::Other(other),
        }
    }
}

impl From<ReadError> for DeleteError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => DeleteError::NotFound,
            ReadError::Unauthenticated => DeleteError::Unauthenticated,
            ReadError::Storage(storage) => DeleteError::Storage(storage),
            ReadError::Other(other) => DeleteError::Other(other),
        }
    }
}

impl From<UpdateError> for CreateError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::NotFound => CreateError::NotFound,
            UpdateError::Conflict => CreateError::Conflict,
            UpdateError::InvalidInput(message) => CreateError::InvalidInput(message),
            UpdateError::Forbidden => CreateError::Forbidden,
            UpdateError::InvalidState(message) => CreateError::InvalidState(message),
            UpdateError::Unauthenticated => CreateError::Unauthenticated,
            UpdateError::Storage(storage) => CreateError::Storage(storage),
            UpdateError::Other(other) => CreateError::Other(other),
        }
    }
}

impl From<CreateError> for UpdateError {
    fn from(value: CreateError) -> Self {
        match value {
            CreateError::NotFound => UpdateError::NotFound,
            CreateError::Conflict => UpdateError::Conflict,
            CreateError::InvalidInput(message) => UpdateError::InvalidInput(message),
            CreateError::Forbidden => UpdateError::Forbidden,
            CreateError::InvalidState(message) => UpdateError::InvalidState(message),
            CreateError::Unauthenticated => UpdateError::Unauthenticated,
            CreateError::Storage(storage) => UpdateError::Storage(storage),
            CreateError::Other(other) => UpdateError::Other(other),
        }
    }
}

impl From<UpdateError> for DeleteError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::NotFound => DeleteError::NotFound,
            UpdateError::Conflict => DeleteError::Conflict,
            UpdateError::InvalidInput(message) => DeleteError::InvalidInput(message),
            UpdateError::Forbidden => DeleteError::Forbidden,
            UpdateError::InvalidState(message) => DeleteError::InvalidState(message),
            UpdateError::Unauthenticated => DeleteError::Unauthenticated,
            UpdateError::Storage(storage) => DeleteError::Storage(storage),
            UpdateError::Other(other) => DeleteError::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_error_from_read_error() {
        assert!(matches!(
            CreateError::from(ReadError::NotFound),
            CreateError::NotFound
        ));
        assert!(matches!(
            CreateError::from(ReadError::Unauthenticated),
            CreateError::Unauthenticated
        ));
        assert!(matches!(
            CreateError::from(ReadError::Storage(StorageError::NoConnection)),
            CreateError::Storage(StorageError::NoConnection)
        ));
        assert!(matches!(
            CreateError::from(ReadError::Other("foo".into())),
            CreateError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_update_error_from_read_error() {
        assert!(matches!(
            UpdateError::from(ReadError::NotFound),
            UpdateError::NotFound
        ));
        assert!(matches!(
            UpdateError::from(ReadError::Storage(StorageError::NoConnection)),
            UpdateError::Storage(StorageError::NoConnection)
        ));
    }

    #[test]
    fn test_delete_error_from_update_error() {
        assert!(matches!(
            DeleteError::from(UpdateError::Conflict),
            DeleteError::Conflict
        ));
        assert!(matches!(
            DeleteError::from(UpdateError::InvalidState("in progress")),
            DeleteError::InvalidState("in progress")
        ));
        assert!(matches!(
            DeleteError::from(UpdateError::Other("foo".into())),
            DeleteError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_create_error_from_update_error() {
        assert!(matches!(
            CreateError::from(UpdateError::Conflict),
            CreateError::Conflict
        ));
        assert!(matches!(
            CreateError::from(UpdateError::InvalidInput("bad".to_string())),
            CreateError::InvalidInput(message) if message == "bad"
        ));
        assert!(matches!(
            CreateError::from(UpdateError::Storage(StorageError::NoConnection)),
            CreateError::Storage(StorageError::NoConnection)
        ));
    }

    #[test]
    fn test_update_error_from_create_error() {
        assert!(matches!(
            UpdateError::from(CreateError::Conflict),
            UpdateError::Conflict
        ));
        assert!(matches!(
            UpdateError::from(CreateError::NotFound),
            UpdateError::NotFound
        ));
    }
}
