use derive_more::Deref;
use uuid::Uuid;

use crate::ReadError;

/// Supplies the identity of the current caller. The core never
/// authenticates; it only consumes an opaque user id per request.
#[allow(async_fn_in_trait)]
pub trait IdentityRepository {
    /// Fails with [`ReadError::Unauthenticated`] if no caller is
    /// resolvable.
    async fn current_user(&self) -> Result<UserID, ReadError>;
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(Uuid);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}
