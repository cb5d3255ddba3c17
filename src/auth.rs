//! Identity of the signed-in user, as seen by the note subsystem.
//!
//! Login, logout and session cookies live outside this crate; all the note
//! code needs is who the current user is.

use std::sync::RwLock;

use crate::entity::OwnerId;
use crate::error::{NoteSyncError, Result};

pub trait Identity: Send + Sync {
    /// The signed-in user, or `None` when nobody is authenticated.
    fn current_user_id(&self) -> Option<OwnerId>;

    fn require_user(&self) -> Result<OwnerId> {
        self.current_user_id().ok_or(NoteSyncError::Unauthenticated)
    }
}

/// Identity that can be signed in and out at runtime.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user: RwLock<Option<OwnerId>>,
}

impl SessionIdentity {
    pub fn signed_in(user: OwnerId) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: OwnerId) {
        *self.user.write().unwrap_or_else(|p| p.into_inner()) = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(|p| p.into_inner()) = None;
    }
}

impl Identity for SessionIdentity {
    fn current_user_id(&self) -> Option<OwnerId> {
        self.user.read().unwrap_or_else(|p| p.into_inner()).clone()
    }
}
