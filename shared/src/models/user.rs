//! User models

use serde::{Deserialize, Serialize};

use crate::types::{Id, UserRole};

/// A user as exposed in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Id,
    pub name: String,
    pub username: String,
    pub role: UserRole,
}
