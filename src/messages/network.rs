//! Network messages - communication between App and Network layers

use std::sync::Arc;

use crate::error::ClientError;
use crate::models::{Avatar, LoginOutcome, SessionCredential, User};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    Login {
        id: u64,
        username: String,
        password: String,
    },
    /// Best-effort; nothing is reported back
    Logout {
        credential: Option<SessionCredential>,
    },
    ListUsers {
        id: u64,
        credential: Option<SessionCredential>,
    },
    DeleteUser {
        id: u64,
        user_id: i64,
        credential: Option<SessionCredential>,
    },
    /// Fetch the avatar for `user`; the user snapshot is echoed back with the result
    FetchAvatar {
        id: u64,
        user: User,
        credential: Option<SessionCredential>,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug)]
pub enum NetworkResponse {
    LoginCompleted {
        id: u64,
        result: Result<LoginOutcome, ClientError>,
    },
    UsersLoaded {
        id: u64,
        result: Result<Vec<User>, ClientError>,
    },
    UserDeleted {
        id: u64,
        user_id: i64,
        result: Result<(), ClientError>,
    },
    /// Avatar fetch finished; `Ok(None)` when the user has no avatar
    AvatarLoaded {
        id: u64,
        user: User,
        result: Result<Option<Arc<Avatar>>, ClientError>,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::LoginCompleted { id, .. } => *id,
            NetworkResponse::UsersLoaded { id, .. } => *id,
            NetworkResponse::UserDeleted { id, .. } => *id,
            NetworkResponse::AvatarLoaded { id, .. } => *id,
        }
    }
}
