use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /users`. A missing `name` is a validation failure, not a
/// malformed request, so the field stays optional here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateUserCommand {
    #[serde(default)]
    pub name: Option<String>,
}

impl CreateUserCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Body of `PUT /users/{id}`; the id comes from the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserCommand {
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdateUserCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteUserCommand {
    pub user_id: String,
}
