use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ListUsersQuery {}

#[derive(Debug, Deserialize, Clone)]
pub struct GetUserQuery {
    pub user_id: String,
}
