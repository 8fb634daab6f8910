use database_traits::dao::GenericDao;
use tracing::instrument;
use user_dao::UserDao;
use user_errors::UserError;
use user_queries::{GetUserQuery, ListUsersQuery};
use user_responses::UserResponse;

#[derive(Clone)]
pub struct GetUserQueryHandler {
    user_dao: UserDao,
}

impl GetUserQueryHandler {
    pub fn new(user_dao: UserDao) -> Self { Self { user_dao } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: GetUserQuery,
    ) -> Result<UserResponse, UserError> {
        let user = self.user_dao.find_by_id(query.user_id).await?;

        tracing::debug!("Fetched user {}", user.id);

        Ok(user.into())
    }
}

#[derive(Clone)]
pub struct ListUsersQueryHandler {
    user_dao: UserDao,
}

impl ListUsersQueryHandler {
    pub fn new(user_dao: UserDao) -> Self { Self { user_dao } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, _query: ListUsersQuery,
    ) -> Result<Vec<UserResponse>, UserError> {
        let users = self.user_dao.all().await?;

        tracing::debug!("Listed {} users", users.len());

        Ok(users.into_iter().map(Into::into).collect())
    }
}
