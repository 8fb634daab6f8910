use database_traits::dao::GenericDao;
use tracing::instrument;
use user_commands::{
    CreateUserCommand, DeleteUserCommand, UpdateUserCommand,
};
use user_dao::UserDao;
use user_errors::UserError;
use user_responses::{
    CreateUserResponse, DeleteUserResponse, UpdateUserResponse,
};
use user_validation::ValidationService;

/// Unwraps a name that already passed validation. The name is stored as
/// given, untrimmed.
fn validated_name(name: Option<String>) -> Result<String, UserError> {
    name.ok_or_else(|| {
        UserError::InternalError(
            "user name missing after validation".to_string(),
        )
    })
}

#[derive(Clone)]
pub struct CreateUserHandler {
    user_dao: UserDao,
    validation: ValidationService,
}

impl CreateUserHandler {
    pub fn new(user_dao: UserDao, validation: ValidationService) -> Self {
        Self {
            user_dao,
            validation,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: CreateUserCommand,
    ) -> Result<CreateUserResponse, UserError> {
        self.validation.validate(&command)?;

        let saved_user =
            self.user_dao.create(validated_name(command.name)?).await?;

        Ok(saved_user.into())
    }
}

#[derive(Clone)]
pub struct UpdateUserHandler {
    user_dao: UserDao,
    validation: ValidationService,
}

impl UpdateUserHandler {
    pub fn new(user_dao: UserDao, validation: ValidationService) -> Self {
        Self {
            user_dao,
            validation,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, user_id: String, command: UpdateUserCommand,
    ) -> Result<UpdateUserResponse, UserError> {
        self.validation.validate(&command)?;

        let updated_user = self
            .user_dao
            .update(user_id, validated_name(command.name)?)
            .await?;

        Ok(updated_user.into())
    }
}

#[derive(Clone)]
pub struct DeleteUserHandler {
    user_dao: UserDao,
}

impl DeleteUserHandler {
    pub fn new(user_dao: UserDao) -> Self { Self { user_dao } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: DeleteUserCommand,
    ) -> Result<DeleteUserResponse, UserError> {
        let deleted_user = self.user_dao.delete(command.user_id).await?;

        Ok(deleted_user.into())
    }
}
