use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use common_errors::{AppError, ProblemDetails};
use database_traits::SharedCollection;
use tracing::instrument;
use user_command_handlers::{
    CreateUserHandler, DeleteUserHandler, UpdateUserHandler,
};
use user_commands::{
    CreateUserCommand, DeleteUserCommand, UpdateUserCommand,
};
use user_dao::UserDao;
use user_queries::{GetUserQuery, ListUsersQuery};
use user_query_handlers::{GetUserQueryHandler, ListUsersQueryHandler};
use user_responses::{
    CreateUserResponse, DeleteUserResponse, UpdateUserResponse, UserResponse,
};
use user_validation::ValidationService;

#[derive(Clone)]
pub struct UserServices {
    pub create_user: CreateUserHandler,
    pub update_user: UpdateUserHandler,
    pub delete_user: DeleteUserHandler,

    pub get_user: GetUserQueryHandler,
    pub list_users: ListUsersQueryHandler,
}

impl UserServices {
    pub fn new(
        collection: SharedCollection, validation: ValidationService,
    ) -> Self {
        let user_dao = UserDao::new(collection);

        Self {
            create_user: CreateUserHandler::new(
                user_dao.clone(),
                validation.clone(),
            ),
            update_user: UpdateUserHandler::new(user_dao.clone(), validation),
            delete_user: DeleteUserHandler::new(user_dao.clone()),
            get_user: GetUserQueryHandler::new(user_dao.clone()),
            list_users: ListUsersQueryHandler::new(user_dao),
        }
    }
}

pub struct UserHandlers;

impl UserHandlers {
    pub fn routes() -> Router<UserServices> {
        Router::new()
            .route("/users", get(list_users).post(create_user))
            .route("/users/all", get(list_users))
            .route(
                "/users/{id}",
                get(get_user).put(update_user).delete(delete_user),
            )
    }
}

fn malformed_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request_with_details(
        "Malformed request body",
        &rejection.body_text(),
    )
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserCommand,
    responses(
        (status = 201, description = "User created successfully", body = CreateUserResponse,
            headers(("Location" = String, description = "URL of the created user"))),
        (status = 400, description = "Validation failed or malformed body", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn create_user(
    State(services): State<UserServices>,
    payload: Result<Json<CreateUserCommand>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(command) = payload.map_err(malformed_body)?;
    let result = services.create_user.execute(command).await?;

    tracing::info!("User created: {}", result.id);

    let location = HeaderValue::from_str(&format!("/users/{}", result.id))
        .map_err(AppError::from_error)?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(result),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    request_body = UpdateUserCommand,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User updated successfully", body = UpdateUserResponse),
        (status = 400, description = "Validation failed or malformed body", body = ProblemDetails),
        (status = 404, description = "User not found", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "users"
)]
#[instrument(skip_all, fields(user_id = %id))]
pub async fn update_user(
    State(services): State<UserServices>, Path(id): Path<String>,
    payload: Result<Json<UpdateUserCommand>, JsonRejection>,
) -> Result<Json<UpdateUserResponse>, AppError> {
    let Json(command) = payload.map_err(malformed_body)?;
    let result = services.update_user.execute(id, command).await?;

    tracing::info!("User updated: {}", result.id);

    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = DeleteUserResponse),
        (status = 404, description = "User not found", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "users"
)]
#[instrument(skip_all, fields(user_id = %id))]
pub async fn delete_user(
    State(services): State<UserServices>, Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, AppError> {
    let command = DeleteUserCommand { user_id: id };
    let result = services.delete_user.execute(command).await?;

    tracing::info!("User deleted: {}", result.id);

    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "users"
)]
#[instrument(skip_all, fields(user_id = %id))]
pub async fn get_user(
    State(services): State<UserServices>, Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let query = GetUserQuery { user_id: id };
    let user = services.get_user.execute(query).await?;

    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn list_users(
    State(services): State<UserServices>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = services.list_users.execute(ListUsersQuery::default()).await?;

    Ok(Json(users))
}
