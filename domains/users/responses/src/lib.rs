use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! user_response {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
            pub struct $name {
                pub id: String,
                pub name: String,
            }

            impl From<user_models::User> for $name {
                fn from(user: user_models::User) -> Self {
                    Self {
                        id: user.id,
                        name: user.name,
                    }
                }
            }
        )+
    };
}

user_response!(
    /// A user as returned by the read endpoints.
    UserResponse,
    /// The user that was just created, including its new id.
    CreateUserResponse,
    UpdateUserResponse,
    /// The user as it existed right before removal.
    DeleteUserResponse,
);
