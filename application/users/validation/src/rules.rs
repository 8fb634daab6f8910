use user_commands::{CreateUserCommand, UpdateUserCommand};

use crate::Validator;

pub const NAME_REQUIRED: &str = "Name is required.";

/// Present and not blank after trimming.
pub fn name_required(name: Option<&str>) -> Option<String> {
    match name {
        Some(name) if !name.trim().is_empty() => None,
        _ => Some(NAME_REQUIRED.to_string()),
    }
}

pub fn create_user_validator() -> Validator<CreateUserCommand> {
    Validator::<CreateUserCommand>::new()
        .rule(|command| name_required(command.name.as_deref()))
}

pub fn update_user_validator() -> Validator<UpdateUserCommand> {
    Validator::<UpdateUserCommand>::new()
        .rule(|command| name_required(command.name.as_deref()))
}
