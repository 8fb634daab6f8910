//! Request validation.
//!
//! Every request shape that can be validated implements [`Validatable`],
//! which names the shape and picks its [`Validator`] out of the
//! [`ValidationService`]. The service is built once at startup, so the
//! shape → rules mapping is fixed and resolved at compile time.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use user_commands::{CreateUserCommand, UpdateUserCommand};

pub mod rules;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to validate {shape}: {}", .violations.join("; "))]
pub struct ValidationError {
    pub shape: &'static str,
    pub violations: Vec<String>,
}

/// A single check; `Some(message)` reports a violation.
pub type Rule<R> = fn(&R) -> Option<String>;

/// Ordered rule list for one request shape.
pub struct Validator<R> {
    rules: Vec<Rule<R>>,
}

impl<R> Validator<R> {
    pub fn new() -> Self { Self { rules: Vec::new() } }

    pub fn rule(mut self, rule: Rule<R>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Runs every rule and keeps the violations in rule order.
    pub fn check(&self, request: &R) -> Vec<String> {
        self.rules.iter().filter_map(|rule| rule(request)).collect()
    }
}

impl<R> Default for Validator<R> {
    fn default() -> Self { Self::new() }
}

pub trait Validatable: Sized {
    const SHAPE: &'static str;

    fn validator(service: &ValidationService) -> &Validator<Self>;
}

struct Validators {
    create_user: Validator<CreateUserCommand>,
    update_user: Validator<UpdateUserCommand>,
}

#[derive(Clone)]
pub struct ValidationService {
    validators: Arc<Validators>,
}

impl ValidationService {
    pub fn new(
        create_user: Validator<CreateUserCommand>,
        update_user: Validator<UpdateUserCommand>,
    ) -> Self {
        Self {
            validators: Arc::new(Validators {
                create_user,
                update_user,
            }),
        }
    }

    pub fn validate<R>(&self, request: &R) -> Result<(), ValidationError>
    where
        R: Validatable,
    {
        let violations = R::validator(self).check(request);

        if violations.is_empty() {
            return Ok(());
        }

        debug!(
            shape = R::SHAPE,
            violations = violations.len(),
            "Request failed validation"
        );

        Err(ValidationError {
            shape: R::SHAPE,
            violations,
        })
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new(rules::create_user_validator(), rules::update_user_validator())
    }
}

impl Validatable for CreateUserCommand {
    const SHAPE: &'static str = "CreateUserCommand";

    fn validator(service: &ValidationService) -> &Validator<Self> {
        &service.validators.create_user
    }
}

impl Validatable for UpdateUserCommand {
    const SHAPE: &'static str = "UpdateUserCommand";

    fn validator(service: &ValidationService) -> &Validator<Self> {
        &service.validators.update_user
    }
}
