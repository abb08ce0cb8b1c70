//! User request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    pub code: i32,

    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1, max = 128))]
    pub lastname: String,

    #[validate(email)]
    pub email: String,

    /// Graduation-year cohort
    pub promotion: i32,

    #[validate(length(min = 1, max = 16))]
    pub sex: String,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub password: String,
}

/// Update user request (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub lastname: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub promotion: Option<i32>,

    #[validate(length(min = 1, max = 16))]
    pub sex: Option<String>,
}

/// Change own password request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    pub current_password: String,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub new_password: String,
}

/// List users query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub promotion: Option<i32>,
}
