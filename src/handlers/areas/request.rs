//! Area request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_NAME_LENGTH;

/// Create area request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAreaRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    pub color: Option<String>,

    /// Users responsible for the area
    #[validate(length(min = 1))]
    pub responsible: Vec<Uuid>,
}

/// Update area request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAreaRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    pub color: Option<String>,

    #[validate(length(min = 1))]
    pub responsible: Vec<Uuid>,
}
