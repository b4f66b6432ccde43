use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::ChatTurn;

/// Request to the conversational endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}
