use serde::Deserialize;

use crate::error::AppError;

pub mod cycle;
pub mod cycle_stats;
pub mod dedup;

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

/// The identity provider's user id, trusted as given but never blank.
pub(crate) fn require_user(user_id: &str) -> Result<&str, AppError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::MalformedPayload("user_id is required".into()));
    }
    Ok(user_id)
}
