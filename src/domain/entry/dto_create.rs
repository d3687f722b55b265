use crate::domain::UserId;

#[derive(Debug, Clone)]
pub struct CreateEntryDto {
    pub content: String,
    /// Set from the authenticated caller, never from request input.
    pub user_id: UserId,
}
