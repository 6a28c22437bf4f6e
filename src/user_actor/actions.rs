/// Custom actions for User entities.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Sets the approval flag. Returns whether it changed.
    SetApproved(bool),
}
