#[derive(Debug, Clone)]
pub enum NotificationAction {
    /// Returns whether the flag changed.
    MarkRead,
}
