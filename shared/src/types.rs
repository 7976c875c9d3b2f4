/// Result type used at the application and CLI boundary.
pub type Result<T> = anyhow::Result<T>;
