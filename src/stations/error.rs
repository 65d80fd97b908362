use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationDirectoryError {
    #[error("Failed to parse station directory data")]
    DirectoryParse(#[source] serde_json::Error),
}
