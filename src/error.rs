#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Stored snapshot failed to decode: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error("Snapshot failed to encode: {0}")]
    Encode(String),
    #[error("Snapshot store failure: {0}")]
    Storage(#[from] sled::Error),
    #[error("No snapshot stored for collector {0}")]
    NotFound(String),
    #[error("Invalid timestamp {0:?}: {1}")]
    InvalidTimestamp(String, chrono::ParseError),
}
