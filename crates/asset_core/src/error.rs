use shared::domain::AssetId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("no edit session is open")]
    NoSession,
    #[error("a save for asset {0} is still in flight")]
    SubmitInFlight(AssetId),
}
