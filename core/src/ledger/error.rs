use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no kill record for '{name}'")]
    UnknownNpc { name: String },

    /// The in-memory change stands; only the save request was lost
    #[error("failed to queue kill log save")]
    SaveNotQueued(#[source] StorageError),
}
