use crate::domain::{Club, Competition};

/// Whole-document persistence for both collections
///
/// Saving always replaces the entire document; there is no incremental format.
#[mockall::automock]
#[async_trait::async_trait]
pub trait StoragePort {
    async fn load_clubs(&self) -> Result<Vec<Club>, Error>;
    async fn load_competitions(&self) -> Result<Vec<Competition>, Error>;
    async fn save_clubs(&self, clubs: &[Club]) -> Result<(), Error>;
    async fn save_competitions(&self, competitions: &[Competition]) -> Result<(), Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing document does not exist
    #[error("document {0} not found")]
    Missing(String),

    /// The backing document exists but does not hold the expected collection
    ///
    /// Also covers counts that are neither integers nor numeric strings.
    #[error("failed to decode {document}: {reason}")]
    Malformed { document: String, reason: String },

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as I/O or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
