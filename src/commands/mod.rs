use std::{
    borrow::Cow,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{info, warn};

use crate::{
    domain::{BookingError, BookingPolicy, Catalog},
    ports::storage::StoragePort,
};

pub mod book_places;
pub mod open_booking;
pub mod points_table;
pub mod show_summary;

/// Entry point for every use case
///
/// Holds the single in-memory [`Catalog`] shared by all requests, and the storage it was loaded
/// from. Cloning is cheap and shares both.
pub struct DomainLogic<S> {
    storage: Arc<S>,
    catalog: Arc<Mutex<Catalog>>,
    /// Held for the whole of a write so documents are written one snapshot at a time
    write_gate: Arc<tokio::sync::Mutex<()>>,
    policy: BookingPolicy,
}

impl<S> Clone for DomainLogic<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            catalog: self.catalog.clone(),
            write_gate: self.write_gate.clone(),
            policy: self.policy,
        }
    }
}

impl<S> DomainLogic<S> {
    pub fn new(storage: Arc<S>, catalog: Catalog, policy: BookingPolicy) -> Self {
        Self {
            storage,
            catalog: Arc::new(Mutex::new(catalog)),
            write_gate: Arc::default(),
            policy,
        }
    }

    /// Copy of the in-memory collections as they are right now
    pub fn snapshot(&self) -> Result<Catalog, Error> {
        Ok(self.catalog()?.clone())
    }

    fn catalog(&self) -> Result<MutexGuard<'_, Catalog>, Error> {
        Ok(self.catalog.lock()?)
    }
}

impl<S: StoragePort> DomainLogic<S> {
    /// Build the in-memory catalog from storage
    ///
    /// A missing or unreadable document is logged and treated as an empty collection; it never
    /// prevents startup.
    pub async fn load(storage: Arc<S>, policy: BookingPolicy) -> Self {
        let clubs = storage.load_clubs().await.unwrap_or_else(|err| {
            warn!(error = %err, "clubs unavailable, starting without clubs");
            Vec::new()
        });
        let competitions = storage.load_competitions().await.unwrap_or_else(|err| {
            warn!(error = %err, "competitions unavailable, starting without competitions");
            Vec::new()
        });
        info!(
            clubs = clubs.len(),
            competitions = competitions.len(),
            "catalog loaded"
        );

        Self::new(storage, Catalog::new(clubs, competitions), policy)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("storage port error: {0:?}")]
    Storage(#[from] crate::ports::storage::Error),
    #[error("booking refused: {0}")]
    Booking(#[from] BookingError),

    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("club not found")]
    ClubNotFound,

    #[error("invalid state")]
    InvalidState(Cow<'static, str>),
}

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::InvalidState(err.to_string().into())
    }
}
