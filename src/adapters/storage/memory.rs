use crate::{
    domain::{Club, Competition},
    ports::storage::{Error, StoragePort},
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

/// Storage keeping both documents in memory
///
/// `None` stands for a document that does not exist. Saves can be made to fail on demand.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    clubs: Arc<Mutex<Option<Vec<Club>>>>,
    competitions: Arc<Mutex<Option<Vec<Competition>>>>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new(clubs: Vec<Club>, competitions: Vec<Competition>) -> Self {
        Self {
            clubs: Arc::new(Mutex::new(Some(clubs))),
            competitions: Arc::new(Mutex::new(Some(competitions))),
            fail_saves: Arc::default(),
        }
    }

    /// Make every following save fail (or succeed again)
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), Error> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Adapter(Box::new(WriteRefused)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl StoragePort for MemoryStorage {
    async fn load_clubs(&self) -> Result<Vec<Club>, Error> {
        self.clubs
            .lock()?
            .clone()
            .ok_or_else(|| Error::Missing("clubs".to_string()))
    }

    async fn load_competitions(&self) -> Result<Vec<Competition>, Error> {
        self.competitions
            .lock()?
            .clone()
            .ok_or_else(|| Error::Missing("competitions".to_string()))
    }

    async fn save_clubs(&self, clubs: &[Club]) -> Result<(), Error> {
        self.check_writable()?;
        *self.clubs.lock()? = Some(clubs.to_vec());
        Ok(())
    }

    async fn save_competitions(&self, competitions: &[Competition]) -> Result<(), Error> {
        self.check_writable()?;
        *self.competitions.lock()? = Some(competitions.to_vec());
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("writes are disabled")]
pub struct WriteRefused;

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}
