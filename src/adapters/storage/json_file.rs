use std::{
    borrow::Cow,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::{
    domain::{Club, Competition},
    ports::storage::{Error, StoragePort},
};

/// Stores each collection as a single JSON document on disk
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    clubs_path: PathBuf,
    competitions_path: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct ClubsDocument<'a> {
    clubs: Cow<'a, [Club]>,
}

#[derive(Serialize, Deserialize)]
struct CompetitionsDocument<'a> {
    competitions: Cow<'a, [Competition]>,
}

impl JsonFileStorage {
    pub fn new(clubs_path: impl Into<PathBuf>, competitions_path: impl Into<PathBuf>) -> Self {
        Self {
            clubs_path: clubs_path.into(),
            competitions_path: competitions_path.into(),
        }
    }
}

#[async_trait::async_trait]
impl StoragePort for JsonFileStorage {
    async fn load_clubs(&self) -> Result<Vec<Club>, Error> {
        let document: ClubsDocument<'static> = read_document(&self.clubs_path).await?;
        Ok(document.clubs.into_owned())
    }

    async fn load_competitions(&self) -> Result<Vec<Competition>, Error> {
        let document: CompetitionsDocument<'static> =
            read_document(&self.competitions_path).await?;
        Ok(document.competitions.into_owned())
    }

    async fn save_clubs(&self, clubs: &[Club]) -> Result<(), Error> {
        let document = ClubsDocument {
            clubs: Cow::Borrowed(clubs),
        };
        write_document(&self.clubs_path, &document).await
    }

    async fn save_competitions(&self, competitions: &[Competition]) -> Result<(), Error> {
        let document = CompetitionsDocument {
            competitions: Cow::Borrowed(competitions),
        };
        write_document(&self.competitions_path, &document).await
    }
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::Missing(path.display().to_string()))
        }
        Err(err) => return Err(Error::Adapter(Box::new(err))),
    };

    serde_json::from_slice(&bytes).map_err(|err| Error::Malformed {
        document: path.display().to_string(),
        reason: err.to_string(),
    })
}

/// Overwrite the whole document, pretty-printed with four-space indentation
async fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), Error> {
    let mut buf = Vec::new();
    {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document
            .serialize(&mut serializer)
            .map_err(|err| Error::Adapter(Box::new(err)))?;
    }

    tokio::fs::write(path, &buf)
        .await
        .map_err(|err| Error::Adapter(Box::new(err)))?;
    debug!(path = %path.display(), bytes = buf.len(), "document written");

    Ok(())
}
