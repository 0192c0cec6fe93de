use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;
use tracing::warn;

use crate::{domain::ClubPoints, ports::storage::StoragePort};

use super::{DomainLogic, Error};

/// Ask for every club's current balance
///
/// The table is built from storage, not from the in-memory catalog. A missing or unreadable
/// clubs document is returned as [`Error::Storage`] so the caller can tell the club why the
/// table is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointsTableRequest;

impl<S> Service<PointsTableRequest> for DomainLogic<S>
where
    S: StoragePort + Send + Sync + 'static,
{
    type Response = Vec<ClubPoints>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: PointsTableRequest) -> Self::Future {
        let storage = self.storage.clone();
        Box::pin(async move {
            let clubs = storage.load_clubs().await.map_err(|err| {
                warn!(error = %err, "clubs unavailable for the points table");
                err
            })?;

            Ok(clubs.iter().map(ClubPoints::from).collect())
        })
    }
}
