use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;

use crate::{domain::Summary, ports::storage::StoragePort};

use super::{DomainLogic, Error};

/// How the club asking for its summary identifies itself
#[derive(Clone, Debug)]
pub enum ShowSummaryRequest {
    /// Login with the club's email
    ByEmail(String),
    /// Coming back from another page of an already identified club
    ByClubName(String),
}

impl<S> Service<ShowSummaryRequest> for DomainLogic<S>
where
    S: StoragePort + Send + Sync + 'static,
{
    type Response = Summary;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ShowSummaryRequest) -> Self::Future {
        let res = self.summary(&req);
        Box::pin(async move { res })
    }
}

impl<S> DomainLogic<S> {
    fn summary(&self, req: &ShowSummaryRequest) -> Result<Summary, Error> {
        let catalog = self.catalog()?;
        let club = match req {
            ShowSummaryRequest::ByEmail(email) if email.is_empty() => {
                return Err(Error::MissingField("email"))
            }
            ShowSummaryRequest::ByEmail(email) => catalog.find_club_by_email(email),
            ShowSummaryRequest::ByClubName(name) if name.is_empty() => {
                return Err(Error::MissingField("club"))
            }
            ShowSummaryRequest::ByClubName(name) => catalog.find_club_by_name(name),
        }
        .ok_or(Error::ClubNotFound)?;

        Ok(catalog.summarize(club))
    }
}
