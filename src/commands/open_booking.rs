use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use chrono::NaiveDateTime;
use serde::Serialize;
use tower::Service;

use crate::{
    domain::{BookingError, Club, Competition, Summary},
    ports::storage::StoragePort,
};

use super::{DomainLogic, Error};

#[derive(Clone, Debug)]
pub struct OpenBookingRequest {
    pub competition: String,
    pub club: String,
    pub now: NaiveDateTime,
}

/// Everything the booking form shows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookingPage {
    pub club: Club,
    pub competition: Competition,
    pub clubs: Vec<Club>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum OpenBookingResponse {
    Open(BookingPage),
    /// The competition no longer takes bookings
    Closed {
        reason: BookingError,
        summary: Summary,
    },
}

impl<S> Service<OpenBookingRequest> for DomainLogic<S>
where
    S: StoragePort + Send + Sync + 'static,
{
    type Response = OpenBookingResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: OpenBookingRequest) -> Self::Future {
        let res = self.booking_page(&req);
        Box::pin(async move { res })
    }
}

impl<S> DomainLogic<S> {
    fn booking_page(&self, req: &OpenBookingRequest) -> Result<OpenBookingResponse, Error> {
        let catalog = self.catalog()?;
        let (Some(club), Some(competition)) = (
            catalog.find_club_by_name(&req.club),
            catalog.find_competition_by_name(&req.competition),
        ) else {
            return Err(BookingError::InvalidReference.into());
        };

        if competition.is_past(req.now) {
            return Ok(OpenBookingResponse::Closed {
                reason: BookingError::PastCompetition,
                summary: catalog.summarize(club),
            });
        }

        Ok(OpenBookingResponse::Open(BookingPage {
            club: club.clone(),
            competition: competition.clone(),
            clubs: catalog.clubs().to_vec(),
        }))
    }
}
