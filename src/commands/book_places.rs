use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use chrono::NaiveDateTime;
use tower::Service;
use tracing::{error, info, warn};

use crate::{
    domain::{Booking, BookingError, Summary},
    ports::storage::StoragePort,
};

use super::{DomainLogic, Error};

/// Purchase form as submitted by a club
///
/// The place count is kept as typed; parsing it is part of the booking rules.
#[derive(Clone, Debug)]
pub struct BookPlacesRequest {
    pub club: String,
    pub competition: String,
    pub places: String,
    pub now: NaiveDateTime,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BookPlacesResponse {
    /// Places and points were taken
    ///
    /// `persisted` is false when writing either document failed. The in-memory totals keep the
    /// booking regardless.
    Booked {
        booking: Booking,
        summary: Summary,
        persisted: bool,
    },
    /// A business rule refused the booking; `summary` holds the unchanged totals
    Rejected {
        reason: BookingError,
        summary: Summary,
    },
}

enum Applied {
    Booked { booking: Booking, summary: Summary },
    Rejected {
        reason: BookingError,
        summary: Summary,
    },
}

impl<S> Service<BookPlacesRequest> for DomainLogic<S>
where
    S: StoragePort + Send + Sync + 'static,
{
    type Response = BookPlacesResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BookPlacesRequest) -> Self::Future {
        let logic = self.clone();
        Box::pin(async move {
            // Validate and apply under the lock, then write outside of it
            let (booking, summary) = match logic.apply_booking(&req)? {
                Applied::Booked { booking, summary } => (booking, summary),
                Applied::Rejected { reason, summary } => {
                    return Ok(BookPlacesResponse::Rejected { reason, summary })
                }
            };

            let persisted = logic.persist().await?;
            info!(
                booking_id = %booking.booking_id,
                club = %booking.club.name,
                competition = %booking.competition.name,
                places = booking.places,
                persisted,
                "places booked"
            );

            Ok(BookPlacesResponse::Booked {
                booking,
                summary,
                persisted,
            })
        })
    }
}

impl<S: StoragePort> DomainLogic<S> {
    fn apply_booking(&self, req: &BookPlacesRequest) -> Result<Applied, Error> {
        let mut catalog = self.catalog()?;

        match catalog.book(
            &req.club,
            &req.competition,
            &req.places,
            req.now,
            &self.policy,
        ) {
            Ok(booking) => {
                let summary = catalog.summarize(&booking.club);
                Ok(Applied::Booked { booking, summary })
            }
            Err(reason) => {
                warn!(
                    club = %req.club,
                    competition = %req.competition,
                    places = %req.places,
                    reason = %reason,
                    "booking refused"
                );
                if reason.redirects() {
                    return Err(reason.into());
                }
                // The club exists once the reference check has passed
                let club = catalog
                    .find_club_by_name(&req.club)
                    .ok_or(Error::Booking(BookingError::InvalidReference))?;
                let summary = catalog.summarize(club);
                Ok(Applied::Rejected { reason, summary })
            }
        }
    }

    /// Write both documents, competitions first
    ///
    /// The snapshot is taken once the write gate is held, so the last write always carries the
    /// latest totals. Both writes are attempted even when the first one fails. Nothing is rolled
    /// back.
    async fn persist(&self) -> Result<bool, Error> {
        let _gate = self.write_gate.lock().await;
        let snapshot = self.snapshot()?;

        let competitions = self
            .storage
            .save_competitions(snapshot.competitions())
            .await;
        let clubs = self.storage.save_clubs(snapshot.clubs()).await;

        let mut persisted = true;
        if let Err(err) = competitions {
            error!(error = %err, "failed to save competitions");
            persisted = false;
        }
        if let Err(err) = clubs {
            error!(error = %err, "failed to save clubs");
            persisted = false;
        }
        Ok(persisted)
    }
}
