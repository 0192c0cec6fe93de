use chrono::NaiveDateTime;
use uuid::Uuid;

use super::{Club, Competition};

/// Most places a club may book in a single request
pub const MAX_PLACES_PER_BOOKING: u32 = 12;

/// Rules applied to every booking request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookingPolicy {
    pub max_places: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            max_places: MAX_PLACES_PER_BOOKING,
        }
    }
}

/// Reasons a booking is refused
///
/// The display strings are shown to the club as-is.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("Missing data for booking.")]
    MissingData,
    #[error("Invalid club or competition.")]
    InvalidReference,
    #[error("Invalid number of places.")]
    InvalidQuantity,
    #[error("trying to book places for a past competition is not allowed")]
    PastCompetition,
    #[error(
        "booking 0 or less places is quite surprising, please book a significant number of places"
    )]
    NonPositiveQuantity,
    #[error("booking more than {max_places} places is not allowed")]
    QuantityCeilingExceeded { max_places: u32 },
    #[error("Not enough places available. Try to respect the number of places available.")]
    InsufficientCapacity { requested: u32, available: u32 },
    #[error(
        "Not enough club points available. Try to respect the limits of your available points for booking."
    )]
    InsufficientPoints { requested: u32, available: u32 },
}

impl BookingError {
    /// Whether the request itself is unusable and the club should be sent back home
    ///
    /// Every other reason keeps the club on its summary with the current totals.
    pub fn redirects(&self) -> bool {
        matches!(
            self,
            BookingError::MissingData
                | BookingError::InvalidReference
                | BookingError::InvalidQuantity
        )
    }
}

/// An accepted booking with the totals left afterwards
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Booking {
    pub booking_id: Uuid,
    pub club: Club,
    pub competition: Competition,
    pub places: u32,
}

impl Booking {
    pub fn new(club: Club, competition: Competition, places: u32) -> Self {
        Self {
            booking_id: Uuid::new_v4(),
            club,
            competition,
            places,
        }
    }
}

impl BookingPolicy {
    /// Check a booking request without touching any state
    ///
    /// Checks run in a fixed order and the first failure wins. Returns the number of places to
    /// take from both the competition and the club.
    pub fn validate(
        &self,
        club_name: &str,
        competition_name: &str,
        club: Option<&Club>,
        competition: Option<&Competition>,
        places: &str,
        now: NaiveDateTime,
    ) -> Result<u32, BookingError> {
        if club_name.is_empty() || competition_name.is_empty() || places.trim().is_empty() {
            return Err(BookingError::MissingData);
        }

        let (Some(club), Some(competition)) = (club, competition) else {
            return Err(BookingError::InvalidReference);
        };

        let requested: i64 = places
            .trim()
            .parse()
            .map_err(|_| BookingError::InvalidQuantity)?;

        if competition.is_past(now) {
            return Err(BookingError::PastCompetition);
        }
        if requested <= 0 {
            return Err(BookingError::NonPositiveQuantity);
        }
        if requested > i64::from(self.max_places) {
            return Err(BookingError::QuantityCeilingExceeded {
                max_places: self.max_places,
            });
        }
        // Bounded by `max_places` above
        let requested = u32::try_from(requested).map_err(|_| BookingError::InvalidQuantity)?;

        if requested > competition.number_of_places {
            return Err(BookingError::InsufficientCapacity {
                requested,
                available: competition.number_of_places,
            });
        }
        if requested > club.points {
            return Err(BookingError::InsufficientPoints {
                requested,
                available: club.points,
            });
        }

        Ok(requested)
    }
}
