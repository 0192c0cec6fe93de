use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

mod booking;
mod serde_fields;

pub use booking::{Booking, BookingError, BookingPolicy, MAX_PLACES_PER_BOOKING};
pub use serde_fields::DATE_FORMAT;

/// Anything that can be looked up by its display name
pub trait Named {
    fn name(&self) -> &str;
}

/// A club spending points to book competition places
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    /// Unique display name, also used to reference the club in booking forms
    pub name: String,
    /// Unique login email
    #[serde(default)]
    pub email: String,
    /// Spendable balance
    ///
    /// Older documents store this as a numeric string. Both forms are accepted on load and the
    /// value is always written back as an integer. An absent balance is 0.
    #[serde(default, deserialize_with = "serde_fields::count")]
    pub points: u32,
}

impl Named for Club {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub name: String,
    /// Scheduled start, in local time
    #[serde(with = "serde_fields::timestamp")]
    pub date: NaiveDateTime,
    /// Remaining capacity
    #[serde(rename = "numberOfPlaces", deserialize_with = "serde_fields::count")]
    pub number_of_places: u32,
}

impl Competition {
    /// Whether the competition has already started at `now`
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.date <= now
    }
}

impl Named for Competition {
    fn name(&self) -> &str {
        &self.name
    }
}

/// First entry of `collection` whose name matches exactly
pub fn find_by_name<'a, T: Named>(collection: &'a [T], name: &str) -> Option<&'a T> {
    collection.iter().find(|item| item.name() == name)
}

/// A club together with every competition, as shown after login
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub club: Club,
    pub competitions: Vec<Competition>,
}

/// Entry of the public points table
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClubPoints {
    pub name: String,
    pub points: u32,
}

impl From<&Club> for ClubPoints {
    fn from(club: &Club) -> Self {
        Self {
            name: club.name.clone(),
            points: club.points,
        }
    }
}

/// In-memory copy of both collections
///
/// Built once at startup from storage. Only the numeric fields change afterwards, and only
/// through [`Catalog::book`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    clubs: Vec<Club>,
    competitions: Vec<Competition>,
}

impl Catalog {
    pub fn new(clubs: Vec<Club>, competitions: Vec<Competition>) -> Self {
        Self {
            clubs,
            competitions,
        }
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn competitions(&self) -> &[Competition] {
        &self.competitions
    }

    pub fn find_club_by_email(&self, email: &str) -> Option<&Club> {
        self.clubs.iter().find(|club| club.email == email)
    }

    pub fn find_club_by_name(&self, name: &str) -> Option<&Club> {
        find_by_name(&self.clubs, name)
    }

    pub fn find_competition_by_name(&self, name: &str) -> Option<&Competition> {
        find_by_name(&self.competitions, name)
    }

    /// The club and the full list of competitions, unfiltered
    pub fn summarize(&self, club: &Club) -> Summary {
        Summary {
            club: club.clone(),
            competitions: self.competitions.clone(),
        }
    }

    /// Validate a booking and, if it is accepted, take the places and points
    ///
    /// Both totals are decremented together or not at all.
    pub fn book(
        &mut self,
        club_name: &str,
        competition_name: &str,
        places: &str,
        now: NaiveDateTime,
        policy: &BookingPolicy,
    ) -> Result<Booking, BookingError> {
        let club_idx = self.clubs.iter().position(|c| c.name == club_name);
        let competition_idx = self
            .competitions
            .iter()
            .position(|c| c.name == competition_name);

        let requested = policy.validate(
            club_name,
            competition_name,
            club_idx.map(|idx| &self.clubs[idx]),
            competition_idx.map(|idx| &self.competitions[idx]),
            places,
            now,
        )?;

        // Both indices exist once validation has passed
        let (Some(club_idx), Some(competition_idx)) = (club_idx, competition_idx) else {
            return Err(BookingError::InvalidReference);
        };

        let competition = &mut self.competitions[competition_idx];
        competition.number_of_places -= requested;
        let club = &mut self.clubs[club_idx];
        club.points -= requested;

        Ok(Booking::new(
            self.clubs[club_idx].clone(),
            self.competitions[competition_idx].clone(),
            requested,
        ))
    }
}
