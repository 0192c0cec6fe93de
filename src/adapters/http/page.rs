//! Responses of the club-facing pages.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    commands::open_booking::BookingPage,
    domain::{Club, ClubPoints, Competition, Summary},
};

pub const HOME_TITLE: &str = "Welcome to the competition booking portal!";

/// What a page shows
#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Home {
        title: &'static str,
        prompt: &'static str,
    },
    Welcome {
        club: Club,
        competitions: Vec<Competition>,
    },
    Booking {
        club: Club,
        competition: Competition,
        clubs: Vec<Club>,
    },
    Points {
        clubs: Vec<ClubPoints>,
    },
}

impl View {
    pub fn home() -> Self {
        View::Home {
            title: HOME_TITLE,
            prompt: "Please enter your secretary email to continue:",
        }
    }
}

impl From<Summary> for View {
    fn from(summary: Summary) -> Self {
        View::Welcome {
            club: summary.club,
            competitions: summary.competitions,
        }
    }
}

impl From<BookingPage> for View {
    fn from(page: BookingPage) -> Self {
        View::Booking {
            club: page.club,
            competition: page.competition,
            clubs: page.clubs,
        }
    }
}

/// Either a rendered view or a redirect, each carrying one-shot messages for the club
#[derive(Debug)]
pub enum Page {
    Render { view: View, messages: Vec<String> },
    Redirect {
        location: &'static str,
        messages: Vec<String>,
    },
}

impl Page {
    pub fn render(view: impl Into<View>) -> Self {
        Page::Render {
            view: view.into(),
            messages: Vec::new(),
        }
    }

    /// Send the club back home
    pub fn home_redirect() -> Self {
        Page::Redirect {
            location: "/",
            messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        match &mut self {
            Page::Render { messages, .. } | Page::Redirect { messages, .. } => {
                messages.push(message.into())
            }
        }
        self
    }
}

#[derive(Serialize)]
struct RenderBody<'a> {
    #[serde(flatten)]
    view: &'a View,
    messages: &'a [String],
}

#[derive(Serialize)]
struct RedirectBody<'a> {
    messages: &'a [String],
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::Render { view, messages } => (
                StatusCode::OK,
                Json(RenderBody {
                    view: &view,
                    messages: &messages,
                }),
            )
                .into_response(),
            Page::Redirect { location, messages } => (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, location)],
                Json(RedirectBody {
                    messages: &messages,
                }),
            )
                .into_response(),
        }
    }
}
