//! Club-facing page handlers.

use std::path;

use axum::{
    extract::{Path, Query, State},
    Form,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tower::ServiceExt;
use tracing::error;

use super::page::{Page, View};
use crate::{
    commands::{
        book_places::{BookPlacesRequest, BookPlacesResponse},
        open_booking::{OpenBookingRequest, OpenBookingResponse},
        points_table::PointsTableRequest,
        show_summary::ShowSummaryRequest,
        DomainLogic, Error,
    },
    ports::storage::{self, StoragePort},
};

pub const BOOKING_COMPLETE: &str = "Great, booking complete!";
pub const SAVE_FAILED: &str = "An error occurred while saving data. Please try again.";
pub const NO_POINTS_DATA: &str = "No club data available to display points.";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ClubQuery {
    #[serde(default)]
    pub club: String,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseForm {
    #[serde(default)]
    pub competition: String,
    #[serde(default)]
    pub club: String,
    #[serde(default)]
    pub places: String,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Unexpected failures send the club home with a generic message
fn unexpected(err: Error) -> Page {
    error!(error = %err, "request failed");
    Page::home_redirect().with_message("An unexpected error occurred.")
}

/// Warning shown to the club when a stored document cannot be read
fn storage_warning(err: &storage::Error) -> String {
    fn file_name(document: &str) -> String {
        path::Path::new(document)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| document.to_string())
    }

    match err {
        storage::Error::Missing(document) => {
            format!("Error: {} file not found.", file_name(document))
        }
        storage::Error::Malformed { document, .. } => {
            format!("Error: Failed to decode {}.", file_name(document))
        }
        storage::Error::Adapter(_) => "Error: Failed to read club data.".to_string(),
    }
}

pub async fn home() -> Page {
    Page::render(View::home())
}

pub async fn logout() -> Page {
    Page::home_redirect()
}

pub async fn show_summary<S>(State(logic): State<DomainLogic<S>>, Form(form): Form<LoginForm>) -> Page
where
    S: StoragePort + Send + Sync + 'static,
{
    match logic.oneshot(ShowSummaryRequest::ByEmail(form.email)).await {
        Ok(summary) => Page::render(summary),
        Err(Error::MissingField(_)) => Page::home_redirect().with_message("Email is required."),
        Err(Error::ClubNotFound) => Page::home_redirect().with_message("Club not found."),
        Err(err) => unexpected(err),
    }
}

pub async fn summary_by_club<S>(
    State(logic): State<DomainLogic<S>>,
    Query(query): Query<ClubQuery>,
) -> Page
where
    S: StoragePort + Send + Sync + 'static,
{
    match logic.oneshot(ShowSummaryRequest::ByClubName(query.club)).await {
        Ok(summary) => Page::render(summary),
        Err(Error::MissingField(_)) => {
            Page::home_redirect().with_message("Club information is missing.")
        }
        Err(Error::ClubNotFound) => Page::home_redirect().with_message("Club not found."),
        Err(err) => unexpected(err),
    }
}

pub async fn book<S>(
    State(logic): State<DomainLogic<S>>,
    Path((competition, club)): Path<(String, String)>,
) -> Page
where
    S: StoragePort + Send + Sync + 'static,
{
    let req = OpenBookingRequest {
        competition,
        club,
        now: now(),
    };
    match logic.oneshot(req).await {
        Ok(OpenBookingResponse::Open(page)) => Page::render(page),
        Ok(OpenBookingResponse::Closed { reason, summary }) => {
            Page::render(summary).with_message(reason.to_string())
        }
        Err(Error::Booking(reason)) => Page::home_redirect().with_message(reason.to_string()),
        Err(err) => unexpected(err),
    }
}

pub async fn purchase_places<S>(
    State(logic): State<DomainLogic<S>>,
    Form(form): Form<PurchaseForm>,
) -> Page
where
    S: StoragePort + Send + Sync + 'static,
{
    let req = BookPlacesRequest {
        club: form.club,
        competition: form.competition,
        places: form.places,
        now: now(),
    };
    match logic.oneshot(req).await {
        Ok(BookPlacesResponse::Booked {
            summary,
            persisted: true,
            ..
        }) => Page::render(summary).with_message(BOOKING_COMPLETE),
        Ok(BookPlacesResponse::Booked {
            summary,
            persisted: false,
            ..
        }) => Page::render(summary).with_message(SAVE_FAILED),
        Ok(BookPlacesResponse::Rejected { reason, summary }) => {
            Page::render(summary).with_message(reason.to_string())
        }
        Err(Error::Booking(reason)) => Page::home_redirect().with_message(reason.to_string()),
        Err(err) => unexpected(err),
    }
}

pub async fn points<S>(State(logic): State<DomainLogic<S>>) -> Page
where
    S: StoragePort + Send + Sync + 'static,
{
    match logic.oneshot(PointsTableRequest).await {
        Ok(clubs) if clubs.is_empty() => Page::home_redirect().with_message(NO_POINTS_DATA),
        Ok(clubs) => Page::render(View::Points { clubs }),
        Err(Error::Storage(err)) => Page::home_redirect()
            .with_message(storage_warning(&err))
            .with_message(NO_POINTS_DATA),
        Err(err) => unexpected(err),
    }
}
