//! Venue routes: catalogue, entering, rolling, rounds and rankings.
//!
//! All routes require a bearer token. Each handler runs its service call in
//! one transaction; the roll handler additionally checks for round completion
//! in a second transaction once the roll itself has committed.

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::warn;

use crate::db::txn::with_txn;
use crate::domain::ranking::RankingEntry;
use crate::error::AppError;
use crate::extractors::{CurrentUser, RoundNumber, ValidatedJson, VenueId};
use crate::repos::participants::NamedParticipant;
use crate::repos::venues::Venue;
use crate::services::venue_view::VenueDetail;
use crate::services::{participants, rounds, venue_view, venues};
use crate::state::app_state::AppState;
use crate::trace_ctx;

fn rfc3339(ts: OffsetDateTime) -> Result<String, AppError> {
    ts.format(&Rfc3339)
        .map_err(|e| AppError::internal(format!("Failed to format timestamp: {e}")))
}

#[derive(Debug, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
}

impl From<Venue> for VenueSummary {
    fn from(v: Venue) -> Self {
        Self { id: v.id, name: v.name }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateVenueRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct EnterResponse {
    pub status: &'static str,
    pub venue_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RollRequest {
    /// Anything but `"super"` (including a missing field) is a normal roll.
    #[serde(default)]
    pub mode: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResponse {
    pub dice: u8,
    pub steps: i32,
    pub new_position: i32,
    pub new_condition: i32,
    pub won: bool,
    pub game_over: bool,
}

#[derive(Debug, Serialize)]
pub struct StartRaceResponse {
    pub current_round: i32,
}

#[derive(Debug, Serialize)]
pub struct ParticipantView {
    pub user_id: i64,
    pub username: String,
    pub position: i32,
    pub condition: i32,
    pub mode: &'static str,
    pub won: bool,
    pub game_over: bool,
    pub roll_count: i32,
    pub finished_at: Option<String>,
}

impl TryFrom<NamedParticipant> for ParticipantView {
    type Error = AppError;

    fn try_from(named: NamedParticipant) -> Result<Self, Self::Error> {
        let p = named.participant;
        Ok(Self {
            user_id: p.user_id,
            username: named.username,
            position: p.position,
            condition: p.condition,
            mode: p.mode.as_str(),
            won: p.won,
            game_over: p.game_over,
            roll_count: p.roll_count,
            finished_at: p.finished_at.map(rfc3339).transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RankingView {
    pub rank: u32,
    pub user_id: i64,
    pub username: String,
    pub won: bool,
    pub game_over: bool,
    pub roll_count: i32,
    pub duration_seconds: f64,
}

impl From<RankingEntry> for RankingView {
    fn from(e: RankingEntry) -> Self {
        Self {
            rank: e.rank,
            user_id: e.user_id,
            username: e.username,
            won: e.won,
            game_over: e.game_over,
            roll_count: e.roll_count,
            duration_seconds: e.duration_seconds,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueDetailResponse {
    pub id: i64,
    pub name: String,
    pub current_round: i32,
    pub round_complete: bool,
    pub participants: Vec<ParticipantView>,
    /// `null` until the round is complete.
    pub ranking: Option<Vec<RankingView>>,
}

impl TryFrom<VenueDetail> for VenueDetailResponse {
    type Error = AppError;

    fn try_from(d: VenueDetail) -> Result<Self, Self::Error> {
        Ok(Self {
            id: d.id,
            name: d.name,
            current_round: d.current_round,
            round_complete: d.round_complete,
            participants: d
                .participants
                .into_iter()
                .map(ParticipantView::try_from)
                .collect::<Result<_, _>>()?,
            ranking: d
                .ranking
                .map(|r| r.into_iter().map(RankingView::from).collect()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub round_number: i32,
    pub started_at: String,
}

/// GET /venues
async fn list_venues(
    _user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let all = with_txn(&app_state, |txn| {
        Box::pin(async move { venues::list_venues(txn).await })
    })
    .await?;

    let body: Vec<VenueSummary> = all.into_iter().map(VenueSummary::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /venues
async fn create_venue(
    _user: CurrentUser,
    body: ValidatedJson<CreateVenueRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let name = body.into_inner().name;

    let venue = with_txn(&app_state, |txn| {
        Box::pin(async move { venues::create_venue(txn, &name).await })
    })
    .await?;

    Ok(HttpResponse::Created().json(VenueSummary::from(venue)))
}

/// GET /venues/{venue_id}
async fn get_venue(
    user: CurrentUser,
    venue_id: VenueId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (venue_id, caller_id) = (venue_id.0, user.id);

    let detail = with_txn(&app_state, |txn| {
        Box::pin(async move { venue_view::get_venue_detail(txn, venue_id, caller_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(VenueDetailResponse::try_from(detail)?))
}

/// POST /venues/{venue_id}/enter
async fn enter_venue(
    user: CurrentUser,
    venue_id: VenueId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (venue_id, user_id) = (venue_id.0, user.id);

    with_txn(&app_state, |txn| {
        Box::pin(async move { participants::join(txn, venue_id, user_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(EnterResponse {
        status: "ok",
        venue_id,
    }))
}

/// POST /venues/{venue_id}/roll
async fn roll(
    user: CurrentUser,
    venue_id: VenueId,
    body: ValidatedJson<RollRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (venue_id, user_id) = (venue_id.0, user.id);
    let mode = body.into_inner().mode;
    let dice = app_state.dice.clone();

    let report = with_txn(&app_state, |txn| {
        Box::pin(async move {
            participants::apply_roll(txn, venue_id, user_id, &mode, dice.as_ref()).await
        })
    })
    .await?;

    // The roll is committed; a failed completion check is retried by the next read of the venue.
    if let Err(e) = with_txn(&app_state, |txn| {
        Box::pin(async move { rounds::maybe_snapshot_round(txn, venue_id).await })
    })
    .await
    {
        warn!(
            trace_id = %trace_ctx::trace_id(),
            venue_id,
            error = %e,
            "Round completion check failed after roll"
        );
    }

    let outcome = report.outcome;
    Ok(HttpResponse::Ok().json(RollResponse {
        dice: report.dice,
        steps: outcome.steps,
        new_position: outcome.new_position,
        new_condition: outcome.new_condition,
        won: outcome.won,
        game_over: outcome.game_over,
    }))
}

/// POST /venues/{venue_id}/start_new_race
async fn start_new_race(
    user: CurrentUser,
    venue_id: VenueId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (venue_id, caller_id) = (venue_id.0, user.id);

    let current_round = with_txn(&app_state, |txn| {
        Box::pin(async move { rounds::start_new_race(txn, venue_id, caller_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(StartRaceResponse { current_round }))
}

/// GET /venues/{venue_id}/rounds
async fn list_rounds(
    user: CurrentUser,
    venue_id: VenueId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (venue_id, caller_id) = (venue_id.0, user.id);

    let all = with_txn(&app_state, |txn| {
        Box::pin(async move { venue_view::list_rounds(txn, venue_id, caller_id).await })
    })
    .await?;

    let body = all
        .into_iter()
        .map(|r| {
            Ok(RoundView {
                round_number: r.round_number,
                started_at: rfc3339(r.started_at)?,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /venues/{venue_id}/rounds/{round_number}/results
async fn round_results(
    _user: CurrentUser,
    venue_id: VenueId,
    round_number: RoundNumber,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (venue_id, round_number) = (venue_id.0, round_number.0);

    let ranking = with_txn(&app_state, |txn| {
        Box::pin(async move { venue_view::round_results(txn, venue_id, round_number).await })
    })
    .await?;

    let body: Vec<RankingView> = ranking.into_iter().map(RankingView::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_venues))
            .route(web::post().to(create_venue)),
    )
    .service(web::resource("/{venue_id}").route(web::get().to(get_venue)))
    .service(web::resource("/{venue_id}/enter").route(web::post().to(enter_venue)))
    .service(web::resource("/{venue_id}/roll").route(web::post().to(roll)))
    .service(
        web::resource("/{venue_id}/start_new_race").route(web::post().to(start_new_race)),
    )
    .service(web::resource("/{venue_id}/rounds").route(web::get().to(list_rounds)))
    .service(
        web::resource("/{venue_id}/rounds/{round_number}/results")
            .route(web::get().to(round_results)),
    );
}
