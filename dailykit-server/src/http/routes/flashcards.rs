//! Flashcard and review procedures

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use dailykit_core::schema::limit::DEFAULT_LIST_LIMIT;
use dailykit_core::{Limit, Text};
use serde::{Deserialize, Serialize};

use super::{timestamp, IdRequest, SuccessResponse};
use crate::db::repos::{
    DeckRepo, DueFlashcard, Flashcard, FlashcardRepo, NewFlashcard, Progress, ProgressRepo,
};
use crate::http::error::ApiError;
use crate::http::extractors::RpcInput;
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct CreateFlashcardRequest {
    pub deck_id: i64,
    pub front: String,
    pub back: String,
}

#[derive(Deserialize)]
pub struct GetFlashcardsRequest {
    pub deck_id: i64,
}

#[derive(Deserialize)]
pub struct RecordAnswerRequest {
    pub user_id: String,
    pub flashcard_id: i64,
    pub is_correct: bool,
}

#[derive(Deserialize)]
pub struct GetProgressRequest {
    pub user_id: String,
    pub flashcard_id: i64,
}

#[derive(Deserialize)]
pub struct GetDueFlashcardsRequest {
    pub user_id: String,
    pub deck_id: Option<i64>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct FlashcardResponse {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Flashcard> for FlashcardResponse {
    fn from(f: Flashcard) -> Self {
        Self {
            id: f.id,
            deck_id: f.deck_id,
            front: f.front,
            back: f.back,
            created_at: timestamp(f.created_at),
            updated_at: timestamp(f.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DueFlashcardResponse {
    #[serde(flatten)]
    pub card: FlashcardResponse,
    pub next_review_date: Option<String>,
}

impl From<DueFlashcard> for DueFlashcardResponse {
    fn from(f: DueFlashcard) -> Self {
        Self {
            card: FlashcardResponse {
                id: f.id,
                deck_id: f.deck_id,
                front: f.front,
                back: f.back,
                created_at: timestamp(f.created_at),
                updated_at: timestamp(f.updated_at),
            },
            next_review_date: f.next_review_date.map(timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub id: i64,
    pub user_id: String,
    pub flashcard_id: i64,
    pub correct_count: i64,
    pub incorrect_count: i64,
    pub interval_days: i64,
    pub ease_factor: f64,
    pub last_reviewed_at: String,
    pub next_review_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Progress> for ProgressResponse {
    fn from(p: Progress) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            flashcard_id: p.flashcard_id,
            correct_count: p.correct_count,
            incorrect_count: p.incorrect_count,
            interval_days: p.interval_days,
            ease_factor: p.ease_factor,
            last_reviewed_at: timestamp(p.last_reviewed_at),
            next_review_date: timestamp(p.next_review_date),
            created_at: timestamp(p.created_at),
            updated_at: timestamp(p.updated_at),
        }
    }
}

fn user_id(raw: &str) -> Result<Text, ApiError> {
    Ok(Text::new("user_id", raw, Text::NAME_MAX)?)
}

/// POST /rpc/createFlashcard
async fn create_flashcard(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<CreateFlashcardRequest>,
) -> Result<Json<FlashcardResponse>, ApiError> {
    let input = NewFlashcard {
        deck_id: req.deck_id,
        front: Text::new("front", &req.front, Text::BODY_MAX)?,
        back: Text::new("back", &req.back, Text::BODY_MAX)?,
    };
    let card = FlashcardRepo::new(&state.pool).create(input).await?;
    Ok(Json(card.into()))
}

/// POST /rpc/getFlashcards - not found when the deck does not exist
async fn get_flashcards(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<GetFlashcardsRequest>,
) -> Result<Json<Vec<FlashcardResponse>>, ApiError> {
    DeckRepo::new(&state.pool).get(req.deck_id).await?;
    let cards = FlashcardRepo::new(&state.pool)
        .list_for_deck(req.deck_id)
        .await?;
    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

/// POST /rpc/deleteFlashcard - progress rows go with the card
async fn delete_flashcard(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    FlashcardRepo::new(&state.pool).delete(req.id).await?;
    Ok(Json(SuccessResponse::OK))
}

/// POST /rpc/recordAnswer
///
/// An unknown card surfaces as the driver's foreign-key violation.
async fn record_answer(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<RecordAnswerRequest>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let user = user_id(&req.user_id)?;
    let progress = ProgressRepo::new(&state.pool)
        .record_answer(user.as_str(), req.flashcard_id, req.is_correct, Utc::now())
        .await?;
    Ok(Json(progress.into()))
}

/// POST /rpc/getProgress - `null` when the user never answered the card
async fn get_progress(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<GetProgressRequest>,
) -> Result<Json<Option<ProgressResponse>>, ApiError> {
    let user = user_id(&req.user_id)?;
    let progress = ProgressRepo::new(&state.pool)
        .get(user.as_str(), req.flashcard_id)
        .await?;
    Ok(Json(progress.map(Into::into)))
}

/// POST /rpc/getDueFlashcards
async fn get_due_flashcards(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<GetDueFlashcardsRequest>,
) -> Result<Json<Vec<DueFlashcardResponse>>, ApiError> {
    let user = user_id(&req.user_id)?;
    let cards = FlashcardRepo::new(&state.pool)
        .due_for_user(
            user.as_str(),
            req.deck_id,
            Utc::now(),
            Limit::resolve(req.limit, DEFAULT_LIST_LIMIT),
        )
        .await?;
    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

/// Flashcard routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/createFlashcard", post(create_flashcard))
        .route("/rpc/getFlashcards", post(get_flashcards))
        .route("/rpc/deleteFlashcard", post(delete_flashcard))
        .route("/rpc/recordAnswer", post(record_answer))
        .route("/rpc/getProgress", post(get_progress))
        .route("/rpc/getDueFlashcards", post(get_due_flashcards))
}
