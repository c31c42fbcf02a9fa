//! Mood journal procedures

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use dailykit_core::schema::limit::DEFAULT_JOURNAL_LIMIT;
use dailykit_core::{DateRange, Limit, Score, Text};
use serde::{Deserialize, Serialize};

use super::{timestamp, IdRequest, SuccessResponse};
use crate::db::repos::{MoodEntry, MoodEntryPatch, MoodFilter, MoodRepo, MoodStats, NewMoodEntry};
use crate::http::error::ApiError;
use crate::http::extractors::RpcInput;
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct CreateMoodEntryRequest {
    pub user_id: String,
    pub mood_score: i64,
    pub energy_level: Option<i64>,
    pub notes: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct UpdateMoodEntryRequest {
    pub id: i64,
    pub mood_score: Option<i64>,
    pub energy_level: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct GetMoodEntriesRequest {
    pub user_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct GetMoodStatsRequest {
    pub user_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct MoodEntryResponse {
    pub id: i64,
    pub user_id: String,
    pub mood_score: i64,
    pub energy_level: Option<i64>,
    pub notes: Option<String>,
    pub recorded_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MoodEntry> for MoodEntryResponse {
    fn from(e: MoodEntry) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            mood_score: e.mood_score,
            energy_level: e.energy_level,
            notes: e.notes,
            recorded_at: timestamp(e.recorded_at),
            created_at: timestamp(e.created_at),
            updated_at: timestamp(e.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoodStatsResponse {
    pub entry_count: i64,
    pub average_mood: Option<f64>,
    pub average_energy: Option<f64>,
}

impl From<MoodStats> for MoodStatsResponse {
    fn from(s: MoodStats) -> Self {
        let round = |v: f64| (v * 100.0).round() / 100.0;
        Self {
            entry_count: s.entry_count,
            average_mood: s.average_mood.map(round),
            average_energy: s.average_energy.map(round),
        }
    }
}

fn score(field: &'static str, raw: Option<i64>) -> Result<Option<Score>, ApiError> {
    Ok(raw.map(|v| Score::new(field, v)).transpose()?)
}

fn user_id(raw: &str) -> Result<Text, ApiError> {
    Ok(Text::new("user_id", raw, Text::NAME_MAX)?)
}

/// POST /rpc/createMoodEntry
async fn create_mood_entry(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<CreateMoodEntryRequest>,
) -> Result<Json<MoodEntryResponse>, ApiError> {
    let input = NewMoodEntry {
        user_id: user_id(&req.user_id)?,
        mood_score: Score::new("mood_score", req.mood_score)?,
        energy_level: score("energy_level", req.energy_level)?,
        notes: Text::optional("notes", req.notes.as_deref(), Text::BODY_MAX)?,
        recorded_at: req.recorded_at,
    };
    let entry = MoodRepo::new(&state.pool).create(input).await?;
    Ok(Json(entry.into()))
}

/// POST /rpc/getMoodEntries
async fn get_mood_entries(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<GetMoodEntriesRequest>,
) -> Result<Json<Vec<MoodEntryResponse>>, ApiError> {
    let filter = MoodFilter {
        user_id: req.user_id.as_deref().map(user_id).transpose()?,
        range: DateRange::new(req.start_date, req.end_date)?,
        limit: Limit::resolve(req.limit, DEFAULT_JOURNAL_LIMIT),
    };
    let entries = MoodRepo::new(&state.pool).list(&filter).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /rpc/updateMoodEntry
async fn update_mood_entry(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<UpdateMoodEntryRequest>,
) -> Result<Json<MoodEntryResponse>, ApiError> {
    let patch = MoodEntryPatch {
        mood_score: score("mood_score", req.mood_score)?,
        energy_level: score("energy_level", req.energy_level)?,
        notes: Text::optional("notes", req.notes.as_deref(), Text::BODY_MAX)?,
    };
    let entry = MoodRepo::new(&state.pool).update(req.id, patch).await?;
    Ok(Json(entry.into()))
}

/// POST /rpc/deleteMoodEntry
async fn delete_mood_entry(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    MoodRepo::new(&state.pool).delete(req.id).await?;
    Ok(Json(SuccessResponse::OK))
}

/// POST /rpc/getMoodStats
async fn get_mood_stats(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<GetMoodStatsRequest>,
) -> Result<Json<MoodStatsResponse>, ApiError> {
    let user = user_id(&req.user_id)?;
    let range = DateRange::new(req.start_date, req.end_date)?;
    let stats = MoodRepo::new(&state.pool).stats(&user, range).await?;
    Ok(Json(stats.into()))
}

/// Mood routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/createMoodEntry", post(create_mood_entry))
        .route("/rpc/getMoodEntries", post(get_mood_entries))
        .route("/rpc/updateMoodEntry", post(update_mood_entry))
        .route("/rpc/deleteMoodEntry", post(delete_mood_entry))
        .route("/rpc/getMoodStats", post(get_mood_stats))
}
