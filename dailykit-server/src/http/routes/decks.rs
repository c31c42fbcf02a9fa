//! Deck procedures

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use dailykit_core::Text;
use serde::{Deserialize, Serialize};

use super::{timestamp, IdRequest, SuccessResponse};
use crate::db::repos::{Deck, DeckRepo, DeckWithCount};
use crate::http::error::ApiError;
use crate::http::extractors::RpcInput;
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeckResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_count: Option<i64>,
}

impl From<Deck> for DeckResponse {
    fn from(d: Deck) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            created_at: timestamp(d.created_at),
            updated_at: timestamp(d.updated_at),
            card_count: None,
        }
    }
}

impl From<DeckWithCount> for DeckResponse {
    fn from(d: DeckWithCount) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            created_at: timestamp(d.created_at),
            updated_at: timestamp(d.updated_at),
            card_count: Some(d.card_count),
        }
    }
}

/// POST /rpc/createDeck
async fn create_deck(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<CreateDeckRequest>,
) -> Result<Json<DeckResponse>, ApiError> {
    let name = Text::new("name", &req.name, Text::NAME_MAX)?;
    let description = Text::optional("description", req.description.as_deref(), Text::BODY_MAX)?;
    let deck = DeckRepo::new(&state.pool).create(name, description).await?;
    Ok(Json(deck.into()))
}

/// POST /rpc/getDecks
async fn get_decks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<DeckResponse>>, ApiError> {
    let decks = DeckRepo::new(&state.pool).list().await?;
    Ok(Json(decks.into_iter().map(Into::into).collect()))
}

/// POST /rpc/deleteDeck - refused while the deck still has cards
async fn delete_deck(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    DeckRepo::new(&state.pool).delete(req.id).await?;
    Ok(Json(SuccessResponse::OK))
}

/// Deck routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/createDeck", post(create_deck))
        .route("/rpc/getDecks", post(get_decks))
        .route("/rpc/deleteDeck", post(delete_deck))
}
