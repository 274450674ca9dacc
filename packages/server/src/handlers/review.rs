use axum::Json;
use axum::extract::State;
use futures::TryStreamExt;
use mongodb::bson::Document;
use serde_json::Value;
use tracing::instrument;

use crate::error::AppError;
use crate::models::shared::documents_to_json;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/reviews",
    tag = "Reviews",
    operation_id = "listReviews",
    summary = "List all reviews",
    responses(
        (status = 200, description = "Review documents", body = [serde_json::Value]),
    ),
)]
#[instrument(skip(state))]
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let docs: Vec<Document> = state
        .collections
        .reviews
        .find(Document::new())
        .await?
        .try_collect()
        .await?;

    Ok(Json(documents_to_json(docs)))
}
