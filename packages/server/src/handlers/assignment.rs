use axum::Json;
use axum::extract::{Path, Query, State};
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::JsonObject;
use crate::models::assignment::AssignmentListQuery;
use crate::models::shared::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/assignments",
    tag = "Assignments",
    operation_id = "listAssignments",
    summary = "List assignments",
    description = "Returns every assignment in natural order, or only those whose `difficultyLevel` equals `filter`.",
    params(AssignmentListQuery),
    responses(
        (status = 200, description = "Assignment documents", body = [serde_json::Value]),
    ),
)]
#[instrument(skip(state))]
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<AssignmentListQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    let filter = match query.difficulty_level() {
        Some(level) => doc! { "difficultyLevel": level },
        None => Document::new(),
    };

    let docs: Vec<Document> = state
        .collections
        .assignments
        .find(filter)
        .await?
        .try_collect()
        .await?;

    Ok(Json(documents_to_json(docs)))
}

#[utoipa::path(
    get,
    path = "/assignment/{id}",
    tag = "Assignments",
    operation_id = "getAssignment",
    summary = "Get an assignment by ID",
    params(("id" = String, Path, description = "Assignment ObjectId (24 hex characters)")),
    responses(
        (status = 200, description = "Assignment document", body = serde_json::Value),
        (status = 400, description = "Malformed id (INVALID_ID)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let oid = parse_object_id(&id)?;

    let doc = state
        .collections
        .assignments
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment {id} not found")))?;

    Ok(Json(document_to_json(doc)))
}

#[utoipa::path(
    post,
    path = "/assignment",
    tag = "Assignments",
    operation_id = "createAssignment",
    summary = "Create an assignment",
    description = "Stores the body as-is and returns the generated id.",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Assignment created", body = InsertResponse),
        (status = 400, description = "Body is not a JSON object (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Duplicate _id (CONFLICT)", body = ErrorBody),
    ),
    security(("token" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(email = ?auth_user.email))]
pub async fn create_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    JsonObject(payload): JsonObject,
) -> Result<Json<InsertResponse>, AppError> {
    let doc = body_to_document(&payload)?;
    let result = state.collections.assignments.insert_one(doc).await?;

    Ok(Json(result.into()))
}

#[utoipa::path(
    put,
    path = "/update/{id}",
    tag = "Assignments",
    operation_id = "updateAssignment",
    summary = "Replace-or-insert an assignment",
    description = "Sets every field of the body on the assignment with this id. A well-formed id with no matching document creates one (201).",
    params(("id" = String, Path, description = "Assignment ObjectId (24 hex characters)")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Existing assignment updated", body = UpsertResponse),
        (status = 201, description = "Assignment created", body = UpsertResponse),
        (status = 400, description = "Malformed id or empty body (INVALID_ID, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("token" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id, email = ?auth_user.email))]
pub async fn update_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonObject(payload): JsonObject,
) -> Result<UpsertResponse, AppError> {
    let oid = parse_object_id(&id)?;
    let fields = set_document(&payload)?;

    let result = state
        .collections
        .assignments
        .update_one(doc! { "_id": oid }, doc! { "$set": fields })
        .upsert(true)
        .await?;

    Ok(result.into())
}

#[utoipa::path(
    delete,
    path = "/assignment/{id}",
    tag = "Assignments",
    operation_id = "deleteAssignment",
    summary = "Delete an assignment",
    description = "Deleting an id that does not exist succeeds with `deletedCount` 0.",
    params(("id" = String, Path, description = "Assignment ObjectId (24 hex characters)")),
    responses(
        (status = 200, description = "Delete result", body = DeleteResponse),
        (status = 400, description = "Malformed id (INVALID_ID)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("token" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id, email = ?auth_user.email))]
pub async fn delete_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let oid = parse_object_id(&id)?;

    let result = state
        .collections
        .assignments
        .delete_one(doc! { "_id": oid })
        .await?;

    if result.deleted_count == 0 {
        tracing::debug!("No assignment matched the delete");
    }

    Ok(Json(result.into()))
}
