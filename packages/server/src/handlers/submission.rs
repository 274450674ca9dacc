use axum::Json;
use axum::extract::{Path, State};
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::JsonObject;
use crate::models::shared::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/submitted-assignment",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit an assignment",
    description = "Stores the submission body as-is. Submissions normally carry the submitter's `email` and a `status` such as `pending`.",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Submission stored", body = InsertResponse),
        (status = 400, description = "Body is not a JSON object (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Duplicate _id (CONFLICT)", body = ErrorBody),
    ),
    security(("token" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(email = ?auth_user.email))]
pub async fn create_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    JsonObject(payload): JsonObject,
) -> Result<Json<InsertResponse>, AppError> {
    let doc = body_to_document(&payload)?;
    let result = state.collections.submitted.insert_one(doc).await?;

    Ok(Json(result.into()))
}

#[utoipa::path(
    get,
    path = "/my-submission/{email}",
    tag = "Submissions",
    operation_id = "listMySubmissions",
    summary = "List the caller's submissions",
    description = "Returns every submission whose `email` equals the path email. The token's email claim must match it.",
    params(("email" = String, Path, description = "Submitter email")),
    responses(
        (status = 200, description = "Submission documents", body = [serde_json::Value]),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Token email differs from path email (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("token" = [])),
)]
#[instrument(skip(state, auth_user), fields(email = %email))]
pub async fn list_my_submissions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    auth_user.require_email(&email)?;

    let docs: Vec<Document> = state
        .collections
        .submitted
        .find(doc! { "email": email.as_str() })
        .await?
        .try_collect()
        .await?;

    Ok(Json(documents_to_json(docs)))
}

#[utoipa::path(
    get,
    path = "/pending-submission/{status}",
    tag = "Submissions",
    operation_id = "listSubmissionsByStatus",
    summary = "List submissions by status",
    params(("status" = String, Path, description = "Submission status, e.g. `pending` or `completed`")),
    responses(
        (status = 200, description = "Submission documents", body = [serde_json::Value]),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("token" = [])),
)]
#[instrument(skip(state, auth_user), fields(status = %status))]
pub async fn list_submissions_by_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let docs: Vec<Document> = state
        .collections
        .submitted
        .find(doc! { "status": status.as_str() })
        .await?
        .try_collect()
        .await?;

    tracing::debug!(count = docs.len(), grader = ?auth_user.email, "Fetched submissions");
    Ok(Json(documents_to_json(docs)))
}

#[utoipa::path(
    put,
    path = "/assignment-result/{id}",
    tag = "Submissions",
    operation_id = "gradeSubmission",
    summary = "Attach a result to a submission",
    description = "Sets every field of the body (typically `status`, marks and feedback) on the submission with this id. Any status may overwrite any other. A well-formed id with no matching submission creates one (201).",
    params(("id" = String, Path, description = "Submission ObjectId (24 hex characters)")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Existing submission updated", body = UpsertResponse),
        (status = 201, description = "Submission created", body = UpsertResponse),
        (status = 400, description = "Malformed id or empty body (INVALID_ID, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("token" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id, grader = ?auth_user.email))]
pub async fn grade_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonObject(payload): JsonObject,
) -> Result<UpsertResponse, AppError> {
    let oid = parse_object_id(&id)?;
    let fields = set_document(&payload)?;

    let result = state
        .collections
        .submitted
        .update_one(doc! { "_id": oid }, doc! { "$set": fields })
        .upsert(true)
        .await?;

    Ok(result.into())
}
