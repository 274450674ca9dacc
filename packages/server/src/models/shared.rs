use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mongodb::bson::{self, Bson, Document, oid::ObjectId};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Parse a path segment into an `ObjectId`.
pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidId(id.to_owned()))
}

/// Convert a JSON request body into a BSON document stored as-is.
pub fn body_to_document(body: &Map<String, Value>) -> Result<Document, AppError> {
    Ok(bson::to_document(body)?)
}

/// Build the `$set` payload for a replace-or-insert. `_id` is immutable and never written.
pub fn set_document(body: &Map<String, Value>) -> Result<Document, AppError> {
    let mut fields = body_to_document(body)?;
    fields.remove("_id");
    if fields.is_empty() {
        return Err(AppError::Validation(
            "Update body must contain at least one field besides _id".into(),
        ));
    }
    Ok(fields)
}

/// Render a stored document as JSON, with object ids flattened to hex strings.
pub fn document_to_json(doc: Document) -> Value {
    bson_to_json(Bson::Document(doc))
}

pub fn documents_to_json(docs: Vec<Document>) -> Vec<Value> {
    docs.into_iter().map(document_to_json).collect()
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(k, v)| (k, bson_to_json(v)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Result of a single-document insert.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    #[schema(example = true)]
    pub acknowledged: bool,
    /// Identity assigned to the new document.
    #[schema(value_type = String, example = "665f1c2e9b1d4a3f8c0e7a12")]
    pub inserted_id: Value,
}

impl From<InsertOneResult> for InsertResponse {
    fn from(result: InsertOneResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: bson_to_json(result.inserted_id),
        }
    }
}

/// Whether a replace-or-insert touched an existing document or created one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Created,
    Updated,
}

/// Result of an upsert-by-id.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResponse {
    #[schema(example = true)]
    pub acknowledged: bool,
    pub outcome: WriteOutcome,
    #[schema(example = 1)]
    pub matched_count: u64,
    #[schema(example = 1)]
    pub modified_count: u64,
    #[schema(example = 0)]
    pub upserted_count: u64,
    /// Identity of the created document, `null` when an existing one was updated.
    #[schema(value_type = Option<String>)]
    pub upserted_id: Option<Value>,
}

impl From<UpdateResult> for UpsertResponse {
    fn from(result: UpdateResult) -> Self {
        let upserted_id = result.upserted_id.map(bson_to_json);
        let outcome = if upserted_id.is_some() {
            WriteOutcome::Created
        } else {
            WriteOutcome::Updated
        };
        Self {
            acknowledged: true,
            outcome,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        }
    }
}

impl IntoResponse for UpsertResponse {
    /// 201 when the upsert created the document, 200 when it updated one.
    fn into_response(self) -> Response {
        let status = match self.outcome {
            WriteOutcome::Created => StatusCode::CREATED,
            WriteOutcome::Updated => StatusCode::OK,
        };
        (status, Json(self)).into_response()
    }
}

/// Result of a single-document delete.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    #[schema(example = true)]
    pub acknowledged: bool,
    /// `0` when no document had the given id.
    #[schema(example = 1)]
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteResponse {
    fn from(result: DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}
