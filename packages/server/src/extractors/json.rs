use axum::{
    Json,
    body::{Body, Bytes},
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::{Map, Value};

use crate::error::AppError;

/// A schema-less JSON object body.
///
/// Bodies are stored as-is, so the only shape requirement is that the top level is an
/// object. Malformed JSON, a wrong content type, or a non-object body become
/// `AppError::Validation` so clients always receive structured JSON error responses.
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        match value {
            Value::Object(map) => Ok(JsonObject(map)),
            _ => Err(AppError::Validation(
                "Request body must be a JSON object".into(),
            )),
        }
    }
}

/// Like [`JsonObject`], but an empty body reads as `{}`.
pub struct JsonObjectOrEmpty(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObjectOrEmpty
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req.headers().get(CONTENT_TYPE).cloned();
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        if bytes.is_empty() {
            return Ok(JsonObjectOrEmpty(Map::new()));
        }

        let mut req = Request::new(Body::from(bytes));
        if let Some(content_type) = content_type {
            req.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        let JsonObject(map) = JsonObject::from_request(req, state).await?;
        Ok(JsonObjectOrEmpty(map))
    }
}
