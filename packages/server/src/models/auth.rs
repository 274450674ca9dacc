use serde::Serialize;

/// Response body for token issue and logout.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    #[schema(example = true)]
    pub success: bool,
}
