#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    operation_id = "liveness",
    summary = "Liveness check",
    responses(
        (status = 200, description = "Server is running", body = String, content_type = "text/plain"),
    ),
)]
pub async fn liveness() -> &'static str {
    "study hub server is Running"
}
