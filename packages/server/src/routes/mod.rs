use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{assignment, auth, health, review, submission};
use crate::state::AppState;

/// Every route, grouped by the authorization policy it runs under.
///
/// Protected handlers take an `AuthUser` parameter; owner-only handlers additionally
/// call `AuthUser::require_email` against the path email. `GET` and `DELETE` on
/// `/assignment/{id}` sit in different groups; axum merges them onto one path.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(public_routes())
        .merge(authenticated_routes())
        .merge(owner_routes())
}

fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health::liveness))
        .routes(routes!(auth::issue_token))
        .routes(routes!(auth::logout))
        .routes(routes!(assignment::list_assignments))
        .routes(routes!(assignment::get_assignment))
        .routes(routes!(review::list_reviews))
}

fn authenticated_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(assignment::create_assignment))
        .routes(routes!(assignment::delete_assignment))
        .routes(routes!(assignment::update_assignment))
        .routes(routes!(submission::create_submission))
        .routes(routes!(submission::list_submissions_by_status))
        .routes(routes!(submission::grade_submission))
}

fn owner_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(submission::list_my_submissions))
}
