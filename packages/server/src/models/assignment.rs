use serde::Deserialize;

/// Query parameters for listing assignments.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssignmentListQuery {
    /// Only return assignments whose `difficultyLevel` equals this value.
    /// An empty value is treated as absent.
    #[param(example = "hard")]
    pub filter: Option<String>,
}

impl AssignmentListQuery {
    pub fn difficulty_level(&self) -> Option<&str> {
        self.filter.as_deref().filter(|f| !f.is_empty())
    }
}
