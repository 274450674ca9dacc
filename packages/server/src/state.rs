use mongodb::Database;

use crate::config::AppConfig;
use crate::database::Collections;

#[derive(Clone)]
pub struct AppState {
    pub collections: Collections,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: &Database, config: AppConfig) -> Self {
        Self {
            collections: Collections::new(db),
            config,
        }
    }
}
