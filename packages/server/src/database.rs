use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, Credential, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

pub const ASSIGNMENTS: &str = "assignments";
pub const SUBMITTED: &str = "submitted";
pub const REVIEWS: &str = "reviews";

/// Handles to the three collections the service reads and writes.
///
/// Built once at startup; cloning only bumps the driver's internal reference counts.
#[derive(Clone, Debug)]
pub struct Collections {
    pub assignments: Collection<Document>,
    pub submitted: Collection<Document>,
    pub reviews: Collection<Document>,
}

impl Collections {
    pub fn new(db: &Database) -> Self {
        Self {
            assignments: db.collection(ASSIGNMENTS),
            submitted: db.collection(SUBMITTED),
            reviews: db.collection(REVIEWS),
        }
    }
}

/// Build the shared client. The driver connects lazily, so this only fails on a
/// malformed connection string.
pub async fn init_db(config: &DatabaseConfig) -> mongodb::error::Result<Database> {
    let mut opts = ClientOptions::parse(&config.uri).await?;

    opts.app_name = Some(config.app_name.clone());
    opts.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );

    if let Some(user) = &config.user {
        opts.credential = Some(
            Credential::builder()
                .username(user.clone())
                .password(config.password.clone())
                .build(),
        );
    }

    let client = Client::with_options(opts)?;
    Ok(client.database(&config.name))
}

/// Round-trip a `ping` to confirm the deployment is reachable.
pub async fn ping(db: &Database) -> mongodb::error::Result<()> {
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}

/// Ping in the background and log the result. Startup never waits on it.
pub fn report_reachability(db: Database) -> JoinHandle<()> {
    tokio::spawn(async move {
        match ping(&db).await {
            Ok(()) => info!(database = %db.name(), "Pinged deployment, MongoDB reachable"),
            Err(e) => warn!("MongoDB ping failed, continuing with lazy connection: {}", e),
        }
    })
}
