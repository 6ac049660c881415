mod background_job;
mod error;
mod payload;
mod router;
mod state;
mod util;

use axum::Router;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use dotenvy::dotenv;
use tower_http::trace::TraceLayer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use std::env;
use std::sync::Arc;
use std::time::Duration;

use relay_agent::TwitterSource;
use relay_core::{store, ReconcileConfig};
use telegram_client::{ChatId, TelegramClient};
use twitter_client::TwitterClient;

use crate::state::AppState;
use crate::util::{env_or, ConnectionOptions};

const DEFAULT_ACCOUNT: &str = "aixbt_agent";

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Initialize logger
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env()
        .unwrap()
        .add_directive("hyper::proto=info".parse().unwrap())
        .add_directive("hyper::client=info".parse().unwrap())
        .add_directive("reqwest=info".parse().unwrap());
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    // 2. Initialize database
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(16)
        .connection_customizer(Box::new(ConnectionOptions {
            enable_wal: true,
            busy_timeout: Some(Duration::from_secs(30)),
        }))
        .build(manager)
        .unwrap();
    store::init(&mut pool.get().unwrap()).expect("cannot create the state table");

    // 3. Initialize clients
    let bearer_token = env::var("TWITTER_BEARER_TOKEN").expect("TWITTER_BEARER_TOKEN must be set");
    let twitter = TwitterClient::new(&bearer_token).expect("TWITTER_BEARER_TOKEN must be a valid token");
    let source = Arc::new(TwitterSource::new(twitter));
    let account = env::var("TWITTER_USERNAME").unwrap_or_else(|_| DEFAULT_ACCOUNT.to_string());
    let telegram = env::var("TELEGRAM_BOT_TOKEN")
        .ok()
        .map(|token| TelegramClient::new(&token).expect("TELEGRAM_BOT_TOKEN must be a valid token"));

    // 4. Initialize background jobs
    let defaults = ReconcileConfig::default();
    let config = ReconcileConfig {
        retention: chrono::Duration::hours(env_or("RETENTION_HOURS", 24)),
        max_pages: env_or("MAX_PAGES", defaults.max_pages),
        ..defaults
    };
    tracing::info!("Tracking @{} with {:?}", account, config);
    let reconcile_queue = background_job::listen_reconcile(pool.clone(), source, account.clone(), config);

    let app_state = AppState {
        pool,
        account,
        reconcile_queue,
        telegram: telegram.clone(),
    };

    if let Some(telegram) = telegram {
        background_job::listen_bot(app_state.clone(), telegram.clone());

        let interval_minutes: u64 = env_or("SUMMARY_INTERVAL_MINUTES", 0);
        match env::var("TELEGRAM_CHAT_ID") {
            Ok(chat_id) if interval_minutes > 0 => {
                let chat_id = ChatId::from(chat_id.as_str());
                tracing::info!("Posting summaries to {} every {} minutes", chat_id, interval_minutes);
                let period = Duration::from_secs(interval_minutes * 60);
                background_job::listen_schedule(app_state.clone(), telegram, chat_id, period);
            }
            _ => tracing::info!("Scheduled summaries are disabled"),
        }
    }

    // 5. Setup router
    let app = Router::new()
        .merge(router::tweet::tweet_router())
        .merge(router::project::project_router())
        .merge(router::telegram::telegram_router())
        .layer(TraceLayer::new_for_http().on_request(()))
        .with_state(app_state);

    // 6. Start server
    let addr = env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set");
    tracing::info!("Server starting at {}", addr);
    axum::Server::bind(&addr.parse().unwrap())
        .serve(app.into_make_service())
        .await
        .unwrap();
}
