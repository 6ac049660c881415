use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

use relay_core::{store, CoverageState, ReconcileRequest, StateKeys, TweetRecord};

use crate::{background_job::send_reconcile, error::Result, state::AppState};

pub fn tweet_router() -> Router<AppState> {
    Router::new()
        .route("/tweets/fetch", post(fetch_tweets))
        .route("/coverage", get(get_coverage))
}

async fn fetch_tweets(
    State(app_state): State<AppState>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Json<Vec<TweetRecord>>> {
    let records = send_reconcile(&app_state, request).await?;
    Ok(Json(records))
}

async fn get_coverage(State(app_state): State<AppState>) -> Result<Json<CoverageState>> {
    let mut conn = app_state.pool.get()?;
    let (_, coverage) = store::load_state(&mut *conn, &StateKeys::new(&app_state.account))?;
    Ok(Json(coverage))
}
