use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot},
    task,
};

use relay_agent::TwitterSource;
use relay_core::{ReconcileConfig, ReconcileRequest, Reconciler, TweetRecord};

use crate::{
    error::Result,
    state::{AppState, DatabasePool},
    util,
};

#[derive(Debug)]
pub struct ReconcileJob {
    pub request: ReconcileRequest,
    pub reply: oneshot::Sender<Result<Vec<TweetRecord>>>,
}

pub type ReconcileJobQueue = mpsc::UnboundedSender<ReconcileJob>;

/// Used in server handlers and other jobs. Queue a reconciliation and wait for its records.
pub async fn send_reconcile(app_state: &AppState, request: ReconcileRequest) -> Result<Vec<TweetRecord>> {
    let (reply, result) = oneshot::channel();
    app_state
        .reconcile_queue
        .send(ReconcileJob { request, reply })
        .map_err(|_| anyhow::anyhow!("Reconcile job queue is closed"))?;
    result.await?
}

/// Set up before server started
pub fn listen_reconcile(
    pool: DatabasePool,
    source: Arc<TwitterSource>,
    account: String,
    config: ReconcileConfig,
) -> ReconcileJobQueue {
    // MPSC unbounded channel: job queue
    // A single consumer, so reconciliations of the account never overlap
    let (job_sender, mut job_receiver) = mpsc::unbounded_channel::<ReconcileJob>();

    task::spawn(async move {
        while let Some(job) = job_receiver.recv().await {
            tracing::info!("Reconcile job started for @{}: {:?}", account, job.request);
            let result =
                util::retry(|| util::timeout(reconcile(&pool, &source, &account, &config, &job.request))).await;

            match &result {
                Ok(records) => tracing::info!("Reconcile job done for @{}. {} records", account, records.len()),
                Err(e) => tracing::error!("Reconcile job failed for @{}. {}", account, e),
            }
            if job.reply.send(result).is_err() {
                tracing::warn!("Reconcile job result dropped, nobody is waiting for it");
            }
        }
    });

    job_sender
}

async fn reconcile(
    pool: &DatabasePool,
    source: &TwitterSource,
    account: &str,
    config: &ReconcileConfig,
    request: &ReconcileRequest,
) -> Result<Vec<TweetRecord>> {
    let mut conn = pool.get()?;
    let records = Reconciler::new(source, &mut *conn, config)
        .reconcile(account, request)
        .await?;
    Ok(records)
}
