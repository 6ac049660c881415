use std::time::Duration;

use tokio::{
    task,
    time::{self, Instant, MissedTickBehavior},
};

use relay_agent::{summarize, DexScreener, FAILURE_MESSAGE};
use relay_core::ReconcileRequest;
use telegram_client::{ChatId, TelegramClient};

use crate::{error::Result, state::AppState};

use super::{deliver, send_reconcile};

/// Each run covers the time since the previous one.
fn scheduled_request(period: Duration) -> ReconcileRequest {
    ReconcileRequest {
        max_count: None,
        time_range_hours: Some(period.as_secs_f64() / 3600.0),
    }
}

/// Set up before server started. Post a summary into `chat_id` every `period`.
pub fn listen_schedule(app_state: AppState, telegram: TelegramClient, chat_id: ChatId, period: Duration) {
    task::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if let Err(e) = run_summary(&app_state, &telegram, &chat_id, period).await {
                tracing::error!("Scheduled summary for {} failed: {}", chat_id, e);
                if let Err(e) = telegram.send_message(&chat_id, FAILURE_MESSAGE, None).await {
                    tracing::error!("Cannot send failure message to {}: {}", chat_id, e);
                }
            }
        }
    });
}

async fn run_summary(app_state: &AppState, telegram: &TelegramClient, chat_id: &ChatId, period: Duration) -> Result<()> {
    let records = send_reconcile(app_state, scheduled_request(period)).await?;
    if records.is_empty() {
        tracing::info!("Scheduled summary skipped, no new ticker mentions");
        return Ok(());
    }
    let messages = summarize(&DexScreener, &records).await;
    deliver(telegram, chat_id, &messages).await
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scheduled_request() {
        let request = scheduled_request(Duration::from_secs(30 * 60));
        assert_eq!(request.time_range_hours, Some(0.5));
        assert_eq!(request.max_count, None);
    }
}
