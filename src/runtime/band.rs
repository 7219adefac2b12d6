use std::sync::Arc;

use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{Duration, MissedTickBehavior},
};

use crate::server::{LogServer, ServerError};

use super::events::UiEvent;

/// Polls `/update-band` every `period` and broadcasts each answer.
///
/// Each poll runs in its own task bounded by `timeout`, so a slow server never
/// shifts the schedule. Failed polls are skipped until the next tick.
pub fn spawn_band_poller<S: LogServer>(
    server: Arc<S>,
    period: Duration,
    timeout: Duration,
    events_tx: broadcast::Sender<UiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the first poll waits one period.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let server = Arc::clone(&server);
            let events_tx = events_tx.clone();
            tokio::spawn(async move {
                let polled = tokio::time::timeout(timeout, server.band())
                    .await
                    .map_err(ServerError::from)
                    .and_then(|r| r);
                match polled {
                    Ok(reply) => {
                        tracing::trace!(band = %reply.band, "band poll");
                        let _ = events_tx.send(UiEvent::Band {
                            band: reply.band,
                            mode: reply.mode,
                        });
                    }
                    Err(err) => tracing::debug!(%err, "band poll skipped"),
                }
            });
        }
    })
}
