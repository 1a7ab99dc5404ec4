//! Timed alert injection.
//!
//! Two tasks connected by an `mpsc` channel:
//!
//! - [`spawn_injector`] ticks on an interval, polls its [`AlertSource`] and
//!   enqueues drafts. It never sees the store.
//! - [`run_applier`] drains the channel and applies each draft with
//!   [`AlertStore::add_alert`].
//!
//! Both stop on cancellation. The injector also stops once the applier side
//! of the channel is gone.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::source::{AlertDraft, AlertSource};
use crate::store::AlertStore;

/// Poll `source` every `period` and forward its drafts on `tx`.
///
/// The first poll happens one full period after spawning. Poll errors are
/// logged and skipped.
pub fn spawn_injector<S>(
    mut source: S,
    period: Duration,
    tx: mpsc::Sender<AlertDraft>,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    S: AlertSource + 'static,
{
    tokio::spawn(async move {
        let name = source.name().to_string();
        info!(source = %name, period_secs = period.as_secs(), "alert injector started");

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        'outer: loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let drafts = tokio::select! {
                _ = cancel.cancelled() => break,
                polled = source.poll() => match polled {
                    Ok(drafts) => drafts,
                    Err(e) => {
                        warn!(source = %name, error = %e, "alert source poll failed");
                        continue;
                    }
                },
            };

            if !drafts.is_empty() {
                debug!(source = %name, count = drafts.len(), "alert drafts produced");
            }
            for draft in drafts {
                if tx.send(draft).await.is_err() {
                    warn!(source = %name, "alert applier gone, stopping injector");
                    break 'outer;
                }
            }
        }

        info!(source = %name, "alert injector stopped");
    })
}

/// Apply drafts from `rx` to `store` until cancelled or every sender is
/// dropped. Returns how many alerts were added.
pub async fn run_applier(
    store: Arc<AlertStore>,
    mut rx: mpsc::Receiver<AlertDraft>,
    cancel: CancellationToken,
) -> usize {
    let mut applied = 0;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            msg = rx.recv() => match msg {
                Some(draft) => {
                    store.add_alert(draft.category, draft.message, draft.location);
                    applied += 1;
                }
                None => break,
            },
        }
    }
    info!(applied, "alert applier stopped");
    applied
}
