use crate::config::Config;
use crate::error::{FetchError, PollerError};
use crate::model::{AppState, PingResult};
use eframe::egui;
use reqwest::Url;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub type SharedState = Arc<Mutex<AppState>>;

/// Locks the shared state. A panic elsewhere must not take the dashboard down with it.
pub fn lock_state(state: &SharedState) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn build_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
}

/// Performs one GET of the ping results collection.
pub async fn fetch_ping_results(
    client: &reqwest::Client,
    endpoint: &Url,
) -> Result<Vec<PingResult>, FetchError> {
    let response = client.get(endpoint.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Background task that fetches the ping results on every tick until `cancel` fires.
///
/// Each tick spawns its own fetch, so a slow backend never delays the next tick.
/// Responses are tagged with the tick number and [`AppState::apply_fetch`] drops
/// those older than the snapshot already shown.
pub async fn poller_task(
    config: Config,
    client: reqwest::Client,
    state: SharedState,
    repaint: Option<egui::Context>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let endpoint = Arc::new(config.endpoint);
    let mut seq: u64 = 0;

    tracing::info!("Polling {} every {:?}", endpoint, config.poll_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Polling of {} cancelled", endpoint);
                break;
            }
            _ = interval.tick() => {}
        }

        if !lock_state(&state).begin_fetch() {
            break;
        }
        seq += 1;
        request_repaint(&repaint);

        let client = client.clone();
        let endpoint = endpoint.clone();
        let state = state.clone();
        let repaint = repaint.clone();
        tokio::spawn(async move {
            let result = fetch_ping_results(&client, &endpoint).await;
            match &result {
                Ok(rows) => tracing::debug!("Fetch #{} returned {} rows", seq, rows.len()),
                Err(e) => tracing::warn!("Fetch #{} from {} failed: {}", seq, endpoint, e),
            }

            let replaced = lock_state(&state).apply_fetch(seq, result);
            if !replaced {
                tracing::trace!("Fetch #{} not applied", seq);
            }
            request_repaint(&repaint);
        });
    }

    lock_state(&state).stop();
}

fn request_repaint(repaint: &Option<egui::Context>) {
    if let Some(ctx) = repaint {
        ctx.request_repaint();
    }
}

/// Owns the poller thread. Dropping it stops polling.
pub struct Poller {
    state: SharedState,
    cancel: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl Poller {
    /// Starts polling on a dedicated thread with its own single-threaded runtime.
    pub fn spawn(
        config: Config,
        state: SharedState,
        repaint: Option<egui::Context>,
    ) -> Result<Self, PollerError> {
        let client = build_client(&config)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let cancel = CancellationToken::new();

        let task = poller_task(config, client, state.clone(), repaint, cancel.clone());
        let thread = std::thread::Builder::new()
            .name("ping-poller".to_string())
            .spawn(move || {
                runtime.block_on(task);
                // Blocking DNS lookups of abandoned fetches must not hold up exit.
                runtime.shutdown_timeout(Duration::from_secs(1));
            })?;

        Ok(Self {
            state,
            cancel,
            thread: Some(thread),
        })
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Cancels the timer and waits for the poller thread to finish.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        lock_state(&self.state).stop();

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Poller thread panicked");
            }
            tracing::info!("Poller stopped");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
