//! Cancellable fetch lifecycle.
//!
//! A `FetchController` owns at most one in-flight request. Each lifecycle gets
//! its own `CancellationToken`; a superseded or dropped lifecycle is cancelled
//! and its result is discarded instead of published.
//!
//! State is published through a `tokio::sync::watch` channel. The final
//! "is this lifecycle still current?" check runs inside the channel's write
//! lock, and a new lifecycle always cancels the old token before publishing
//! its own `loading` state, so a stale result can never land after a newer
//! update.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::data::client::Fetcher;
use crate::domain::StatsResponse;

/// What a consumer sees of the current lifecycle.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    pub loading: bool,
    /// Last successful response; kept across failed lifecycles.
    pub data: Option<Arc<StatsResponse>>,
    pub error: Option<String>,
}

struct Lifecycle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

pub struct FetchController<F> {
    fetcher: Arc<F>,
    runtime: Handle,
    state: Arc<watch::Sender<FetchState>>,
    url: Option<String>,
    lifecycle: Option<Lifecycle>,
}

impl<F: Fetcher + 'static> FetchController<F> {
    /// Idle controller; nothing is fetched until `set_url` gets a URL.
    pub fn new(fetcher: Arc<F>, runtime: Handle) -> Self {
        let (tx, _rx) = watch::channel(FetchState::default());
        Self {
            fetcher,
            runtime,
            state: Arc::new(tx),
            url: None,
            lifecycle: None,
        }
    }

    /// Point the controller at `url`.
    ///
    /// A different URL cancels the current lifecycle and starts a new one.
    /// The same URL is a no-op. `None` or a blank URL cancels and goes idle.
    pub fn set_url(&mut self, url: Option<String>) {
        let url = url.filter(|u| !u.trim().is_empty());
        if self.url == url {
            return;
        }
        self.url = url;
        self.restart();
    }

    /// Start a fresh lifecycle for the current URL.
    pub fn refresh(&mut self) {
        self.restart();
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every published state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Wait until the current lifecycle has settled and return the state.
    pub async fn settled(&self) -> FetchState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    fn restart(&mut self) {
        self.cancel();

        let Some(url) = self.url.clone() else {
            self.state.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
            return;
        };

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let token = CancellationToken::new();
        info!(url = %url, "starting fetch lifecycle");
        let task = self.runtime.spawn(run_lifecycle(
            Arc::clone(&self.fetcher),
            url,
            token.clone(),
            Arc::clone(&self.state),
        ));
        self.lifecycle = Some(Lifecycle { token, task });
    }

    fn cancel(&mut self) {
        if let Some(lifecycle) = self.lifecycle.take() {
            lifecycle.token.cancel();
            lifecycle.task.abort();
        }
    }
}

impl<F> Drop for FetchController<F> {
    fn drop(&mut self) {
        if let Some(lifecycle) = self.lifecycle.take() {
            lifecycle.token.cancel();
            lifecycle.task.abort();
        }
    }
}

async fn run_lifecycle<F: Fetcher>(
    fetcher: Arc<F>,
    url: String,
    token: CancellationToken,
    state: Arc<watch::Sender<FetchState>>,
) {
    let result = tokio::select! {
        _ = token.cancelled() => {
            debug!(url = %url, "fetch cancelled before settling");
            return;
        }
        result = fetcher.fetch(&url) => result,
    };

    let published = state.send_if_modified(|s| {
        if token.is_cancelled() {
            return false;
        }
        match result {
            Ok(resp) => {
                s.data = Some(Arc::new(resp));
                s.error = None;
            }
            Err(err) => {
                warn!(url = %url, error = %err, "fetch failed");
                s.error = Some(err.to_string());
            }
        }
        s.loading = false;
        true
    });

    if published {
        debug!(url = %url, "fetch settled");
    } else {
        debug!(url = %url, "discarded result of superseded fetch");
    }
}
