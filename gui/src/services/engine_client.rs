// Bridge between the Dioxus UI and the engine's dashboard service.
//
// The engine's HTTP client needs a tokio reactor, so each request cycle is
// spawned onto a runtime owned by `main` and awaited from the UI task. When
// the UI drops the awaiting future (a newer request superseded it), the
// spawned cycle is aborted with it.

use engine::config::settings::EngineSettings;
use engine::data::provider_from_settings;
use engine::models::DashboardOutcome;
use engine::services::DashboardService;
use shared::models::DashboardRequest;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinError};

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs `future` on `runtime`; dropping the returned future aborts the task.
async fn run_detached<F>(runtime: &Handle, future: F) -> Result<F::Output, JoinError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let task = runtime.spawn(future);
    let _abort = AbortOnDrop(task.abort_handle());
    task.await
}

#[derive(Clone)]
pub struct EngineClient {
    service: Arc<DashboardService>,
    runtime: Handle,
}

impl EngineClient {
    pub fn new(settings: EngineSettings, runtime: Handle) -> anyhow::Result<Self> {
        let provider = provider_from_settings(&settings.provider)?;
        let service = DashboardService::new(provider).with_style(settings.chart);
        Ok(Self {
            service: Arc::new(service),
            runtime,
        })
    }

    pub async fn run(&self, request: DashboardRequest) -> DashboardOutcome {
        let service = self.service.clone();
        match run_detached(&self.runtime, async move { service.run(&request).await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Dashboard task did not complete");
                DashboardOutcome::Failed {
                    message: format!("An error occurred: {}", e),
                    hint: engine::services::dashboard::SYMBOL_HINT.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::config::settings::{ProviderKind, ProviderSettings};
    use engine::services::dashboard::{ENTER_TICKER_MESSAGE, NO_DATA_MESSAGE};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn csv_client(dir: &str) -> EngineClient {
        let settings = EngineSettings {
            provider: ProviderSettings {
                kind: ProviderKind::Csv,
                csv_dir: dir.into(),
                ..ProviderSettings::default()
            },
            ..EngineSettings::default()
        };
        EngineClient::new(settings, Handle::current()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_ticker_file_is_not_found() {
        let client = csv_client("/nonexistent/prices");
        let outcome = client.run(DashboardRequest::default()).await;
        assert_eq!(
            outcome,
            DashboardOutcome::NotFound {
                message: NO_DATA_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_blank_ticker_prompts() {
        let client = csv_client("/nonexistent/prices");
        let request = DashboardRequest {
            ticker: String::new(),
            ..DashboardRequest::default()
        };
        assert_eq!(
            client.run(request).await,
            DashboardOutcome::Prompt {
                message: ENTER_TICKER_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_superseded_cycle_is_aborted() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let pending = run_detached(&Handle::current(), async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
        });
        assert!(tokio::time::timeout(Duration::from_millis(20), pending).await.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_completed_cycle_returns_output() {
        assert_eq!(run_detached(&Handle::current(), async { 7 }).await.unwrap(), 7);
    }
}
