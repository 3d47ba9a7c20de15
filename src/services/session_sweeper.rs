use chrono::Utc;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::services::session_store::SessionStore;

/// Every minute, at second zero.
const SWEEP_SCHEDULE: &str = "0 * * * * *";

/// Periodically drops statistics flows the user abandoned.
pub struct SessionSweeper {
    sessions: Arc<dyn SessionStore>,
    scheduler: JobScheduler,
}

impl SessionSweeper {
    pub async fn new(
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            sessions,
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let sessions = self.sessions.clone();

        let sweep_job = Job::new_async(SWEEP_SCHEDULE, move |_uuid, _l| {
            let sessions = sessions.clone();
            Box::pin(async move {
                sweep(sessions.as_ref()).await;
            })
        })?;

        self.scheduler.add(sweep_job).await?;
        self.scheduler.start().await?;

        tracing::info!("Session sweeper started - evicting idle flows every minute");
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    /// Runs one sweep immediately.
    pub async fn sweep_now(&self) -> usize {
        sweep(self.sessions.as_ref()).await
    }
}

async fn sweep(sessions: &dyn SessionStore) -> usize {
    let evicted = sessions.evict_expired(Utc::now()).await;
    if evicted > 0 {
        tracing::debug!("Evicted {} idle statistics flows", evicted);
    }
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session_store::{FlowState, InMemorySessionStore, SessionPayload};

    #[tokio::test]
    async fn test_sweep_now_evicts_idle_flows() {
        let store = Arc::new(InMemorySessionStore::new(chrono::Duration::zero()));
        store.set(1, FlowState::AwaitingStartDate, SessionPayload::default()).await;
        store.set(2, FlowState::AwaitingEndDate, SessionPayload::default()).await;

        let sweeper = SessionSweeper::new(store.clone()).await.unwrap();
        assert_eq!(sweeper.sweep_now().await, 2);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_live_flows() {
        let store = Arc::new(InMemorySessionStore::new(chrono::Duration::minutes(30)));
        store.set(1, FlowState::AwaitingStatKind, SessionPayload::default()).await;

        let sweeper = SessionSweeper::new(store.clone()).await.unwrap();
        assert_eq!(sweeper.sweep_now().await, 0);
        assert_eq!(store.len().await, 1);
    }
}
