//! Dashboard polling
//!
//! Background refresh of the widgets shown by /status, /costs and
//! /workflows: metrics every 5 seconds, costs every 30, active workflows
//! every 10. Each widget has its own interval loop writing into shared
//! state; whichever response lands last wins, and a failed poll keeps
//! the previous value on screen.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use studio_client::{CostReport, StudioClient, SystemMetrics, Workflow};

const METRICS_INTERVAL: Duration = Duration::from_secs(5);
const WORKFLOWS_INTERVAL: Duration = Duration::from_secs(10);
const COSTS_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
pub struct DashboardState {
    pub metrics: Option<SystemMetrics>,
    pub costs: Option<CostReport>,
    pub active_workflows: Vec<Workflow>,
}

pub struct Dashboard {
    state: Arc<RwLock<DashboardState>>,
    handles: Vec<JoinHandle<()>>,
}

impl Dashboard {
    /// Start the polling loops against the given client.
    pub fn start(client: StudioClient) -> Self {
        let state = Arc::new(RwLock::new(DashboardState::default()));
        let mut handles = Vec::new();

        {
            let client = client.clone();
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                let mut tick = tokio::time::interval(METRICS_INTERVAL);
                loop {
                    tick.tick().await;
                    match client.system_status().await {
                        Ok(status) => {
                            state.write().await.metrics = Some(status.metrics);
                        }
                        Err(e) => debug!("metrics poll failed: {}", e),
                    }
                }
            }));
        }

        {
            let client = client.clone();
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                let mut tick = tokio::time::interval(WORKFLOWS_INTERVAL);
                loop {
                    tick.tick().await;
                    match client.active_workflows().await {
                        Ok(workflows) => {
                            state.write().await.active_workflows = workflows;
                        }
                        Err(e) => debug!("workflows poll failed: {}", e),
                    }
                }
            }));
        }

        {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                let mut tick = tokio::time::interval(COSTS_INTERVAL);
                loop {
                    tick.tick().await;
                    match client.current_costs().await {
                        Ok(report) => {
                            state.write().await.costs = Some(report);
                        }
                        Err(e) => debug!("costs poll failed: {}", e),
                    }
                }
            }));
        }

        Self { state, handles }
    }

    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, DashboardState> {
        self.state.read().await
    }

    /// Stop all polling loops.
    pub fn stop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.stop();
    }
}
