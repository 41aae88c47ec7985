//! Periodic host sampler: reads CPU%/memory% and inserts one row per tick.
//!
//! Writes are fire-and-forget with bounded retry; a tick that exhausts its
//! retries is logged and dropped, and the next tick starts fresh. The query
//! console never depends on this task being alive.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sysinfo::System;

use crate::models::SAMPLE_TIME_FORMAT;
use crate::services::StoreExecutor;
use crate::utils::ScheduledTask;

const INSERT_ATTEMPTS: u32 = 5;
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

pub struct SamplerService {
    executor: Arc<StoreExecutor>,
    sys: Mutex<System>,
    host: Option<String>,
}

impl SamplerService {
    pub fn new(executor: Arc<StoreExecutor>) -> Self {
        Self { executor, sys: Mutex::new(System::new()), host: System::host_name() }
    }

    /// Take one reading and insert it, retrying on store failure.
    pub async fn collect_once(&self) -> Result<(), anyhow::Error> {
        let (cpu, mem) = self.read_host_metrics().await;
        let ts = chrono::Utc::now().format(SAMPLE_TIME_FORMAT).to_string();

        let mut last_err = None;
        for attempt in 1..=INSERT_ATTEMPTS {
            match self
                .executor
                .exec_drop(
                    "INSERT INTO stats (timestamp, cpu_usage, memory_usage, host) \
                     VALUES (?, ?, ?, ?)",
                    (ts.clone(), cpu, mem, self.host.clone()),
                )
                .await
            {
                Ok(()) => {
                    tracing::debug!(
                        "Recorded sample at {}: cpu={:?} mem={:?}",
                        ts,
                        cpu,
                        mem
                    );
                    return Ok(());
                },
                Err(e) => {
                    tracing::warn!(
                        "Sample insert attempt {}/{} failed: {}",
                        attempt,
                        INSERT_ATTEMPTS,
                        e
                    );
                    last_err = Some(e);
                    if attempt < INSERT_ATTEMPTS {
                        tokio::time::sleep(RETRY_BACKOFF).await;
                    }
                },
            }
        }

        Err(anyhow::anyhow!(
            "dropping sample taken at {}: {}",
            ts,
            last_err.map(|e| e.to_string()).unwrap_or_default()
        ))
    }

    /// CPU usage needs two refreshes with a pause in between; the guard is
    /// released across the await.
    async fn read_host_metrics(&self) -> (Option<f64>, Option<f64>) {
        if let Ok(mut sys) = self.sys.lock() {
            sys.refresh_cpu();
        }
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;

        match self.sys.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();

                let cpu = f64::from(sys.global_cpu_info().cpu_usage());
                let mem = if sys.total_memory() > 0 {
                    Some(sys.used_memory() as f64 / sys.total_memory() as f64 * 100.0)
                } else {
                    None
                };
                (Some(cpu), mem)
            },
            // A poisoned lock means a reader panicked; record the tick with
            // null metrics rather than skipping it.
            Err(_) => (None, None),
        }
    }
}

impl ScheduledTask for SamplerService {
    fn run(&self) -> Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send + '_>> {
        Box::pin(self.collect_once())
    }
}
