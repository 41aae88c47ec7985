//! Batch export of recent samples: CSV plus a PNG line chart, written to
//! `artifacts/`. Intended for cron/CI use alongside the dashboard server.

use std::io::Write;
use std::sync::Arc;

use pulseboard::config::Config;
use pulseboard::models::{SAMPLE_TIME_FORMAT, Sample};
use pulseboard::services::renderer;
use pulseboard::StoreExecutor;

const DEFAULT_POINTS: u64 = 60;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load_without_cli()?;

    let points = std::env::var("POINTS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_POINTS)
        .clamp(1, config.dashboard.max_points);

    let executor = Arc::new(StoreExecutor::new(&config.database));

    let sql = format!(
        "SELECT timestamp, cpu_usage, memory_usage FROM stats \
         ORDER BY timestamp DESC LIMIT {};",
        points
    );
    let result = executor.query(&sql).await?;

    let mut samples = Sample::from_result(&result);
    // Newest-first from storage; export oldest -> newest.
    samples.reverse();

    std::fs::create_dir_all("artifacts")?;

    write_csv("artifacts/stats_snapshot.csv", &samples)?;
    tracing::info!("Wrote artifacts/stats_snapshot.csv ({} rows)", samples.len());

    let png = renderer::draw_line_chart(&samples)?;
    std::fs::write("artifacts/stats_last_hour.png", png)?;
    tracing::info!("Wrote artifacts/stats_last_hour.png");

    Ok(())
}

fn write_csv(path: &str, samples: &[Sample]) -> Result<(), anyhow::Error> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "timestamp,cpu_usage,memory_usage")?;
    for sample in samples {
        writeln!(
            file,
            "{},{},{}",
            sample.timestamp.format(SAMPLE_TIME_FORMAT),
            sample.cpu_usage.map(|v| v.to_string()).unwrap_or_default(),
            sample.memory_usage.map(|v| v.to_string()).unwrap_or_default(),
        )?;
    }
    Ok(())
}
