//! Server-side chart rendering for the dashboard.
//!
//! Both chart endpoints read through the same executor as the query console,
//! but their statements are fixed and server-authored, so they bypass the
//! gate. Storage returns samples newest-first; the renderer reverses them so
//! the time axis runs oldest to newest.

use chrono::{Duration, NaiveDateTime};
use plotters::element::Pie;
use plotters::prelude::*;
use std::sync::Arc;

use crate::models::Sample;
use crate::services::StoreExecutor;
use crate::utils::{ApiError, ApiResult};

const LINE_WIDTH: u32 = 900;
const LINE_HEIGHT: u32 = 420;
const PIE_WIDTH: u32 = 480;
const PIE_HEIGHT: u32 = 480;

/// Default number of points for the line chart when the client asks for
/// nothing specific.
pub const DEFAULT_LINE_POINTS: u64 = 120;

pub struct ChartRenderer {
    executor: Arc<StoreExecutor>,
    max_points: u64,
}

impl ChartRenderer {
    pub fn new(executor: Arc<StoreExecutor>, max_points: u64) -> Self {
        Self { executor, max_points: max_points.max(1) }
    }

    /// Line chart of the most recent `points` samples within the last hour.
    pub async fn render_line(&self, points: u64) -> ApiResult<Vec<u8>> {
        let points = points.clamp(1, self.max_points);
        let sql = format!(
            "SELECT timestamp, cpu_usage, memory_usage FROM stats \
             WHERE timestamp >= NOW() - INTERVAL 1 HOUR \
             ORDER BY timestamp DESC LIMIT {};",
            points
        );

        let result = self.executor.query(&sql).await?;
        let mut samples = Sample::from_result(&result);
        // Storage order is newest-first; plot oldest -> newest.
        samples.reverse();

        draw_line_chart(&samples)
    }

    /// Pie of the single most recent sample; renders a "no data" placeholder
    /// when the table is empty.
    pub async fn render_pie(&self) -> ApiResult<Vec<u8>> {
        let sql = "SELECT timestamp, cpu_usage, memory_usage FROM stats \
                   ORDER BY timestamp DESC LIMIT 1;";

        let result = self.executor.query(sql).await?;
        let samples = Sample::from_result(&result);

        draw_pie_chart(samples.first())
    }
}

/// Render a two-series (CPU, memory) time line into a PNG.
pub fn draw_line_chart(samples: &[Sample]) -> ApiResult<Vec<u8>> {
    let mut rgb = vec![0u8; (LINE_WIDTH * LINE_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (LINE_WIDTH, LINE_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let (start, end) = time_range(samples);

        let mut chart = ChartBuilder::on(&root)
            .caption("System Monitor - Latest Samples", ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(70)
            .y_label_area_size(45)
            .build_cartesian_2d(RangedDateTime::from(start..end), 0f64..100f64)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|t: &NaiveDateTime| t.format("%H:%M:%S").to_string())
            .x_label_style(("sans-serif", 12).into_font().transform(FontTransform::Rotate90))
            .y_desc("Percent")
            .draw()
            .map_err(chart_err)?;

        let cpu_points: Vec<(NaiveDateTime, f64)> =
            samples.iter().filter_map(|s| s.cpu_usage.map(|v| (s.timestamp, v))).collect();
        let mem_points: Vec<(NaiveDateTime, f64)> =
            samples.iter().filter_map(|s| s.memory_usage.map(|v| (s.timestamp, v))).collect();

        chart
            .draw_series(LineSeries::new(cpu_points, &RED))
            .map_err(chart_err)?
            .label("CPU %")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED));

        chart
            .draw_series(LineSeries::new(mem_points, &BLUE))
            .map_err(chart_err)?
            .label("Mem %")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLUE));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    encode_png(&rgb, LINE_WIDTH, LINE_HEIGHT)
}

/// Render the latest sample as a CPU/memory pie into a PNG. `None` (or an
/// all-null sample) produces a placeholder with an explicit "no data" label
/// instead of dividing by zero.
pub fn draw_pie_chart(latest: Option<&Sample>) -> ApiResult<Vec<u8>> {
    let mut rgb = vec![0u8; (PIE_WIDTH * PIE_HEIGHT * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut rgb, (PIE_WIDTH, PIE_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let cpu = latest.and_then(|s| s.cpu_usage).unwrap_or(0.0);
        let mem = latest.and_then(|s| s.memory_usage).unwrap_or(0.0);

        let caption = match latest {
            Some(s) => format!("Latest sample - {}", s.timestamp.format("%Y-%m-%d %H:%M:%S")),
            None => "Latest sample".to_string(),
        };
        root.draw(&Text::new(caption, (20, 20), ("sans-serif", 18)))
            .map_err(chart_err)?;

        if cpu + mem > 0.0 {
            let center = (240, 250);
            let radius = 160.0;
            let sizes = vec![cpu, mem];
            let colors = vec![RED, BLUE];
            let labels = vec![format!("CPU {:.1}%", cpu), format!("Mem {:.1}%", mem)];

            let pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            root.draw(&pie).map_err(chart_err)?;
        } else {
            root.draw(&Text::new("no data", (190, 240), ("sans-serif", 28)))
                .map_err(chart_err)?;
        }

        root.present().map_err(chart_err)?;
    }

    encode_png(&rgb, PIE_WIDTH, PIE_HEIGHT)
}

/// Chronological axis bounds; falls back to the trailing hour when there is
/// nothing to plot, and pads a single-sample range so plotters never sees an
/// empty interval.
fn time_range(samples: &[Sample]) -> (NaiveDateTime, NaiveDateTime) {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) if first.timestamp < last.timestamp => {
            (first.timestamp, last.timestamp)
        },
        (Some(first), Some(_)) => (first.timestamp, first.timestamp + Duration::seconds(1)),
        _ => {
            let now = chrono::Utc::now().naive_utc();
            (now - Duration::hours(1), now)
        },
    }
}

fn encode_png(rgb: &[u8], width: u32, height: u32) -> ApiResult<Vec<u8>> {
    let img: image::RgbImage = image::ImageBuffer::from_raw(width, height, rgb.to_vec())
        .ok_or_else(|| ApiError::internal_error("chart buffer size mismatch"))?;

    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| ApiError::internal_error(format!("PNG encoding failed: {}", e)))?;

    Ok(out.into_inner())
}

fn chart_err<E: std::fmt::Display>(e: E) -> ApiError {
    ApiError::internal_error(format!("chart rendering failed: {}", e))
}
