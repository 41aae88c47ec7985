use chrono::NaiveDateTime;

use crate::models::{Sample, SAMPLE_TIME_FORMAT};
use crate::services::renderer::{draw_line_chart, draw_pie_chart};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

fn sample(ts: &str, cpu: Option<f64>, mem: Option<f64>) -> Sample {
    Sample {
        timestamp: NaiveDateTime::parse_from_str(ts, SAMPLE_TIME_FORMAT).unwrap(),
        cpu_usage: cpu,
        memory_usage: mem,
    }
}

#[test]
fn line_chart_with_samples_is_valid_png() {
    let samples = vec![
        sample("2026-08-29 10:00:00", Some(12.0), Some(40.0)),
        sample("2026-08-29 10:00:30", Some(25.5), Some(41.2)),
        sample("2026-08-29 10:01:00", Some(18.0), Some(42.0)),
    ];

    let png = draw_line_chart(&samples).unwrap();
    assert!(png.starts_with(PNG_MAGIC));
}

#[test]
fn line_chart_renders_even_with_no_samples() {
    let png = draw_line_chart(&[]).unwrap();
    assert!(png.starts_with(PNG_MAGIC));
}

#[test]
fn line_chart_tolerates_a_single_sample() {
    let samples = vec![sample("2026-08-29 10:00:00", Some(50.0), None)];
    let png = draw_line_chart(&samples).unwrap();
    assert!(png.starts_with(PNG_MAGIC));
}

#[test]
fn pie_chart_with_latest_sample_is_valid_png() {
    let latest = sample("2026-08-29 10:00:00", Some(30.0), Some(55.0));
    let png = draw_pie_chart(Some(&latest)).unwrap();
    assert!(png.starts_with(PNG_MAGIC));
}

#[test]
fn pie_chart_without_data_renders_placeholder() {
    let png = draw_pie_chart(None).unwrap();
    assert!(png.starts_with(PNG_MAGIC));
}

#[test]
fn pie_chart_with_all_null_sample_does_not_panic() {
    let latest = sample("2026-08-29 10:00:00", None, None);
    let png = draw_pie_chart(Some(&latest)).unwrap();
    assert!(png.starts_with(PNG_MAGIC));
}
