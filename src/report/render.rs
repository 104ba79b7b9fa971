use chrono::Duration;

use crate::models::Report;

const RULE_WIDTH: usize = 32;

/// Something that can turn a report into bytes for one output flavor.
pub trait ReportRenderer: Send + Sync {
    fn flavor(&self) -> &str;
    /// Must be deterministic for a given report.
    fn render_report(&self, report: &Report) -> Vec<u8>;
}

/// Plain-text renderer: aggregate header followed by one numbered section per
/// bucket, calls separated by a dashed rule.
pub struct TextReportRenderer {
    flavor: String,
    group_separator: char,
    call_separator: char,
}

impl TextReportRenderer {
    pub fn new(flavor: impl Into<String>) -> Self {
        Self {
            flavor: flavor.into(),
            group_separator: '#',
            call_separator: '-',
        }
    }

    pub fn with_separators(mut self, group_separator: char, call_separator: char) -> Self {
        self.group_separator = group_separator;
        self.call_separator = call_separator;
        self
    }
}

impl ReportRenderer for TextReportRenderer {
    fn flavor(&self) -> &str {
        &self.flavor
    }

    fn render_report(&self, report: &Report) -> Vec<u8> {
        let intervals = report.intervals();
        let distinct = report.distinct_calls();
        let interval_mins = report.interval_size().num_minutes();

        let period = match (intervals.keys().next(), intervals.keys().next_back()) {
            (Some(first), Some(last)) => {
                format!("Period: {} -> {}", first.to_rfc3339(), last.to_rfc3339())
            }
            _ => "Period: (no calls)".to_string(),
        };

        let mut lines = vec![
            period,
            String::new(),
            format!("Calls: {}", distinct.len()),
            format!("Initiated intervals: {}", report.bucket_count()),
            format!(
                "Active work time: {}",
                format_duration(report.total_active_duration())
            ),
            String::new(),
        ];

        for (n, (bucket_start, group)) in intervals.iter().enumerate() {
            lines.push(center(
                &format!(" {}. {} ", n + 1, bucket_start.to_rfc3339()),
                RULE_WIDTH,
                self.group_separator,
            ));
            lines.push(String::new());

            let rule = format!(
                "\n\n{}\n\n",
                self.call_separator.to_string().repeat(RULE_WIDTH)
            );
            let blocks: Vec<String> = group
                .iter()
                .map(|call| {
                    [
                        format!("Tel: {}", call.phone_number),
                        format!("Start time: {}", call.start_time.to_rfc3339()),
                        format!("Duration: Ca. {}", format_duration(call.duration())),
                        format!("Cases: {}", call.cases.join(", ")),
                        format!(
                            "{} minute interval: {}",
                            interval_mins,
                            bucket_start.to_rfc3339()
                        ),
                    ]
                    .join("\n")
                })
                .collect();
            lines.push(blocks.join(&rule));
            lines.push(String::new());
        }

        lines.join("\n").into_bytes()
    }
}

/// H:MM:SS, hours unpadded.
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds();
    format!(
        "{}:{:02}:{:02}",
        total_secs / 3600,
        total_secs % 3600 / 60,
        total_secs % 60
    )
}

fn center(text: &str, width: usize, fill: char) -> String {
    if text.len() >= width {
        return text.to_string();
    }
    let left = (width - text.len()) / 2;
    let right = width - text.len() - left;
    format!(
        "{}{}{}",
        fill.to_string().repeat(left),
        text,
        fill.to_string().repeat(right)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_by_intervals;
    use crate::models::Call;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    fn sample_report() -> Report {
        let calls = vec![
            Call::new(
                Some(1),
                "555-0100",
                at(10, 0),
                45 * 60 * 1000,
                vec!["A-17".into(), "B-3".into()],
            ),
            Call::new(Some(2), "555-0199", at(10, 5), 5 * 60 * 1000, vec![]),
        ];
        let interval = Duration::minutes(30);
        Report::new(interval, group_by_intervals(&calls, interval))
    }

    #[test]
    fn renders_aggregates_and_call_blocks() {
        let renderer = TextReportRenderer::new("text.utf-8");
        let text = String::from_utf8(renderer.render_report(&sample_report())).unwrap();

        assert!(text.contains("Calls: 2"));
        assert!(text.contains("Initiated intervals: 2"));
        assert!(text.contains("Active work time: 0:50:00"));
        assert!(text.contains("Tel: 555-0100"));
        assert!(text.contains("Duration: Ca. 0:45:00"));
        assert!(text.contains("Cases: A-17, B-3"));
        assert!(text.contains("30 minute interval:"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = TextReportRenderer::new("text.utf-8");
        let report = sample_report();
        assert_eq!(renderer.render_report(&report), renderer.render_report(&report));
    }

    #[test]
    fn empty_report_renders_without_a_period() {
        let renderer = TextReportRenderer::new("text.utf-8");
        let report = Report::new(Duration::minutes(30), Default::default());
        let text = String::from_utf8(renderer.render_report(&report)).unwrap();

        assert!(text.contains("Period: (no calls)"));
        assert!(text.contains("Calls: 0"));
        assert!(text.contains("Active work time: 0:00:00"));
    }

    #[test]
    fn duration_formatting_is_python_timedelta_like() {
        assert_eq!(format_duration(Duration::zero()), "0:00:00");
        assert_eq!(format_duration(Duration::seconds(45 * 60)), "0:45:00");
        assert_eq!(format_duration(Duration::seconds(26 * 3600 + 61)), "26:01:01");
    }

    #[test]
    fn center_pads_with_extra_fill_on_the_right() {
        assert_eq!(center("ab", 5, '#'), "#ab##");
        assert_eq!(center("abcdef", 4, '#'), "abcdef");
    }
}
