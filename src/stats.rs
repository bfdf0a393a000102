use crate::models::{
    ActivityLevel, BotAttributes, ChartWindow, ChartWindows, SeriesHighlights, SummaryStatistics,
    WindowSpan,
};
use crate::series::{CanonicalSeries, DailyValue};
use chrono::{Duration, NaiveDate};
use tracing::debug;

pub const NO_SOURCES: &str = "no sources";

const TRAILING_DAYS: i64 = 7;
const FALLBACK_POINTS: usize = 7;
const MESSAGES_SCALE: f64 = 10.0;
const DEFAULT_PEAK: f64 = 100.0;

/// Statistics over the trailing week ending at the series' own latest day.
pub fn reduce(series: &CanonicalSeries, bot: &BotAttributes) -> SummaryStatistics {
    match series.latest() {
        Some(latest) => reduce_at(latest.day, series, bot),
        None => summarize(&[], bot),
    }
}

pub fn reduce_at(
    anchor: NaiveDate,
    series: &CanonicalSeries,
    bot: &BotAttributes,
) -> SummaryStatistics {
    summarize(trailing_subset(series, anchor), bot)
}

fn summarize(subset: &[DailyValue], bot: &BotAttributes) -> SummaryStatistics {
    SummaryStatistics {
        active_users: bot.users_count,
        growth_rate: growth_rate(subset),
        avg_messages_per_user: avg_messages_per_user(subset),
        source_count: bot.source_names.len(),
        activity_level: activity_level(subset),
        user_growth: user_growth(subset),
        top_source_name: top_source_name(&bot.source_names),
    }
}

/// Entries within the seven calendar days ending on `anchor`, inclusive.
/// Falls back to the seven most recent entries when nothing is that recent.
pub fn trailing_subset(series: &CanonicalSeries, anchor: NaiveDate) -> &[DailyValue] {
    let points = series.as_slice();
    let cutoff = anchor - Duration::days(TRAILING_DAYS - 1);
    let start = points.partition_point(|point| point.day < cutoff);
    if start < points.len() {
        &points[start..]
    } else {
        &points[points.len().saturating_sub(FALLBACK_POINTS)..]
    }
}

pub fn growth_rate(subset: &[DailyValue]) -> i64 {
    growth_percent(subset).map_or(0, |percent| percent.round() as i64)
}

pub fn user_growth(subset: &[DailyValue]) -> f64 {
    growth_percent(subset).map_or(0.0, round_tenth)
}

fn growth_percent(subset: &[DailyValue]) -> Option<f64> {
    let (first, last) = match subset {
        [first, .., last] => (first.value, last.value),
        _ => return None,
    };
    if first == 0.0 {
        return None;
    }
    let percent = (last - first) / first * 100.0;
    percent.is_finite().then_some(percent)
}

pub fn avg_messages_per_user(subset: &[DailyValue]) -> f64 {
    mean(subset).map_or(0.0, |avg| round_tenth(avg / MESSAGES_SCALE))
}

/// Classifies the most recent value in the subset.
pub fn activity_level(subset: &[DailyValue]) -> ActivityLevel {
    subset
        .last()
        .map_or(ActivityLevel::Low, |point| ActivityLevel::classify(point.value))
}

pub fn top_source_name(source_names: &[String]) -> String {
    source_names
        .first()
        .cloned()
        .unwrap_or_else(|| NO_SOURCES.to_string())
}

pub fn highlights(subset: &[DailyValue]) -> SeriesHighlights {
    let peak = subset
        .iter()
        .map(|point| point.value)
        .fold(f64::NEG_INFINITY, f64::max);

    SeriesHighlights {
        last_value: subset.last().map_or(0.0, |point| point.value),
        average_value: mean(subset).map_or(0.0, f64::round),
        peak_value: if peak > 0.0 { peak } else { DEFAULT_PEAK },
    }
}

pub fn build_window(series: &CanonicalSeries, span: WindowSpan) -> ChartWindow {
    let Some(latest) = series.latest().map(|point| point.day) else {
        return ChartWindow::zeroed(span);
    };

    let days = span.days();
    let mut values = vec![0.0; days];
    let mut placed = 0usize;
    // newest first, so offsets only grow
    for point in series.iter().rev() {
        let offset = (latest - point.day).num_days();
        debug_assert!(offset >= 0, "canonical series never passes its latest day");
        let offset = offset as usize;
        if offset >= days {
            break;
        }
        values[days - offset - 1] = point.value;
        placed += 1;
    }

    if placed < series.len() {
        debug!(
            "{} window ending {latest} dropped {} older entries",
            span.label(),
            series.len() - placed
        );
    }

    ChartWindow {
        span,
        end: Some(latest),
        values,
    }
}

pub fn build_windows(series: &CanonicalSeries) -> ChartWindows {
    ChartWindows {
        week: build_window(series, WindowSpan::Week),
        fortnight: build_window(series, WindowSpan::Fortnight),
        month: build_window(series, WindowSpan::Month),
    }
}

/// Day labels for a window ending on `end`, oldest first.
pub fn window_labels(end: NaiveDate, span: WindowSpan) -> Vec<String> {
    let mut labels = Vec::with_capacity(span.days());
    for offset in (0..span.days()).rev() {
        let date = end - Duration::days(offset as i64);
        labels.push(date.format("%-d %b").to_string());
    }
    labels
}

fn mean(subset: &[DailyValue]) -> Option<f64> {
    if subset.is_empty() {
        return None;
    }
    let sum: f64 = subset.iter().map(|point| point.value).sum();
    Some(sum / subset.len() as f64)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
