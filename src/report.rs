use crate::errors::Result;
use crate::models::{
    BotAttributes, BotDetail, BotLight, BotReport, BotStatus, ChartView, ChartViews, ChartWindow,
    FleetSummary,
};
use crate::series::{normalize, samples_from_payload};
use crate::stats::{build_windows, highlights, reduce, trailing_subset, window_labels};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

pub fn build_report(bot: &BotDetail) -> Result<BotReport> {
    build_report_at(Local::now().date_naive(), bot)
}

/// `today` only labels the charts of a bot without any metrics; every
/// other figure is anchored on the bot's own latest metric day.
pub fn build_report_at(today: NaiveDate, bot: &BotDetail) -> Result<BotReport> {
    let samples = samples_from_payload(&bot.metrics)?;
    let series = normalize(&samples);
    debug!(
        "bot {} has {} samples over {} days",
        bot.id,
        samples.len(),
        series.len()
    );

    let attributes = BotAttributes::from(bot);
    let statistics = reduce(&series, &attributes);
    let trend = match series.latest() {
        Some(latest) => highlights(trailing_subset(&series, latest.day)),
        None => highlights(&[]),
    };
    let windows = build_windows(&series);

    info!(
        "built report for bot {} ({}): activity {:?}, growth {}%",
        bot.id, bot.name, statistics.activity_level, statistics.growth_rate
    );

    Ok(BotReport {
        id: bot.id,
        name: bot.name.clone(),
        topic: bot.topic.clone(),
        status: bot.status,
        description: bot.description.clone(),
        statistics,
        highlights: trend,
        charts: ChartViews {
            week: chart_view(&windows.week, today),
            fortnight: chart_view(&windows.fortnight, today),
            month: chart_view(&windows.month, today),
        },
    })
}

fn chart_view(window: &ChartWindow, today: NaiveDate) -> ChartView {
    ChartView {
        labels: window_labels(window.end.unwrap_or(today), window.span),
        values: window.values.clone(),
    }
}

pub fn build_fleet_summary(bots: &[BotLight]) -> FleetSummary {
    let active = bots
        .iter()
        .filter(|bot| bot.status == BotStatus::Active)
        .count();
    FleetSummary {
        total: bots.len(),
        active,
        inactive: bots.len() - active,
    }
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(payload)
}
