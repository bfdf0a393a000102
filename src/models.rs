use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BotStatus {
    Inactive,
    Active,
}

impl TryFrom<u8> for BotStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Inactive),
            1 => Ok(Self::Active),
            other => Err(format!("unknown bot status {other}")),
        }
    }
}

impl From<BotStatus> for u8 {
    fn from(status: BotStatus) -> Self {
        match status {
            BotStatus::Inactive => 0,
            BotStatus::Active => 1,
        }
    }
}

/// Where a bot receives its traffic from. Unknown wire codes are kept
/// in `Other` so they survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum SourceType {
    Telegram,
    Site,
    Other(u8),
}

impl From<u8> for SourceType {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Telegram,
            1 => Self::Site,
            other => Self::Other(other),
        }
    }
}

impl From<SourceType> for u8 {
    fn from(kind: SourceType) -> Self {
        match kind {
            SourceType::Telegram => 0,
            SourceType::Site => 1,
            SourceType::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSource {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SourceType,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotLight {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub topic: String,
    pub status: BotStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricPoint {
    pub date: String,
    pub value: f64,
}

/// Metric samples as the transport layer delivers them: either a list of
/// `{date, value}` objects or a map keyed by date string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricsPayload {
    Points(Vec<MetricPoint>),
    ByDate(BTreeMap<String, f64>),
}

impl Default for MetricsPayload {
    fn default() -> Self {
        Self::Points(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub topic: String,
    pub status: BotStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub users_count: u64,
    #[serde(default)]
    pub sources: Vec<BotSource>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metrics: MetricsPayload,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<MetricsPayload, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<MetricsPayload>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Input document accepted by the binary: a single bot or a bot list.
#[derive(Debug, Clone)]
pub enum InputDocument {
    Fleet(Vec<BotLight>),
    Bot(BotDetail),
}

impl InputDocument {
    /// Picks the shape from the top-level JSON value so field errors keep
    /// their own message.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        if value.is_array() {
            serde_json::from_value(value).map(Self::Fleet)
        } else {
            serde_json::from_value(value).map(Self::Bot)
        }
    }
}

/// Static bot attributes the reducer needs next to the metric series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotAttributes {
    pub users_count: u64,
    pub source_names: Vec<String>,
}

impl From<&BotDetail> for BotAttributes {
    fn from(bot: &BotDetail) -> Self {
        Self {
            users_count: bot.users_count,
            source_names: bot.sources.iter().map(|source| source.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WindowSpan {
    #[serde(rename = "7D")]
    Week,
    #[serde(rename = "14D")]
    Fortnight,
    #[serde(rename = "30D")]
    Month,
}

impl WindowSpan {
    pub const ALL: [WindowSpan; 3] = [WindowSpan::Week, WindowSpan::Fortnight, WindowSpan::Month];

    pub fn days(self) -> usize {
        match self {
            WindowSpan::Week => 7,
            WindowSpan::Fortnight => 14,
            WindowSpan::Month => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WindowSpan::Week => "7D",
            WindowSpan::Fortnight => "14D",
            WindowSpan::Month => "30D",
        }
    }
}

/// Dense, right-aligned window of daily values. `values.len()` always
/// equals `span.days()`; `end` is `None` only for an empty series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartWindow {
    pub span: WindowSpan,
    pub end: Option<NaiveDate>,
    pub values: Vec<f64>,
}

impl ChartWindow {
    pub fn zeroed(span: WindowSpan) -> Self {
        Self {
            span,
            end: None,
            values: vec![0.0; span.days()],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartWindows {
    #[serde(rename = "7D")]
    pub week: ChartWindow,
    #[serde(rename = "14D")]
    pub fortnight: ChartWindow,
    #[serde(rename = "30D")]
    pub month: ChartWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    pub fn classify(value: f64) -> Self {
        if value > 500.0 {
            Self::High
        } else if value > 100.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub active_users: u64,
    pub growth_rate: i64,
    pub avg_messages_per_user: f64,
    pub source_count: usize,
    pub activity_level: ActivityLevel,
    pub user_growth: f64,
    pub top_source_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesHighlights {
    pub last_value: f64,
    pub average_value: f64,
    pub peak_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartViews {
    #[serde(rename = "7D")]
    pub week: ChartView,
    #[serde(rename = "14D")]
    pub fortnight: ChartView,
    #[serde(rename = "30D")]
    pub month: ChartView,
}

#[derive(Debug, Clone, Serialize)]
pub struct BotReport {
    pub id: i64,
    pub name: String,
    pub topic: String,
    pub status: BotStatus,
    pub description: String,
    pub statistics: SummaryStatistics,
    pub highlights: SeriesHighlights,
    pub charts: ChartViews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FleetSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}
