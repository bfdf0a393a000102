use crate::errors::{MetricsError, Result};
use crate::models::{MetricPoint, MetricsPayload};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl RawSample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyValue {
    pub day: NaiveDate,
    pub value: f64,
}

/// Per-day series: strictly ascending days, at most one entry per day.
/// Built only by [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalSeries {
    points: Vec<DailyValue>,
}

impl CanonicalSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyValue> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[DailyValue] {
        &self.points
    }

    pub fn latest(&self) -> Option<&DailyValue> {
        self.points.last()
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|point| point.value).sum()
    }

    pub fn to_samples(&self) -> Vec<RawSample> {
        self.points
            .iter()
            .map(|point| RawSample::new(point.day.and_time(NaiveTime::MIN).and_utc(), point.value))
            .collect()
    }
}

pub fn normalize(samples: &[RawSample]) -> CanonicalSeries {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for sample in samples {
        *days.entry(sample.timestamp.date_naive()).or_insert(0.0) += sample.value;
    }

    CanonicalSeries {
        points: days
            .into_iter()
            .map(|(day, value)| DailyValue { day, value })
            .collect(),
    }
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(stamp.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(stamp.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| MetricsError::invalid_timestamp(raw))
}

pub fn parse_sample(date: &str, value: f64) -> Result<RawSample> {
    if !value.is_finite() || value < 0.0 {
        return Err(MetricsError::invalid_value(date, value));
    }
    Ok(RawSample::new(parse_timestamp(date)?, value))
}

pub fn samples_from_payload(payload: &MetricsPayload) -> Result<Vec<RawSample>> {
    match payload {
        MetricsPayload::Points(points) => points
            .iter()
            .map(|MetricPoint { date, value }| parse_sample(date, *value))
            .collect(),
        MetricsPayload::ByDate(by_date) => by_date
            .iter()
            .map(|(date, value)| parse_sample(date, *value))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_samples_are_summed() {
        let samples = vec![
            RawSample::new(at(2024, 2, 1, 9), 5.0),
            RawSample::new(at(2024, 2, 1, 18), 7.0),
        ];
        let series = normalize(&samples);
        assert_eq!(series.len(), 1);
        assert_eq!(series.as_slice()[0], DailyValue { day: day(2024, 2, 1), value: 12.0 });
    }

    #[test]
    fn output_is_ascending_unique_and_conserves_total() {
        let samples = vec![
            RawSample::new(at(2024, 3, 9, 1), 4.0),
            RawSample::new(at(2024, 3, 1, 23), 1.0),
            RawSample::new(at(2024, 3, 9, 22), 6.0),
            RawSample::new(at(2024, 3, 4, 12), 2.5),
            RawSample::new(at(2024, 3, 1, 0), 3.0),
        ];
        let series = normalize(&samples);

        let days: Vec<NaiveDate> = series.iter().map(|point| point.day).collect();
        assert_eq!(days, vec![day(2024, 3, 1), day(2024, 3, 4), day(2024, 3, 9)]);
        assert!(series.as_slice().windows(2).all(|pair| pair[0].day < pair[1].day));

        let input_total: f64 = samples.iter().map(|sample| sample.value).sum();
        assert_eq!(series.total(), input_total);
    }

    #[test]
    fn gaps_are_not_filled() {
        let samples = vec![
            RawSample::new(at(2024, 1, 1, 0), 1.0),
            RawSample::new(at(2024, 1, 10, 0), 1.0),
        ];
        assert_eq!(normalize(&samples).len(), 2);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = normalize(&[]);
        assert!(series.is_empty());
        assert!(series.latest().is_none());
    }

    #[test]
    fn renormalizing_is_idempotent() {
        let samples = vec![
            RawSample::new(at(2024, 5, 2, 8), 3.0),
            RawSample::new(at(2024, 5, 2, 20), 4.0),
            RawSample::new(at(2024, 5, 7, 11), 9.0),
        ];
        let series = normalize(&samples);
        assert_eq!(normalize(&series.to_samples()), series);
    }

    #[test]
    fn timestamps_parse_in_supported_shapes() {
        assert_eq!(parse_timestamp("2024-01-03").unwrap(), at(2024, 1, 3, 0));
        assert_eq!(parse_timestamp("2024-01-03T10:00:00").unwrap(), at(2024, 1, 3, 10));
        assert_eq!(parse_timestamp("2024-01-03 10:00:00.250").unwrap().date_naive(), day(2024, 1, 3));
        assert_eq!(parse_timestamp("2024-01-03T10:00:00Z").unwrap(), at(2024, 1, 3, 10));
        // 01:30 at +03:00 is still the previous UTC day
        assert_eq!(
            parse_timestamp("2024-01-03T01:30:00+03:00").unwrap().date_naive(),
            day(2024, 1, 2)
        );
    }

    #[test]
    fn malformed_input_is_rejected_at_the_boundary() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(MetricsError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            parse_sample("2024-01-01", -1.0),
            Err(MetricsError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_sample("2024-01-01", f64::NAN),
            Err(MetricsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn payload_shapes_convert_to_samples() {
        let listed = MetricsPayload::Points(vec![
            MetricPoint { date: "2024-01-01".to_string(), value: 2.0 },
            MetricPoint { date: "2024-01-01T12:00:00Z".to_string(), value: 3.0 },
        ]);
        let series = normalize(&samples_from_payload(&listed).unwrap());
        assert_eq!(series.as_slice(), &[DailyValue { day: day(2024, 1, 1), value: 5.0 }]);

        let mut by_date = BTreeMap::new();
        by_date.insert("2024-01-02".to_string(), 8.0);
        by_date.insert("not a date".to_string(), 1.0);
        assert!(samples_from_payload(&MetricsPayload::ByDate(by_date)).is_err());
    }
}
