//! Collapsing a 3-hourly forecast feed into one representative sample per day.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{DailyForecast, ForecastFeed, WeatherSample},
};

pub const DEFAULT_REFERENCE_HOUR: u32 = 12;
pub const DEFAULT_MAX_DAYS: usize = 5;

/// How the representative sample of a date is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Sample closest to the reference hour; every date present yields an entry.
    #[default]
    Nearest,
    /// Only a sample exactly at the reference hour counts; other dates are dropped.
    ///
    /// Dates and hours are taken in UTC, where the provider's 3-hour grid always lands on
    /// noon, whatever the location's offset.
    ExactHour,
}

impl SelectionPolicy {
    /// Offset in which this policy reads calendar dates and hours.
    pub fn calendar_offset(self, location: FixedOffset) -> FixedOffset {
        match self {
            SelectionPolicy::Nearest => location,
            SelectionPolicy::ExactHour => Utc.fix(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastSettings {
    pub reference_hour: u32,
    pub max_days: usize,
    pub policy: SelectionPolicy,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            reference_hour: DEFAULT_REFERENCE_HOUR,
            max_days: DEFAULT_MAX_DAYS,
            policy: SelectionPolicy::default(),
        }
    }
}

/// What the forecast screen shows: today's entry if the feed has one, then the next days.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub today: Option<DailyForecast>,
    pub next_days: Vec<DailyForecast>,
}

impl ForecastView {
    pub fn build(
        feed: &ForecastFeed,
        today: NaiveDate,
        settings: &ForecastSettings,
    ) -> Result<Self, WeatherError> {
        let daily = select_daily(
            &feed.samples,
            feed.utc_offset,
            settings.reference_hour,
            settings.policy,
        )?;

        let today_entry = daily.iter().find(|d| d.date == today).cloned();
        let next_days: Vec<DailyForecast> = daily
            .into_iter()
            .filter(|d| d.date > today)
            .take(settings.max_days)
            .collect();

        if today_entry.is_none() && next_days.is_empty() {
            return Err(WeatherError::EmptyForecast);
        }

        Ok(Self { today: today_entry, next_days })
    }
}

/// Current calendar date at the given UTC offset.
pub fn local_today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Pick one sample per calendar date, ascending by date.
///
/// `offset` is the location's shift from UTC; see [`SelectionPolicy::calendar_offset`].
pub fn select_daily(
    samples: &[WeatherSample],
    offset: FixedOffset,
    reference_hour: u32,
    policy: SelectionPolicy,
) -> Result<Vec<DailyForecast>, WeatherError> {
    if samples.is_empty() {
        return Err(WeatherError::EmptyForecast);
    }

    let mut ordered: Vec<&WeatherSample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    let offset = policy.calendar_offset(offset);
    let target = i64::from(reference_hour) * 60;
    let mut by_date: BTreeMap<NaiveDate, (i64, &WeatherSample)> = BTreeMap::new();

    for sample in ordered {
        let local = sample.timestamp.with_timezone(&offset);
        let distance = (minute_of_day(&local) - target).abs();

        if policy == SelectionPolicy::ExactHour && local.hour() != reference_hour {
            continue;
        }

        // Strict comparison keeps the earliest sample on ties.
        by_date
            .entry(local.date_naive())
            .and_modify(|best| {
                if distance < best.0 {
                    *best = (distance, sample);
                }
            })
            .or_insert((distance, sample));
    }

    if by_date.is_empty() {
        return Err(WeatherError::EmptyForecast);
    }

    debug!(dates = by_date.len(), samples = samples.len(), ?policy, "selected daily samples");

    Ok(by_date
        .into_iter()
        .map(|(date, (_, sample))| DailyForecast { date, sample: sample.clone() })
        .collect())
}

/// Entries dated `from` or later, at most `max_days` of them.
pub fn upcoming(daily: &[DailyForecast], from: NaiveDate, max_days: usize) -> Vec<DailyForecast> {
    daily.iter().filter(|d| d.date >= from).take(max_days).cloned().collect()
}

fn minute_of_day(t: &DateTime<FixedOffset>) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}
