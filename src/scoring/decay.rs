use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::time::Duration;

use super::config::RecencyConfig;

/// One month as humantime parses "1month" (30.44 days).
const MONTH: Duration = Duration::from_secs(2_630_016);

/// Parse an event date. Accepts `YYYY-MM-DD`, `YYYY-MM`, `YYYY`, naive
/// `YYYY-MM-DDTHH:MM:SS` and RFC 3339 timestamps. Anything else is `None`.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if s.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok();
    }
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }
    None
}

/// Whole calendar months from `event` to `reference`. Zero within the same
/// month, negative when the event is in a later month.
pub fn elapsed_months(event: NaiveDate, reference: NaiveDate) -> i64 {
    let month_index = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
    month_index(reference) - month_index(event)
}

/// Exponential recency weight over whole calendar months: 1.0 in the
/// reference month or later, halving every `half_life` into the past, and 0
/// once the event is more than `cutoff` months old.
pub fn decay(
    event: NaiveDate,
    reference: NaiveDate,
    half_life: Duration,
    cutoff: Duration,
) -> f64 {
    let months = elapsed_months(event, reference);
    if months <= 0 {
        return 1.0;
    }
    let months = months as f64;
    let month_secs = MONTH.as_secs_f64();
    if months > cutoff.as_secs_f64() / month_secs {
        return 0.0;
    }
    let half_life_months = half_life.as_secs_f64() / month_secs;
    if half_life_months <= 0.0 {
        return 0.0;
    }
    0.5_f64.powf(months / half_life_months)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecencyDecay {
    pub half_life: Duration,
    pub cutoff: Duration,
}

impl RecencyDecay {
    pub fn new(half_life: Duration, cutoff: Duration) -> Self {
        Self { half_life, cutoff }
    }

    pub fn from_config(config: &RecencyConfig) -> Result<Self> {
        let half_life = humantime::parse_duration(config.half_life.trim())
            .with_context(|| format!("invalid half_life '{}'", config.half_life))?;
        let cutoff = humantime::parse_duration(config.cutoff.trim())
            .with_context(|| format!("invalid cutoff '{}'", config.cutoff))?;
        if half_life.is_zero() {
            bail!("half_life must be greater than zero");
        }
        Ok(Self::new(half_life, cutoff))
    }

    pub fn weight(&self, event: NaiveDate, reference: NaiveDate) -> f64 {
        decay(event, reference, self.half_life, self.cutoff)
    }

    /// Weight of a raw date string; missing or unparseable dates weigh 0.
    pub fn weight_of(&self, raw: Option<&str>, reference: NaiveDate) -> f64 {
        raw.and_then(parse_event_date)
            .map(|date| self.weight(date, reference))
            .unwrap_or(0.0)
    }
}

impl Default for RecencyDecay {
    fn default() -> Self {
        // Mirrors RecencyConfig::default ("12months" / "36months")
        Self::new(MONTH * 12, MONTH * 36)
    }
}
