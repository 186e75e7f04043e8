use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::config::{ScoringConfig, TierThresholds};
use super::criteria::{CompiledRules, Criterion, CriterionScore};
use super::decay::RecencyDecay;
use super::validation::validate_scoring;
use crate::leads::LeadRecord;

pub const MAX_TOTAL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Hot,
    Warm,
    Cold,
}

impl Tier {
    pub fn classify(total: u32, thresholds: &TierThresholds) -> Self {
        if total >= thresholds.hot {
            Tier::Hot
        } else if total >= thresholds.warm {
            Tier::Warm
        } else {
            Tier::Cold
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Some(Tier::Hot),
            "warm" => Some(Tier::Warm),
            "cold" => Some(Tier::Cold),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Hot => "Hot",
            Tier::Warm => "Warm",
            Tier::Cold => "Cold",
        };
        f.write_str(label)
    }
}

/// Per-criterion scores in `Criterion::ALL` order plus the clamped total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub criteria: Vec<CriterionScore>,
    pub total: u32,
}

impl ScoreBreakdown {
    pub fn from_scores(criteria: Vec<CriterionScore>) -> Self {
        let sum: u32 = criteria.iter().map(|c| c.points).sum();
        Self {
            criteria,
            total: sum.min(MAX_TOTAL),
        }
    }

    pub fn get(&self, criterion: Criterion) -> Option<&CriterionScore> {
        self.criteria.iter().find(|c| c.criterion == criterion)
    }

    pub fn points(&self, criterion: Criterion) -> u32 {
        self.get(criterion).map(|c| c.points).unwrap_or(0)
    }

    /// Sum of criterion points before clamping.
    pub fn raw_sum(&self) -> u32 {
        self.criteria.iter().map(|c| c.points).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub breakdown: ScoreBreakdown,
    pub tier: Tier,
    /// Biotech hub the lead was located in, if any
    pub hub: Option<String>,
}

/// Runs every criterion against a lead. Built once per run from an
/// immutable config and the date recency is measured from.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    rules: CompiledRules,
    tiers: TierThresholds,
}

impl ScoreAggregator {
    /// Validate and compile `config`. Returns every validation error at once.
    pub fn new(config: &ScoringConfig, reference_date: NaiveDate) -> Result<Self, Vec<String>> {
        validate_scoring(config)?;
        let decay = RecencyDecay::from_config(&config.recency)
            .map_err(|e| vec![format!("scoring.recency: {}", e)])?;
        Ok(Self {
            rules: CompiledRules::compile(config, decay, reference_date),
            tiers: config.tiers,
        })
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.rules.reference_date
    }

    pub fn tiers(&self) -> &TierThresholds {
        &self.tiers
    }

    pub fn aggregate(&self, lead: &LeadRecord) -> ScoreBreakdown {
        let scores = Criterion::ALL
            .iter()
            .map(|criterion| criterion.evaluate(lead, &self.rules))
            .collect();
        ScoreBreakdown::from_scores(scores)
    }

    pub fn score(&self, lead: &LeadRecord) -> ScoreResult {
        let breakdown = self.aggregate(lead);
        let tier = Tier::classify(breakdown.total, &self.tiers);
        let hub = self.rules.identify_hub(lead).map(|(hub, _)| hub.name.clone());
        ScoreResult {
            breakdown,
            tier,
            hub,
        }
    }
}
