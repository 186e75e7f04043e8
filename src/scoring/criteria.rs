use chrono::NaiveDate;
use serde::Serialize;

use super::config::ScoringConfig;
use super::decay::{parse_event_date, RecencyDecay};
use super::matcher::KeywordSet;
use crate::leads::LeadRecord;

/// The closed set of scoring dimensions. Each one reads its own slice of
/// the lead and never looks at another criterion's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    RoleFit,
    CompanyIntent,
    Technographic,
    Location,
    ScientificIntent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub points: u32,
    pub max_points: u32,
    pub rationale: String,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::RoleFit,
        Criterion::CompanyIntent,
        Criterion::Technographic,
        Criterion::Location,
        Criterion::ScientificIntent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::RoleFit => "Role Fit",
            Criterion::CompanyIntent => "Company Intent",
            Criterion::Technographic => "Technographic",
            Criterion::Location => "Location",
            Criterion::ScientificIntent => "Scientific Intent",
        }
    }

    /// Snake-case key used in config paths and TSV headers.
    pub fn key(&self) -> &'static str {
        match self {
            Criterion::RoleFit => "role_fit",
            Criterion::CompanyIntent => "company_intent",
            Criterion::Technographic => "technographic",
            Criterion::Location => "location",
            Criterion::ScientificIntent => "scientific_intent",
        }
    }

    pub fn max_points(&self) -> u32 {
        match self {
            Criterion::RoleFit => 30,
            Criterion::CompanyIntent => 20,
            Criterion::Technographic => 15,
            Criterion::Location => 10,
            Criterion::ScientificIntent => 40,
        }
    }

    pub fn evaluate(&self, lead: &LeadRecord, rules: &CompiledRules) -> CriterionScore {
        let (points, rationale) = match self {
            Criterion::RoleFit => role_fit(lead, rules),
            Criterion::CompanyIntent => company_intent(lead, rules),
            Criterion::Technographic => technographic(lead, rules),
            Criterion::Location => location(lead, rules),
            Criterion::ScientificIntent => scientific_intent(lead, rules),
        };
        CriterionScore {
            criterion: *self,
            points: points.min(self.max_points()),
            max_points: self.max_points(),
            rationale,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FundingTier {
    pub round: String,
    pub points: u32,
}

#[derive(Debug, Clone)]
pub struct Hub {
    pub name: String,
    pub aliases: KeywordSet,
    pub points: u32,
}

/// Scoring configuration with keyword sets built and durations parsed,
/// pinned to the reference date recency is measured from.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub role_keywords: KeywordSet,
    pub funding_tiers: Vec<FundingTier>,
    pub tech_keywords: KeywordSet,
    pub hubs: Vec<Hub>,
    pub science_keywords: KeywordSet,
    pub points_per_publication: u32,
    pub decay: RecencyDecay,
    pub reference_date: NaiveDate,
}

impl CompiledRules {
    /// Caller is expected to have run `validate_scoring` first; values that
    /// would exceed a criterion maximum are clamped here regardless.
    pub fn compile(config: &ScoringConfig, decay: RecencyDecay, reference_date: NaiveDate) -> Self {
        let funding_tiers = config
            .company_intent
            .rounds
            .iter()
            .map(|row| FundingTier {
                round: row.round.trim().to_lowercase(),
                points: row.points.min(Criterion::CompanyIntent.max_points()),
            })
            .collect();

        let location_max = Criterion::Location.max_points();
        let hubs = config
            .location
            .hubs
            .iter()
            .map(|hub| Hub {
                name: hub.name.clone(),
                aliases: KeywordSet::new(&hub.aliases),
                points: hub.points.unwrap_or(location_max).min(location_max),
            })
            .collect();

        Self {
            role_keywords: KeywordSet::new(&config.role_fit.keywords),
            funding_tiers,
            tech_keywords: KeywordSet::new(&config.technographic.keywords),
            hubs,
            science_keywords: KeywordSet::new(&config.scientific_intent.keywords),
            points_per_publication: config.scientific_intent.points_per_publication,
            decay,
            reference_date,
        }
    }

    /// First hub named by any of the lead's candidate locations.
    pub fn identify_hub<'a>(&'a self, lead: &'a LeadRecord) -> Option<(&'a Hub, &'a str)> {
        lead.location_candidates().into_iter().find_map(|candidate| {
            self.hubs
                .iter()
                .find(|hub| hub.aliases.find(Some(candidate)).matched)
                .map(|hub| (hub, candidate))
        })
    }
}

fn role_fit(lead: &LeadRecord, rules: &CompiledRules) -> (u32, String) {
    if lead.title.trim().is_empty() {
        return (0, "no title".to_string());
    }
    let found = rules.role_keywords.find(Some(lead.title.as_str()));
    if found.matched {
        (
            Criterion::RoleFit.max_points(),
            format!("title matches {}", found.describe()),
        )
    } else {
        (0, format!("'{}' is not a target role", lead.title.trim()))
    }
}

fn company_intent(lead: &LeadRecord, rules: &CompiledRules) -> (u32, String) {
    let funding = match &lead.funding {
        Some(f) if !f.round.trim().is_empty() => f,
        _ => return (0, "no funding data".to_string()),
    };

    let label = funding.round.to_lowercase();
    let tier = match rules.funding_tiers.iter().find(|t| label.contains(t.round.as_str())) {
        Some(t) => t,
        None => return (0, format!("round '{}' not in point table", funding.round.trim())),
    };

    let date = match funding.date.as_deref().and_then(parse_event_date) {
        Some(d) => d,
        None => {
            return (
                0,
                format!("{} round has no usable date", funding.round.trim()),
            )
        }
    };

    let weight = rules.decay.weight(date, rules.reference_date);
    let points = (tier.points as f64 * weight).round() as u32;
    (
        points,
        format!(
            "{} ({} pts) on {}, recency x{:.2}",
            funding.round.trim(),
            tier.points,
            date,
            weight
        ),
    )
}

fn technographic(lead: &LeadRecord, rules: &CompiledRules) -> (u32, String) {
    let description = match lead.company_description.as_deref() {
        Some(d) if !d.trim().is_empty() => d,
        _ => return (0, "no company description".to_string()),
    };
    let found = rules.tech_keywords.find(Some(description));
    if found.matched {
        (
            Criterion::Technographic.max_points(),
            format!("description mentions {}", found.describe()),
        )
    } else {
        (0, "no technology keywords in description".to_string())
    }
}

fn location(lead: &LeadRecord, rules: &CompiledRules) -> (u32, String) {
    match rules.identify_hub(lead) {
        Some((hub, candidate)) => (hub.points, format!("'{}' is in {}", candidate, hub.name)),
        None if lead.location_candidates().is_empty() => (0, "no location".to_string()),
        None => (0, "not in a biotech hub".to_string()),
    }
}

fn scientific_intent(lead: &LeadRecord, rules: &CompiledRules) -> (u32, String) {
    if lead.publications.is_empty() {
        return (0, "no publications".to_string());
    }

    let mut matching = 0usize;
    let mut raw = 0.0_f64;
    for publication in &lead.publications {
        let text = publication.searchable_text();
        if !rules.science_keywords.find(Some(text.as_str())).matched {
            continue;
        }
        matching += 1;
        let weight = rules
            .decay
            .weight_of(publication.date.as_deref(), rules.reference_date);
        raw += rules.points_per_publication as f64 * weight;
    }

    let max = Criterion::ScientificIntent.max_points();
    let points = (raw.round() as u32).min(max);
    (
        points,
        format!(
            "{} of {} publications match, {:.1} weighted pts (cap {})",
            matching,
            lead.publications.len(),
            raw,
            max
        ),
    )
}
