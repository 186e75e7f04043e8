use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Every table the criteria consult lives here so the engine can be tuned
/// without code changes. Omitted sections fall back to the defaults below.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   role_fit:
///     keywords: ["director of toxicology", "head of safety"]
///   company_intent:
///     rounds:
///       - { round: "series b", points: 15 }
///   recency:
///     half_life: 12months
///     cutoff: 36months
///   tiers:
///     hot: 70
///     warm: 40
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ScoringConfig {
    pub role_fit: KeywordCriterionConfig,
    pub company_intent: CompanyIntentConfig,
    pub technographic: KeywordCriterionConfig,
    pub location: LocationConfig,
    pub scientific_intent: ScientificIntentConfig,
    pub recency: RecencyConfig,
    pub tiers: TierThresholds,
}

/// A criterion that awards its full points when any keyword matches.
///
/// Defaults depend on which criterion owns it, so `ScoringConfig::default`
/// fills them in; an empty list means the criterion never matches.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeywordCriterionConfig {
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoundPoints {
    /// Matched case-insensitively as a substring of the funding round label
    pub round: String,
    pub points: u32,
}

/// Funding round point table. First matching row wins, so list specific
/// labels ("series c") before broad ones ("series").
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CompanyIntentConfig {
    pub rounds: Vec<RoundPoints>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    pub name: String,
    /// Substrings that identify the hub in a location string
    pub aliases: Vec<String>,
    /// Bonus for this hub; the criterion maximum when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LocationConfig {
    pub hubs: Vec<HubConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScientificIntentConfig {
    pub keywords: Vec<String>,
    /// Points a matching publication earns at full recency weight
    pub points_per_publication: u32,
}

/// Recency decay settings, as humantime durations ("12months", "2years").
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RecencyConfig {
    pub half_life: String,
    pub cutoff: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TierThresholds {
    pub hot: u32,
    pub warm: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            role_fit: KeywordCriterionConfig::default_role_fit(),
            company_intent: CompanyIntentConfig::default(),
            technographic: KeywordCriterionConfig::default_technographic(),
            location: LocationConfig::default(),
            scientific_intent: ScientificIntentConfig::default(),
            recency: RecencyConfig::default(),
            tiers: TierThresholds::default(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl KeywordCriterionConfig {
    pub fn default_role_fit() -> Self {
        Self {
            keywords: strings(&[
                "director of toxicology",
                "head of toxicology",
                "head of safety",
                "director of safety",
                "director safety",
                "vp of safety",
                "vp safety",
                "vice president of safety",
                "head of preclinical",
                "director of preclinical",
                "head of hepatic safety",
                "toxicology lead",
                "chief scientific officer",
            ]),
        }
    }

    pub fn default_technographic() -> Self {
        Self {
            keywords: strings(&[
                "in vitro",
                "in-vitro",
                "3d model",
                "3d cell culture",
                "3d hepatic",
                "organoid",
                "spheroid",
                "organ-on-chip",
                "microphysiological",
            ]),
        }
    }
}

impl Default for CompanyIntentConfig {
    fn default() -> Self {
        let row = |round: &str, points| RoundPoints {
            round: round.to_string(),
            points,
        };
        Self {
            rounds: vec![
                row("series c", 20),
                row("series d", 20),
                row("ipo", 20),
                row("public", 20),
                row("series b", 15),
                row("series a", 10),
                row("seed", 5),
            ],
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        let hub = |name: &str, aliases: &[&str], points| HubConfig {
            name: name.to_string(),
            aliases: strings(aliases),
            points,
        };
        Self {
            hubs: vec![
                hub(
                    "Boston/Cambridge",
                    &[
                        "boston",
                        "cambridge, ma",
                        "cambridge ma",
                        "somerville",
                        "brookline",
                        "greater boston",
                    ],
                    None,
                ),
                hub(
                    "San Francisco Bay Area",
                    &[
                        "san francisco",
                        "south san francisco",
                        "bay area",
                        "san mateo",
                        "palo alto",
                        "menlo park",
                        "redwood city",
                        "oakland",
                        "berkeley",
                        "emeryville",
                    ],
                    None,
                ),
                hub("Basel", &["basel", "switzerland"], None),
                hub("San Diego", &["san diego", "la jolla", "sorrento valley"], Some(7)),
                hub(
                    "UK Golden Triangle",
                    &["cambridge, uk", "cambridge uk", "oxford", "london", "stevenage", "harwell"],
                    Some(7),
                ),
                hub(
                    "Research Triangle",
                    &[
                        "research triangle",
                        "durham",
                        "raleigh",
                        "chapel hill",
                        "north carolina",
                    ],
                    Some(7),
                ),
                hub("New Jersey", &["new jersey", "princeton", "newark"], Some(7)),
                hub("Seattle", &["seattle", "bellevue", "bothell"], Some(7)),
            ],
        }
    }
}

impl Default for ScientificIntentConfig {
    fn default() -> Self {
        Self {
            keywords: strings(&[
                "dili",
                "drug-induced liver injury",
                "hepatotoxicity",
                "liver toxicity",
                "3d model",
                "spheroid",
                "organoid",
                "hepatocyte",
                "liver model",
            ]),
            points_per_publication: 20,
        }
    }
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            half_life: "12months".to_string(),
            cutoff: "36months".to_string(),
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { hot: 70, warm: 40 }
    }
}
