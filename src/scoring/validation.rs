use super::config::ScoringConfig;
use super::criteria::Criterion;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    check_keywords("scoring.role_fit.keywords", &config.role_fit.keywords, &mut errors);
    check_keywords(
        "scoring.technographic.keywords",
        &config.technographic.keywords,
        &mut errors,
    );
    check_keywords(
        "scoring.scientific_intent.keywords",
        &config.scientific_intent.keywords,
        &mut errors,
    );

    // Funding point table
    let company_max = Criterion::CompanyIntent.max_points();
    for (i, row) in config.company_intent.rounds.iter().enumerate() {
        if row.round.trim().is_empty() {
            errors.push(format!("scoring.company_intent.rounds[{}].round: must not be blank", i));
        }
        if row.points > company_max {
            errors.push(format!(
                "scoring.company_intent.rounds[{}].points: {} exceeds maximum {}",
                i, row.points, company_max
            ));
        }
    }

    // Biotech hubs
    let location_max = Criterion::Location.max_points();
    for (i, hub) in config.location.hubs.iter().enumerate() {
        if hub.name.trim().is_empty() {
            errors.push(format!("scoring.location.hubs[{}].name: must not be blank", i));
        }
        if hub.aliases.iter().all(|a| a.trim().is_empty()) {
            errors.push(format!(
                "scoring.location.hubs[{}].aliases: at least one alias is required",
                i
            ));
        }
        if let Some(points) = hub.points {
            if points > location_max {
                errors.push(format!(
                    "scoring.location.hubs[{}].points: {} exceeds maximum {}",
                    i, points, location_max
                ));
            }
        }
    }

    let science_max = Criterion::ScientificIntent.max_points();
    if config.scientific_intent.points_per_publication > science_max {
        errors.push(format!(
            "scoring.scientific_intent.points_per_publication: {} exceeds maximum {}",
            config.scientific_intent.points_per_publication, science_max
        ));
    }

    // Recency durations
    match humantime::parse_duration(config.recency.half_life.trim()) {
        Ok(d) if d.is_zero() => {
            errors.push("scoring.recency.half_life: must be greater than zero".to_string())
        }
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "scoring.recency.half_life: invalid duration '{}' - {}",
            config.recency.half_life, e
        )),
    }
    if let Err(e) = humantime::parse_duration(config.recency.cutoff.trim()) {
        errors.push(format!(
            "scoring.recency.cutoff: invalid duration '{}' - {}",
            config.recency.cutoff, e
        ));
    }

    // Tier thresholds
    let tiers = &config.tiers;
    if tiers.warm > tiers.hot {
        errors.push(format!(
            "scoring.tiers: warm ({}) must not exceed hot ({})",
            tiers.warm, tiers.hot
        ));
    }
    if tiers.hot > 100 {
        errors.push(format!("scoring.tiers.hot: {} exceeds maximum total 100", tiers.hot));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_keywords(path: &str, keywords: &[String], errors: &mut Vec<String>) {
    for (i, keyword) in keywords.iter().enumerate() {
        if keyword.trim().is_empty() {
            errors.push(format!("{}[{}]: must not be blank", path, i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{HubConfig, RoundPoints, TierThresholds};

    #[test]
    fn test_default_config_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_keyword_lists_are_valid() {
        let mut config = ScoringConfig::default();
        config.role_fit.keywords.clear();
        config.location.hubs.clear();
        config.company_intent.rounds.clear();
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_blank_keyword() {
        let mut config = ScoringConfig::default();
        config.technographic.keywords = vec!["organoid".to_string(), " ".to_string()];
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors, vec!["scoring.technographic.keywords[1]: must not be blank"]);
    }

    #[test]
    fn test_round_points_over_max() {
        let mut config = ScoringConfig::default();
        config.company_intent.rounds = vec![RoundPoints {
            round: "ipo".to_string(),
            points: 25,
        }];
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.company_intent.rounds[0].points"));
    }

    #[test]
    fn test_hub_without_aliases() {
        let mut config = ScoringConfig::default();
        config.location.hubs = vec![HubConfig {
            name: "Nowhere".to_string(),
            aliases: vec!["".to_string()],
            points: Some(11),
        }];
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("aliases"));
        assert!(errors[1].contains("points"));
    }

    #[test]
    fn test_invalid_durations() {
        let mut config = ScoringConfig::default();
        config.recency.half_life = "0s".to_string();
        config.recency.cutoff = "forever".to_string();
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("half_life"));
        assert!(errors[1].contains("cutoff"));
    }

    #[test]
    fn test_tier_order() {
        let mut config = ScoringConfig::default();
        config.tiers = TierThresholds { hot: 120, warm: 130 };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ScoringConfig::default();
        config.role_fit.keywords = vec!["".to_string()];
        config.scientific_intent.points_per_publication = 50;
        config.recency.half_life = "bad".to_string();
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
