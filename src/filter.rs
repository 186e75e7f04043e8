use crate::pipeline::ScoredLead;
use crate::scoring::Tier;

/// View filters applied to a ranked batch before display or export.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub min_score: Option<u32>,
    pub tiers: Vec<Tier>,
    /// Hub names, matched case-insensitively
    pub hubs: Vec<String>,
    /// Free text matched against name, title and company
    pub search: Option<String>,
}

impl LeadFilter {
    pub fn is_empty(&self) -> bool {
        self.min_score.is_none()
            && self.tiers.is_empty()
            && self.hubs.is_empty()
            && self.search.as_deref().map_or(true, |s| s.trim().is_empty())
    }

    pub fn matches(&self, scored: &ScoredLead) -> bool {
        if let Some(min) = self.min_score {
            if scored.total() < min {
                return false;
            }
        }

        if !self.tiers.is_empty() && !self.tiers.contains(&scored.tier) {
            return false;
        }

        if !self.hubs.is_empty() {
            let in_hub = scored.hub.as_deref().is_some_and(|hub| {
                self.hubs.iter().any(|wanted| wanted.trim().eq_ignore_ascii_case(hub))
            });
            if !in_hub {
                return false;
            }
        }

        if let Some(query) = self.search.as_deref() {
            let query = query.trim().to_lowercase();
            if !query.is_empty() {
                let lead = &scored.lead;
                let found = [&lead.name, &lead.title, &lead.company]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query));
                if !found {
                    return false;
                }
            }
        }

        true
    }

    /// Keep matching leads in batch order and renumber their ranks from 1.
    pub fn apply(&self, leads: &[ScoredLead]) -> Vec<ScoredLead> {
        leads
            .iter()
            .filter(|s| self.matches(s))
            .cloned()
            .enumerate()
            .map(|(i, mut s)| {
                s.rank = i + 1;
                s
            })
            .collect()
    }
}
