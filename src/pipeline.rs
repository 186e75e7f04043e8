use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::leads::LeadRecord;
use crate::scoring::{parse_event_date, ScoreAggregator, ScoreBreakdown, Tier};

/// A lead with its score, in batch order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLead {
    /// 1-based position in the ranked batch
    pub rank: usize,
    /// Position in the input sequence
    pub input_index: usize,
    pub lead: LeadRecord,
    pub breakdown: ScoreBreakdown,
    pub tier: Tier,
    pub hub: Option<String>,
}

impl ScoredLead {
    pub fn total(&self) -> u32 {
        self.breakdown.total
    }
}

/// Non-fatal problems found while processing a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeadIssue {
    /// Missing name or title; the record was left out of the batch
    ValidationSkip { index: usize, reason: String },
    /// Same identity as an earlier record, which was kept instead
    DuplicateIdentity {
        index: usize,
        kept_index: usize,
        key: String,
    },
    /// An event date that could not be parsed; the event counts as no signal
    MalformedDate {
        index: usize,
        field: String,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub input: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub output: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadBatch {
    pub leads: Vec<ScoredLead>,
    pub summary: RunSummary,
    pub issues: Vec<LeadIssue>,
}

impl LeadBatch {
    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    /// Lead at a 1-based rank.
    pub fn by_rank(&self, rank: usize) -> Option<&ScoredLead> {
        rank.checked_sub(1).and_then(|i| self.leads.get(i))
    }

    /// The input records that made it into the batch, in ranked order.
    pub fn records(&self) -> Vec<LeadRecord> {
        self.leads.iter().map(|s| s.lead.clone()).collect()
    }
}

pub struct LeadPipeline {
    aggregator: ScoreAggregator,
    parallel: bool,
}

impl LeadPipeline {
    pub fn new(aggregator: ScoreAggregator) -> Self {
        Self {
            aggregator,
            parallel: true,
        }
    }

    /// Score on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn aggregator(&self) -> &ScoreAggregator {
        &self.aggregator
    }

    /// Validate, deduplicate, score and rank a batch of leads.
    ///
    /// Bad records are reported in `issues` and never stop the batch. The
    /// result is ordered by total descending, ties kept in input order.
    pub fn process(&self, leads: Vec<LeadRecord>) -> LeadBatch {
        let mut summary = RunSummary {
            input: leads.len(),
            ..Default::default()
        };
        let mut issues = Vec::new();
        let mut first_seen: HashMap<(String, String), usize> = HashMap::new();
        let mut survivors: Vec<(usize, LeadRecord)> = Vec::with_capacity(leads.len());

        for (index, lead) in leads.into_iter().enumerate() {
            if let Some(reason) = missing_identity(&lead) {
                tracing::debug!(index, %reason, "skipping lead");
                summary.skipped += 1;
                issues.push(LeadIssue::ValidationSkip { index, reason });
                continue;
            }

            let identity = lead.identity_key();
            if let Some(&kept_index) = first_seen.get(&identity) {
                let key = format!("{} | {}", identity.0, identity.1);
                tracing::debug!(index, kept_index, %key, "duplicate lead");
                summary.duplicates += 1;
                issues.push(LeadIssue::DuplicateIdentity {
                    index,
                    kept_index,
                    key,
                });
                continue;
            }
            first_seen.insert(identity, index);

            for (field, value) in lead.dated_fields() {
                if let Some(raw) = value {
                    if parse_event_date(raw).is_none() {
                        tracing::debug!(index, %field, value = raw, "malformed date");
                        issues.push(LeadIssue::MalformedDate {
                            index,
                            field,
                            value: raw.to_string(),
                        });
                    }
                }
            }

            survivors.push((index, lead));
        }

        let score_one = |(input_index, lead): (usize, LeadRecord)| {
            let result = self.aggregator.score(&lead);
            ScoredLead {
                rank: 0,
                input_index,
                lead,
                breakdown: result.breakdown,
                tier: result.tier,
                hub: result.hub,
            }
        };

        // Indexed parallel collect keeps input order.
        let mut scored: Vec<ScoredLead> = if self.parallel {
            survivors.into_par_iter().map(score_one).collect()
        } else {
            survivors.into_iter().map(score_one).collect()
        };

        sort_ranked(&mut scored);
        summary.output = scored.len();

        tracing::info!(
            input = summary.input,
            skipped = summary.skipped,
            duplicates = summary.duplicates,
            output = summary.output,
            "processed lead batch"
        );

        LeadBatch {
            leads: scored,
            summary,
            issues,
        }
    }
}

/// Sort by total descending with input order breaking ties, then number
/// the ranks from 1.
pub fn sort_ranked(leads: &mut [ScoredLead]) {
    leads.sort_by(|a, b| {
        b.total()
            .cmp(&a.total())
            .then_with(|| a.input_index.cmp(&b.input_index))
    });
    for (i, lead) in leads.iter_mut().enumerate() {
        lead.rank = i + 1;
    }
}

fn missing_identity(lead: &LeadRecord) -> Option<String> {
    match (lead.name.trim().is_empty(), lead.title.trim().is_empty()) {
        (true, true) => Some("missing name and title".to_string()),
        (true, false) => Some("missing name".to_string()),
        (false, true) => Some("missing title".to_string()),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::{FundingEvent, PublicationEvent};
    use crate::scoring::ScoringConfig;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn pipeline() -> LeadPipeline {
        LeadPipeline::new(ScoreAggregator::new(&ScoringConfig::default(), today()).unwrap())
    }

    fn lead(name: &str, title: &str, company: &str, location: &str) -> LeadRecord {
        LeadRecord {
            name: name.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_skips_records_without_name_or_title() {
        let batch = pipeline().process(vec![
            lead("", "Head of Safety", "Acme", ""),
            lead("Jane", "  ", "Acme", ""),
            lead("John", "Head of Safety", "Acme", ""),
        ]);
        assert_eq!(
            batch.summary,
            RunSummary {
                input: 3,
                skipped: 2,
                duplicates: 0,
                output: 1,
            }
        );
        assert_eq!(
            batch.issues[0],
            LeadIssue::ValidationSkip {
                index: 0,
                reason: "missing name".to_string(),
            }
        );
        assert_eq!(
            batch.issues[1],
            LeadIssue::ValidationSkip {
                index: 1,
                reason: "missing title".to_string(),
            }
        );
        assert_eq!(batch.leads[0].lead.name, "John");
    }

    #[test]
    fn test_dedup_keeps_first_and_reports() {
        let mut second = lead("JANE DOE ", "Director of Toxicology", "acme", "Boston");
        second.company_description = Some("organoid".to_string());
        let batch = pipeline().process(vec![
            lead("Jane Doe", "Scientist", "Acme", ""),
            second,
            lead("Jane Doe", "Scientist", "Other Co", ""),
        ]);
        assert_eq!(batch.summary.duplicates, 1);
        assert_eq!(batch.summary.output, 2);
        assert_eq!(
            batch.issues,
            vec![LeadIssue::DuplicateIdentity {
                index: 1,
                kept_index: 0,
                key: "jane doe | acme".to_string(),
            }]
        );
        // The kept record is the first one, not the higher-scoring duplicate
        assert!(batch.leads.iter().all(|s| s.lead.title == "Scientist"));
    }

    #[test]
    fn test_dedup_does_not_merge_across_name_and_company() {
        let batch = pipeline().process(vec![
            lead("a|b", "Scientist", "c", ""),
            lead("a", "Scientist", "b|c", ""),
        ]);
        assert_eq!(
            batch.summary,
            RunSummary {
                input: 2,
                skipped: 0,
                duplicates: 0,
                output: 2,
            }
        );
        assert!(batch.issues.is_empty());
    }

    #[test]
    fn test_ranking_ties_keep_input_order() {
        let funded = |name: &str, round: &str| {
            let mut l = lead(name, "Head of Safety", name, "");
            l.company_description = Some("organoid".to_string());
            l.funding = Some(FundingEvent {
                round: round.to_string(),
                date: Some("2025-06-15".to_string()),
                amount: None,
            });
            l
        };
        // A and B: 30 + 20 + 15 = 65, C: 30 + 10 + 15 = 55
        let batch = pipeline().process(vec![
            funded("C", "Series A"),
            funded("A", "Series D"),
            funded("B", "IPO"),
        ]);
        let totals: Vec<u32> = batch.leads.iter().map(|s| s.total()).collect();
        let names: Vec<&str> = batch.leads.iter().map(|s| s.lead.name.as_str()).collect();
        assert_eq!(totals, vec![65, 65, 55]);
        assert_eq!(names, vec!["A", "B", "C"]);
        let ranks: Vec<usize> = batch.leads.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_ranked_tie_break() {
        let agg = ScoreAggregator::new(&ScoringConfig::default(), today()).unwrap();
        let make = |name: &str, input_index: usize, total: u32| {
            let l = lead(name, "t", "c", "");
            let mut breakdown = agg.aggregate(&l);
            breakdown.total = total;
            ScoredLead {
                rank: 0,
                input_index,
                lead: l,
                breakdown,
                tier: Tier::Cold,
                hub: None,
            }
        };
        let mut leads = vec![make("C", 0, 60), make("A", 1, 80), make("B", 2, 80)];
        sort_ranked(&mut leads);
        let names: Vec<&str> = leads.iter().map(|s| s.lead.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(leads[2].rank, 3);
    }

    #[test]
    fn test_malformed_dates_reported_not_fatal() {
        let mut l = lead("Jane", "Head of Safety", "Acme", "Boston");
        l.funding = Some(FundingEvent {
            round: "Series B".to_string(),
            date: Some("Q3 2024".to_string()),
            amount: None,
        });
        l.publications = vec![PublicationEvent {
            title: "DILI".to_string(),
            date: Some("yesterday".to_string()),
            journal: None,
            abstract_text: None,
        }];
        let batch = pipeline().process(vec![l]);
        assert_eq!(batch.summary.output, 1);
        assert_eq!(batch.issues.len(), 2);
        assert!(matches!(
            &batch.issues[0],
            LeadIssue::MalformedDate { field, .. } if field == "funding.date"
        ));
        assert!(matches!(
            &batch.issues[1],
            LeadIssue::MalformedDate { field, value, .. }
                if field == "publications[0].date" && value == "yesterday"
        ));
        assert_eq!(batch.leads[0].total(), 40);
    }

    #[test]
    fn test_reprocessing_is_idempotent() {
        let p = pipeline();
        let first = p.process(vec![
            lead("Jane", "Head of Safety", "Acme", "Boston"),
            lead("jane", "Scientist", "ACME", ""),
            lead("", "Scientist", "Acme", ""),
            lead("John", "Scientist", "Beta", "Basel"),
        ]);
        assert_eq!(first.summary.skipped, 1);
        assert_eq!(first.summary.duplicates, 1);

        let second = p.process(first.records());
        assert_eq!(second.summary.skipped, 0);
        assert_eq!(second.summary.duplicates, 0);
        assert_eq!(second.summary.output, first.summary.output);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let leads: Vec<LeadRecord> = (0..50)
            .map(|i| {
                let title = if i % 3 == 0 { "Head of Safety" } else { "Scientist" };
                let location = if i % 2 == 0 { "Boston" } else { "Austin" };
                lead(&format!("Lead {}", i), title, "Acme", location)
            })
            .collect();
        let parallel = pipeline().process(leads.clone());
        let sequential = pipeline().sequential().process(leads);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_empty_batch() {
        let batch = pipeline().process(Vec::new());
        assert!(batch.is_empty());
        assert_eq!(batch.summary, RunSummary::default());
        assert!(batch.by_rank(1).is_none());
    }

    #[test]
    fn test_by_rank() {
        let batch = pipeline().process(vec![
            lead("Low", "Scientist", "Acme", ""),
            lead("High", "Head of Safety", "Acme", "Boston"),
        ]);
        assert_eq!(batch.by_rank(1).unwrap().lead.name, "High");
        assert_eq!(batch.by_rank(2).unwrap().lead.name, "Low");
        assert!(batch.by_rank(0).is_none());
        assert!(batch.by_rank(3).is_none());
    }

    #[test]
    fn test_demo_leads() {
        let parsed = crate::leads::parse_leads(
            include_str!("../demos/leads.json"),
            crate::leads::LeadFormat::Json,
        )
        .unwrap();
        assert!(parsed.rejected.is_empty());

        let batch = pipeline().process(parsed.records);
        assert_eq!(
            batch.summary,
            RunSummary {
                input: 8,
                skipped: 1,
                duplicates: 1,
                output: 6,
            }
        );
        let malformed = batch
            .issues
            .iter()
            .filter(|i| matches!(i, LeadIssue::MalformedDate { .. }))
            .count();
        assert_eq!(malformed, 1);

        let top = batch.by_rank(1).unwrap();
        assert_eq!(top.lead.name, "Dr. Jane Smith");
        assert_eq!(top.tier, Tier::Hot);
        assert_eq!(top.hub.as_deref(), Some("Boston/Cambridge"));
        assert_eq!(batch.leads.last().unwrap().lead.name, "John Doe");
        assert!(batch.leads.windows(2).all(|w| w[0].total() >= w[1].total()));
    }
}
