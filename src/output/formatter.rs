use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::leads::is_remote;
use crate::pipeline::{LeadIssue, RunSummary, ScoredLead};
use crate::scoring::{Criterion, Tier};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn colored_tier(tier: Tier, padded: &str) -> String {
    match tier {
        Tier::Hot => padded.red().bold().to_string(),
        Tier::Warm => padded.yellow().to_string(),
        Tier::Cold => padded.blue().dimmed().to_string(),
    }
}

/// Format leads as a ranked table: rank, score, tier, name, title, company, hub.
/// No headers; the lead column is truncated to the terminal width.
pub fn format_ranked_table(leads: &[ScoredLead], use_colors: bool) -> String {
    if leads.is_empty() {
        return "No leads found.".to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 4;
    let score_width = 3;
    let tier_width = 4;
    let separator = "  ";

    leads
        .iter()
        .map(|scored| {
            let rank_str = format!("{:>3}.", scored.rank);
            let score_str = format!("{:>width$}", scored.total(), width = score_width);
            let tier_str = format!("{:<width$}", scored.tier.to_string(), width = tier_width);
            let hub = scored.hub.as_deref().unwrap_or("-");

            let lead = &scored.lead;
            let who = format!(
                "{} | {} | {}",
                lead.name.trim(),
                lead.title.trim(),
                lead.company.trim()
            );
            let fixed_width = rank_width
                + 1
                + score_width
                + tier_width
                + separator.len() * 3
                + hub.chars().count();
            let who = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(&who, width - fixed_width),
                Some(_) => truncate(&who, 20),
                None => who,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    rank_str.dimmed(),
                    score_str.bold(),
                    separator,
                    colored_tier(scored.tier, &tier_str),
                    separator,
                    who,
                    separator,
                    hub.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    rank_str, score_str, separator, tier_str, separator, who, separator, hub
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format leads as tab-separated values with a header row, one column per criterion.
pub fn format_tsv(leads: &[ScoredLead]) -> String {
    let mut header = vec![
        "rank",
        "total",
        "tier",
        "name",
        "title",
        "company",
        "location",
        "company_hq",
        "email",
        "linkedin",
        "hub",
    ];
    header.extend(Criterion::ALL.iter().map(|c| c.key()));

    let mut lines = vec![header.join("\t")];
    for scored in leads {
        let lead = &scored.lead;
        let mut row = vec![
            scored.rank.to_string(),
            scored.total().to_string(),
            scored.tier.to_string(),
            tsv_field(&lead.name),
            tsv_field(&lead.title),
            tsv_field(&lead.company),
            tsv_field(&lead.location),
            tsv_field(lead.company_hq.as_deref().unwrap_or_default()),
            tsv_field(lead.email.as_deref().unwrap_or_default()),
            tsv_field(lead.linkedin.as_deref().unwrap_or_default()),
            scored.hub.clone().unwrap_or_default(),
        ];
        row.extend(
            Criterion::ALL
                .iter()
                .map(|c| scored.breakdown.points(*c).to_string()),
        );
        lines.push(row.join("\t"));
    }
    lines.join("\n")
}

fn tsv_field(value: &str) -> String {
    value.trim().replace(['\t', '\n', '\r'], " ")
}

pub fn format_json(leads: &[ScoredLead]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(leads)?)
}

/// Multi-line view of one lead with per-criterion points and rationale.
pub fn format_lead_detail(scored: &ScoredLead, use_colors: bool) -> String {
    let lead = &scored.lead;
    let mut lines = Vec::new();

    let heading = format!("#{} {} ({})", scored.rank, lead.name.trim(), lead.title.trim());
    lines.push(if use_colors {
        heading.bold().to_string()
    } else {
        heading
    });
    lines.push(format!("  Company: {}", lead.company.trim()));
    let mut location = lead.location.trim().to_string();
    if is_remote(&location) {
        location.push_str(" (remote)");
    }
    lines.push(format!("  Location: {}", location));
    if let Some(hub) = &scored.hub {
        lines.push(format!("  Biotech hub: {}", hub));
    }
    if let Some(email) = &lead.email {
        lines.push(format!("  Email: {}", email));
    }
    if let Some(linkedin) = &lead.linkedin {
        lines.push(format!("  LinkedIn: {}", linkedin));
    }
    lines.push(String::new());

    for score in &scored.breakdown.criteria {
        let points = format!("{:>2}/{:<2}", score.points, score.max_points);
        let name = format!("{:<18}", score.criterion.name());
        if use_colors {
            lines.push(format!("  {} {}  {}", name, points.bold(), score.rationale.dimmed()));
        } else {
            lines.push(format!("  {} {}  {}", name, points, score.rationale));
        }
    }

    let raw = scored.breakdown.raw_sum();
    let total = if raw > scored.total() {
        format!("{}/100 (raw {})", scored.total(), raw)
    } else {
        format!("{}/100", scored.total())
    };
    let tier = scored.tier.to_string();
    if use_colors {
        lines.push(format!(
            "  {:<18} {}  {}",
            "Total",
            total.bold(),
            colored_tier(scored.tier, &tier)
        ));
    } else {
        lines.push(format!("  {:<18} {}  {}", "Total", total, tier));
    }

    lines.join("\n")
}

/// One-line run summary for stderr.
pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "{} leads in, {} skipped, {} duplicates, {} ranked",
        summary.input, summary.skipped, summary.duplicates, summary.output
    )
}

pub fn format_issue(issue: &LeadIssue) -> String {
    match issue {
        LeadIssue::ValidationSkip { index, reason } => {
            format!("lead {}: skipped ({})", index + 1, reason)
        }
        LeadIssue::DuplicateIdentity { index, kept_index, .. } => {
            format!("lead {}: duplicate of lead {}, dropped", index + 1, kept_index + 1)
        }
        LeadIssue::MalformedDate { index, field, value } => {
            format!("lead {}: unreadable {} '{}', treated as no signal", index + 1, field, value)
        }
    }
}
