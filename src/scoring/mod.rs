pub mod config;
pub mod criteria;
pub mod decay;
pub mod engine;
pub mod matcher;
pub mod validation;

pub use config::*;
pub use criteria::{CompiledRules, Criterion, CriterionScore};
pub use decay::{decay, parse_event_date, RecencyDecay};
pub use engine::{ScoreAggregator, ScoreBreakdown, ScoreResult, Tier};
pub use matcher::{KeywordMatch, KeywordSet};
pub use validation::validate_scoring;
