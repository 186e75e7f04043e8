pub mod load;
pub mod location;
pub mod types;

pub use load::{load_leads, parse_leads, LeadFormat, ParsedLeads, RejectedItem};
pub use location::{is_remote, LocationParts};
pub use types::{FundingEvent, LeadRecord, PublicationEvent};
