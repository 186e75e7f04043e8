use serde::{Deserialize, Serialize};

use super::location::LocationParts;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FundingEvent {
    pub round: String,          // "Series B", "IPO", ...
    pub date: Option<String>,   // ISO date, kept raw so bad values degrade to no signal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PublicationEvent {
    pub title: String,
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
}

impl PublicationEvent {
    /// Text the scientific-intent keywords are matched against. The journal
    /// is left out so a journal name never makes a paper relevant on its own.
    pub fn searchable_text(&self) -> String {
        match self.abstract_text.as_deref() {
            Some(abstract_text) => format!("{} {}", self.title, abstract_text),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LeadRecord {
    pub name: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_hq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding: Option<FundingEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<PublicationEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

impl LeadRecord {
    /// Composite identity used for deduplication: normalized name + company.
    pub fn identity_key(&self) -> (String, String) {
        (
            self.name.trim().to_lowercase(),
            self.company.trim().to_lowercase(),
        )
    }

    /// Locations to try for hub matching, most authoritative first.
    pub fn location_candidates(&self) -> Vec<&str> {
        let parts = LocationParts::parse(&self.location);
        let mut candidates = Vec::new();
        if let Some(hq) = self.company_hq.as_deref() {
            candidates.push(hq);
        }
        if let Some(hq) = parts.company_hq {
            candidates.push(hq);
        }
        candidates.push(parts.person);
        candidates.retain(|c| !c.trim().is_empty());
        candidates
    }

    /// Every raw date string on the record with a label for reporting.
    pub fn dated_fields(&self) -> Vec<(String, Option<&str>)> {
        let mut fields = Vec::new();
        if let Some(funding) = &self.funding {
            fields.push(("funding.date".to_string(), funding.date.as_deref()));
        }
        for (i, publication) in self.publications.iter().enumerate() {
            fields.push((format!("publications[{}].date", i), publication.date.as_deref()));
        }
        fields
    }
}
