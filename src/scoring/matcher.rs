use std::collections::BTreeSet;

/// A set of lowercase keywords matched by plain substring containment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    terms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordMatch {
    pub matched: bool,
    pub terms: BTreeSet<String>,
}

impl KeywordSet {
    /// Build from configured keywords. Blank entries are dropped and
    /// duplicates (after lowercasing) collapse to one term.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = Vec::new();
        for keyword in keywords {
            let term = keyword.as_ref().trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Case-insensitive substring match of every term against `text`.
    /// Missing or blank text never matches.
    pub fn find(&self, text: Option<&str>) -> KeywordMatch {
        let haystack = match text {
            Some(t) if !t.trim().is_empty() => t.to_lowercase(),
            _ => return KeywordMatch::default(),
        };

        let terms: BTreeSet<String> = self
            .terms
            .iter()
            .filter(|term| haystack.contains(term.as_str()))
            .cloned()
            .collect();

        KeywordMatch {
            matched: !terms.is_empty(),
            terms,
        }
    }
}

impl KeywordMatch {
    /// Matched terms quoted and comma-joined, for rationale strings.
    pub fn describe(&self) -> String {
        self.terms
            .iter()
            .map(|t| format!("'{}'", t))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
