/// A LinkedIn-style location split into the person's location and, when
/// present, the company headquarters ("Boston, MA · Cambridge, MA").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationParts<'a> {
    pub person: &'a str,
    pub company_hq: Option<&'a str>,
}

const SEPARATORS: [char; 2] = ['·', '•'];

const REMOTE_KEYWORDS: [&str; 4] = ["remote", "work from home", "wfh", "distributed"];

impl<'a> LocationParts<'a> {
    /// Only the first two segments are used; anything after a second
    /// separator is ignored.
    pub fn parse(raw: &'a str) -> Self {
        let mut segments = raw.split(SEPARATORS).map(str::trim);
        let person = segments.next().unwrap_or_default();
        let company_hq = segments.next().filter(|hq| !hq.is_empty());
        Self { person, company_hq }
    }
}

/// Lowercase, trim and drop a trailing "area"/"region" qualifier.
pub fn normalize_location(location: &str) -> String {
    let mut normalized = location.trim().to_lowercase();
    for suffix in ["area", "region"] {
        if let Some(stripped) = normalized.strip_suffix(suffix) {
            normalized = stripped.trim_end().trim_end_matches(',').trim_end().to_string();
            break;
        }
    }
    normalized
}

pub fn is_remote(location: &str) -> bool {
    let normalized = normalize_location(location);
    REMOTE_KEYWORDS.iter().any(|kw| normalized.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_location() {
        let parts = LocationParts::parse(" Cambridge, MA ");
        assert_eq!(parts.person, "Cambridge, MA");
        assert_eq!(parts.company_hq, None);
    }

    #[test]
    fn test_parse_dot_separator() {
        let parts = LocationParts::parse("Boston, MA · South San Francisco, CA");
        assert_eq!(parts.person, "Boston, MA");
        assert_eq!(parts.company_hq, Some("South San Francisco, CA"));
    }

    #[test]
    fn test_parse_bullet_separator_empty_hq() {
        let parts = LocationParts::parse("Basel •  ");
        assert_eq!(parts.person, "Basel");
        assert_eq!(parts.company_hq, None);
    }

    #[test]
    fn test_parse_ignores_segments_after_hq() {
        let parts = LocationParts::parse("Boston, MA · Basel, Switzerland • Remote");
        assert_eq!(parts.person, "Boston, MA");
        assert_eq!(parts.company_hq, Some("Basel, Switzerland"));
    }

    #[test]
    fn test_normalize_strips_area_suffix() {
        assert_eq!(normalize_location("Greater Boston Area"), "greater boston");
        assert_eq!(normalize_location("San Francisco Bay, Region"), "san francisco bay");
        assert_eq!(normalize_location("Basel"), "basel");
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("Remote, US"));
        assert!(is_remote("Work From Home"));
        assert!(!is_remote("Cambridge, MA"));
    }
}
