//! Core data models used throughout matchdesk.
//!
//! These types represent the match request, the provider queries, and the
//! per-category analysis record that flow through the aggregation pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Separators recognized when splitting a raw match description into two
/// team names. Checked in order; the first one that yields two non-empty
/// sides wins.
const SEPARATORS: &[&str] = &[" versus ", " vs. ", " vs ", "-", "–"];

/// A parsed match request: home side and away side.
///
/// Parsing is intentionally forgiving about whitespace and separator casing
/// ("Dinamo VS UTA" works), but strict about the result: both team names
/// must be non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub home: String,
    pub away: String,
}

impl Matchup {
    /// Parse a raw user string like `"Rapid - FCSB"` or `"Dinamo vs UTA"`.
    ///
    /// Returns `None` when no recognized separator is present or when either
    /// side is empty after trimming.
    pub fn parse(raw: &str) -> Option<Matchup> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        // ASCII lowering keeps byte offsets valid for the original string.
        let lowered = trimmed.to_ascii_lowercase();

        for sep in SEPARATORS {
            if let Some(pos) = lowered.find(sep) {
                let home = trimmed[..pos].trim();
                let away = trimmed[pos + sep.len()..].trim();
                if !home.is_empty() && !away.is_empty() {
                    return Some(Matchup {
                        home: home.to_string(),
                        away: away.to_string(),
                    });
                }
            }
        }

        None
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.home, self.away)
    }
}

/// Fixed set of analysis categories. Every record carries all of them;
/// a category without data renders as an explicit placeholder, never as
/// a missing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    MatchInfo,
    Odds,
    Standings,
    HeadToHead,
    HomeForm,
    AwayForm,
    Predictions,
}

impl Category {
    /// Canonical iteration order, used by the record serialization and the
    /// prompt composer.
    pub const ALL: [Category; 7] = [
        Category::MatchInfo,
        Category::Odds,
        Category::Standings,
        Category::HeadToHead,
        Category::HomeForm,
        Category::AwayForm,
        Category::Predictions,
    ];

    /// Romanian section label, matching the product's prompt wording.
    pub fn label(&self) -> &'static str {
        match self {
            Category::MatchInfo => "Informatii meci",
            Category::Odds => "Cote si linii de pariere",
            Category::Standings => "Clasament",
            Category::HeadToHead => "H2H meciuri directe",
            Category::HomeForm => "Forma gazdelor",
            Category::AwayForm => "Forma oaspetilor",
            Category::Predictions => "Stiri si predictii externe",
        }
    }
}

/// External data providers a query can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Football,
    Search,
    SportsDb,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Football => "football",
            Provider::Search => "search",
            Provider::SportsDb => "sportsdb",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fan-out query: what to ask, which provider to ask, and which
/// category the answer primarily belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    pub id: String,
    pub text: String,
    pub provider: Provider,
    pub category: Category,
}

/// A single piece of data returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub title: Option<String>,
    pub text: String,
    /// Human-readable origin, e.g. `"search:serpapi"`.
    pub source: String,
}

impl Snippet {
    /// Render the snippet as one record entry line.
    pub fn render(&self) -> String {
        match &self.title {
            Some(title) => format!("{}: {} (sursa: {})", title, self.text, self.source),
            None => format!("{} (sursa: {})", self.text, self.source),
        }
    }
}

/// Outcome of one gateway call. Absence of data is a modeled value, not an
/// error path: a gateway never raises past its boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Success { snippets: Vec<Snippet> },
    Unavailable { reason: String },
}

impl SourceOutcome {
    pub fn unavailable(reason: impl Into<String>) -> SourceOutcome {
        SourceOutcome::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SourceOutcome::Success { .. })
    }
}

/// Placeholder rendered for a category that collected no data.
pub const UNAVAILABLE_MARKER: &str = "date indisponibile pentru aceasta categorie";

/// Category-keyed accumulation of match information gathered during one
/// pipeline run. Grows only; every category is always present when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRecord {
    sections: BTreeMap<Category, Vec<String>>,
}

impl AnalysisRecord {
    pub fn new() -> AnalysisRecord {
        AnalysisRecord::default()
    }

    /// Append one entry to a category bucket.
    pub fn push(&mut self, category: Category, entry: String) {
        self.sections.entry(category).or_default().push(entry);
    }

    /// Entries collected for a category, possibly empty.
    pub fn entries(&self, category: Category) -> &[String] {
        self.sections
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self, category: Category) -> bool {
        self.entries(category).is_empty()
    }

    /// Render one category as prompt-ready text: either the collected
    /// entries, one per line, or the explicit unavailable marker.
    pub fn render_section(&self, category: Category) -> String {
        let entries = self.entries(category);
        if entries.is_empty() {
            UNAVAILABLE_MARKER.to_string()
        } else {
            entries.join("\n")
        }
    }
}

/// A single-shot request to the text-generation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dash() {
        let m = Matchup::parse("Rapid - FCSB").unwrap();
        assert_eq!(m.home, "Rapid");
        assert_eq!(m.away, "FCSB");
    }

    #[test]
    fn test_parse_vs_word() {
        let m = Matchup::parse("Dinamo vs UTA").unwrap();
        assert_eq!(m.home, "Dinamo");
        assert_eq!(m.away, "UTA");
    }

    #[test]
    fn test_parse_vs_case_insensitive() {
        let m = Matchup::parse("Dinamo VS UTA").unwrap();
        assert_eq!(m.home, "Dinamo");
        assert_eq!(m.away, "UTA");

        let m = Matchup::parse("Farul Versus Sepsi").unwrap();
        assert_eq!(m.home, "Farul");
        assert_eq!(m.away, "Sepsi");
    }

    #[test]
    fn test_parse_en_dash() {
        let m = Matchup::parse("Rapid – FCSB").unwrap();
        assert_eq!(m.home, "Rapid");
        assert_eq!(m.away, "FCSB");
    }

    #[test]
    fn test_parse_multiword_teams() {
        let m = Matchup::parse("Universitatea Craiova vs CFR Cluj").unwrap();
        assert_eq!(m.home, "Universitatea Craiova");
        assert_eq!(m.away, "CFR Cluj");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(Matchup::parse("").is_none());
        assert!(Matchup::parse("   ").is_none());
    }

    #[test]
    fn test_parse_rejects_single_token() {
        assert!(Matchup::parse("Rapid").is_none());
        assert!(Matchup::parse("Rapid - ").is_none());
        assert!(Matchup::parse(" - FCSB").is_none());
    }

    #[test]
    fn test_record_placeholder_for_empty_category() {
        let record = AnalysisRecord::new();
        assert_eq!(record.render_section(Category::Odds), UNAVAILABLE_MARKER);
    }

    #[test]
    fn test_record_accumulates() {
        let mut record = AnalysisRecord::new();
        record.push(Category::Odds, "1X2: 2.10 / 3.30 / 3.50".to_string());
        record.push(Category::Odds, "BTTS: da 1.85".to_string());
        assert_eq!(record.entries(Category::Odds).len(), 2);
        assert!(record.render_section(Category::Odds).contains("BTTS"));
        // other categories stay present-but-empty
        assert!(record.is_empty(Category::Standings));
    }

    #[test]
    fn test_snippet_render() {
        let s = Snippet {
            title: Some("Forebet".to_string()),
            text: "Rapid 45% sanse".to_string(),
            source: "search:serpapi".to_string(),
        };
        assert_eq!(s.render(), "Forebet: Rapid 45% sanse (sursa: search:serpapi)");
    }
}
