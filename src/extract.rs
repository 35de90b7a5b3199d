//! Snippet classification into analysis categories.
//!
//! Routing is data, not nested conditionals: an ordered table of keyword
//! rules is evaluated against each snippet, and a snippet may land in more
//! than one bucket (recall over precision). Every successful snippet is
//! always kept in its originating query's category; keyword matches only
//! add buckets on top.

use crate::models::{AnalysisRecord, Category, Matchup, Snippet, SourceOutcome, SourceQuery};

pub struct RoutingRule {
    pub hints: &'static [&'static str],
    pub category: Category,
}

/// Keyword hints per category, Romanian first with the English variants the
/// search results mix in. Matched case-insensitively against snippet text.
pub const ROUTING_RULES: &[RoutingRule] = &[
    RoutingRule {
        hints: &["cota", "cote", "odds", "1x2"],
        category: Category::Odds,
    },
    RoutingRule {
        hints: &["clasament", "standings", "pozitia in liga"],
        category: Category::Standings,
    },
    RoutingRule {
        hints: &["h2h", "head-to-head", "meciuri directe", "intalniri directe"],
        category: Category::HeadToHead,
    },
    RoutingRule {
        hints: &["predictie", "predictii", "prediction", "pont", "ponturi"],
        category: Category::Predictions,
    },
];

/// Hints that mark a recent-form snippet. Form buckets are split per team,
/// so these route through [`form_categories`] rather than the plain rules.
pub const FORM_HINTS: &[&str] = &["ultimele", "forma", "recent form", "last 5"];

/// Merge per-query outcomes into one analysis record.
///
/// Unavailable outcomes contribute nothing; their categories surface
/// downstream as explicit placeholders. Pure function of its inputs, so
/// normalizing the same outcome set twice yields the same record.
pub fn normalize(
    outcomes: &[(SourceQuery, SourceOutcome)],
    matchup: &Matchup,
) -> AnalysisRecord {
    let mut record = AnalysisRecord::new();

    for (query, outcome) in outcomes {
        let SourceOutcome::Success { snippets } = outcome else {
            continue;
        };

        for snippet in snippets {
            let entry = snippet.render();
            record.push(query.category, entry.clone());

            for category in route_snippet(snippet, matchup) {
                if category != query.category {
                    record.push(category, entry.clone());
                }
            }
        }
    }

    record
}

/// All categories a snippet's text matches by keyword, beyond its
/// originating query.
pub fn route_snippet(snippet: &Snippet, matchup: &Matchup) -> Vec<Category> {
    let text = snippet.text.to_lowercase();
    let mut categories = Vec::new();

    for rule in ROUTING_RULES {
        if rule.hints.iter().any(|hint| text.contains(hint)) {
            categories.push(rule.category);
        }
    }

    categories.extend(form_categories(&text, matchup));
    categories
}

/// Form snippets route to the bucket of whichever team they mention;
/// mentioning both teams routes to both buckets, mentioning neither stays
/// only in the originating query's bucket.
fn form_categories(text: &str, matchup: &Matchup) -> Vec<Category> {
    if !FORM_HINTS.iter().any(|hint| text.contains(hint)) {
        return Vec::new();
    }

    let mut categories = Vec::new();
    if text.contains(&matchup.home.to_lowercase()) {
        categories.push(Category::HomeForm);
    }
    if text.contains(&matchup.away.to_lowercase()) {
        categories.push(Category::AwayForm);
    }
    categories
}
