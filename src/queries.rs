//! Query plan construction.
//!
//! Turns a parsed [`Matchup`] into the ordered list of provider queries the
//! aggregator fans out. The plan is pure and deterministic: the same matchup
//! always produces the same queries in the same order.

use crate::models::{Category, Matchup, Provider, SourceQuery};

/// Build the fan-out plan for one match.
///
/// Covers fixture lookup, betting odds, standings for both teams,
/// head-to-head history, recent form for both teams, and external
/// predictions. Query phrasing is the Romanian search wording the product
/// uses; the football gateway receives bare team names as parameters.
pub fn build_query_plan(matchup: &Matchup) -> Vec<SourceQuery> {
    let home = &matchup.home;
    let away = &matchup.away;

    vec![
        query(
            "match-info",
            format!("{} vs {}", home, away),
            Provider::SportsDb,
            Category::MatchInfo,
        ),
        query(
            "odds",
            format!("cote pariuri {} vs {} 1x2", home, away),
            Provider::Search,
            Category::Odds,
        ),
        query(
            "standings-home",
            home.clone(),
            Provider::Football,
            Category::Standings,
        ),
        query(
            "standings-away",
            away.clone(),
            Provider::Football,
            Category::Standings,
        ),
        query(
            "h2h",
            format!("{} vs {} h2h meciuri directe", home, away),
            Provider::Search,
            Category::HeadToHead,
        ),
        query(
            "home-form",
            format!("{} ultimele 5 meciuri acasa", home),
            Provider::Search,
            Category::HomeForm,
        ),
        query(
            "away-form",
            format!("{} ultimele 5 meciuri deplasare", away),
            Provider::Search,
            Category::AwayForm,
        ),
        query(
            "predictions",
            format!("predictii pariuri {} vs {}", home, away),
            Provider::Search,
            Category::Predictions,
        ),
    ]
}

fn query(id: &str, text: String, provider: Provider, category: Category) -> SourceQuery {
    SourceQuery {
        id: id.to_string(),
        text,
        provider,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchup() -> Matchup {
        Matchup {
            home: "Rapid".to_string(),
            away: "FCSB".to_string(),
        }
    }

    #[test]
    fn test_plan_is_deterministic() {
        let a = build_query_plan(&matchup());
        let b = build_query_plan(&matchup());
        assert_eq!(a, b);
    }

    #[test]
    fn test_plan_size_and_unique_ids() {
        let plan = build_query_plan(&matchup());
        assert_eq!(plan.len(), 8);

        let mut ids: Vec<&str> = plan.iter().map(|q| q.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8, "query ids must be unique");
    }

    #[test]
    fn test_plan_covers_every_category() {
        let plan = build_query_plan(&matchup());
        for category in Category::ALL {
            assert!(
                plan.iter().any(|q| q.category == category),
                "no query for {:?}",
                category
            );
        }
    }

    #[test]
    fn test_standings_queried_for_both_teams() {
        let plan = build_query_plan(&matchup());
        let standings: Vec<&SourceQuery> = plan
            .iter()
            .filter(|q| q.category == Category::Standings)
            .collect();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].text, "Rapid");
        assert_eq!(standings[1].text, "FCSB");
        assert!(standings.iter().all(|q| q.provider == Provider::Football));
    }

    #[test]
    fn test_search_queries_use_romanian_phrasing() {
        let plan = build_query_plan(&matchup());
        let odds = plan.iter().find(|q| q.id == "odds").unwrap();
        assert!(odds.text.contains("cote"));
        let form = plan.iter().find(|q| q.id == "home-form").unwrap();
        assert!(form.text.contains("ultimele 5 meciuri"));
    }
}
