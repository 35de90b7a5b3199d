//! Prompt composition.
//!
//! The system prompt is the product's fixed Romanian analyst template: ten
//! numbered sections, a symbol legend, and a hard rule against inventing
//! data. The user prompt carries the aggregated record verbatim, one
//! labeled block per category, so the model sees exactly what the providers
//! returned and nothing else.

use crate::models::{AnalysisRecord, Category, CompletionRequest, Matchup};

pub const SYSTEM_PROMPT: &str = "\
Esti un analist profesionist roman de fotbal.

Analizeaza meciul cerut si returneaza EXACT 10 puncte numerotate cu simboluri:

✅ consens surse
⚠️ atentie
📊 statistica cheie
🎯 pariu recomandat

Structura obligatorie:
1. Cote & predictii externe (SportyTrader, Forebet, etc.)
2. H2H ultimele 5 meciuri directe
3. Forma gazdelor (meciuri acasa)
4. Forma oaspetilor (meciuri deplasare)
5. Clasament actual & motivatie
6. GG & BTTS procente recente
7. Cornere, posesie, cartonase - medii
8. Jucatori importanti & absente
9. Predictie scor exact
10. Recomandari pariuri finale

Foloseste DOAR datele furnizate in mesaj. Nu inventa statistici sau cote:
acolo unde o categorie este marcata ca indisponibila, scrie explicit
\"date indisponibile\" in punctul respectiv.
Foloseste emoji-uri si fii concis dar detaliat.";

/// Render the record into the final prompt pair. Deterministic: category
/// order is fixed and every category appears, empty ones as the explicit
/// placeholder.
pub fn compose(record: &AnalysisRecord, matchup: &Matchup) -> CompletionRequest {
    let mut user = format!(
        "Meci: {} (gazde) vs {} (oaspeti)\n\nDate colectate per categorie:\n",
        matchup.home, matchup.away
    );

    for category in Category::ALL {
        user.push_str(&format!(
            "\n=== {} ===\n{}\n",
            category.label(),
            record.render_section(category)
        ));
    }

    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNAVAILABLE_MARKER;

    fn matchup() -> Matchup {
        Matchup {
            home: "Rapid".to_string(),
            away: "FCSB".to_string(),
        }
    }

    #[test]
    fn test_system_prompt_structure() {
        for symbol in ["✅", "⚠️", "📊", "🎯"] {
            assert!(SYSTEM_PROMPT.contains(symbol), "missing symbol {}", symbol);
        }
        for section in 1..=10 {
            assert!(
                SYSTEM_PROMPT.contains(&format!("{}.", section)),
                "missing section {}",
                section
            );
        }
        assert!(SYSTEM_PROMPT.contains("Nu inventa"));
    }

    #[test]
    fn test_user_prompt_contains_every_category_label() {
        let request = compose(&AnalysisRecord::new(), &matchup());
        for category in Category::ALL {
            assert!(
                request.user.contains(category.label()),
                "missing label {}",
                category.label()
            );
        }
    }

    #[test]
    fn test_empty_categories_render_placeholder() {
        let request = compose(&AnalysisRecord::new(), &matchup());
        assert_eq!(
            request.user.matches(UNAVAILABLE_MARKER).count(),
            Category::ALL.len()
        );
    }

    #[test]
    fn test_collected_data_embedded_verbatim() {
        let mut record = AnalysisRecord::new();
        record.push(Category::Odds, "1X2: 2.10 / 3.30 / 3.50".to_string());
        let request = compose(&record, &matchup());
        assert!(request.user.contains("1X2: 2.10 / 3.30 / 3.50"));
        assert!(request.user.contains("Rapid (gazde)"));
        // one fewer placeholder now
        assert_eq!(
            request.user.matches(UNAVAILABLE_MARKER).count(),
            Category::ALL.len() - 1
        );
    }

    #[test]
    fn test_compose_is_deterministic() {
        let mut record = AnalysisRecord::new();
        record.push(Category::HeadToHead, "3 victorii Rapid".to_string());
        let a = compose(&record, &matchup());
        let b = compose(&record, &matchup());
        assert_eq!(a, b);
    }
}
