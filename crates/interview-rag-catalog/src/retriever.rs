use serde::Serialize;
use tracing::debug;

use crate::{CatalogStore, CompanyCatalog, QuestionEntry};

/// Keyword matches kept per company when the company is not named directly
pub const DEFAULT_MAX_MATCHES_PER_COMPANY: usize = 5;

/// Query tokens must be longer than this many characters to take part in
/// keyword matching
pub const MIN_TOKEN_CHARS: usize = 3;

/// One company's questions selected for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchGroup {
    pub company: String,
    pub accent_color: String,
    pub icon: String,
    /// True when the query named the company; `matches` then holds every
    /// question the company has
    pub direct_mention: bool,
    /// Subsequence of the company's questions, in catalog order
    pub matches: Vec<QuestionEntry>,
}

impl MatchGroup {
    fn from_company(company: &CompanyCatalog, direct_mention: bool, matches: Vec<QuestionEntry>) -> Self {
        Self {
            company: company.name.clone(),
            accent_color: company.accent_color.clone(),
            icon: company.icon.clone(),
            direct_mention,
            matches,
        }
    }
}

/// Lower-case and keep only ASCII letters and digits
fn strip_normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Search the catalog for questions relevant to `query`.
///
/// A company named in the query (case-insensitive, punctuation ignored)
/// contributes all of its questions. Any other company contributes the first
/// `max_matches_per_company` questions sharing a keyword with the query.
/// Output follows catalog order; there is no scoring.
pub fn search(query: &str, store: &CatalogStore, max_matches_per_company: usize) -> Vec<MatchGroup> {
    let limit = max_matches_per_company.max(1);
    let query_lower = query.to_lowercase();
    let query_stripped = strip_normalize(query);

    let tokens: Vec<&str> = query_lower
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .collect();

    let mut groups = Vec::new();

    for company in store.all() {
        let company_lower = company.name.to_lowercase();
        let company_stripped = strip_normalize(&company.name);

        let direct_mention = query_lower.contains(&company_lower)
            || (!company_stripped.is_empty() && query_stripped.contains(&company_stripped));

        if direct_mention {
            groups.push(MatchGroup::from_company(company, true, company.questions.clone()));
            continue;
        }

        if tokens.is_empty() {
            continue;
        }

        let matches: Vec<QuestionEntry> = company
            .questions
            .iter()
            .filter(|entry| {
                let text = entry.searchable_text(&company_lower);
                tokens.iter().any(|token| text.contains(token))
            })
            .take(limit)
            .cloned()
            .collect();

        if !matches.is_empty() {
            groups.push(MatchGroup::from_company(company, false, matches));
        }
    }

    debug!(
        query_len = query.len(),
        tokens = tokens.len(),
        groups = groups.len(),
        "Catalog search completed"
    );

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> CatalogStore {
        let acme = CompanyCatalog::new("Acme", "#FF0000", "A")
            .with_question(QuestionEntry::new("Design a cache with TTL", &["system design"]))
            .with_question(QuestionEntry::new("Reverse a linked list", &["algorithms"]))
            .with_question(QuestionEntry::new("Tell me about a conflict", &["behavioral"]));
        let globex = CompanyCatalog::new("Globex", "#00FF00", "")
            .with_question(QuestionEntry::new("Cache 1", &["caching"]))
            .with_question(QuestionEntry::new("Sorting 1", &["algorithms"]))
            .with_question(QuestionEntry::new("Cache 2", &["caching"]))
            .with_question(QuestionEntry::new("Cache 3", &["caching"]))
            .with_question(QuestionEntry::new("Cache 4", &["caching"]))
            .with_question(QuestionEntry::new("Cache 5", &["caching"]))
            .with_question(QuestionEntry::new("Cache 6", &["caching"]));
        let at_and_t = CompanyCatalog::new("A.T. & T", "#0000FF", "T")
            .with_question(QuestionEntry::new("Explain DNS resolution", &["networking"]));

        CatalogStore::from_companies(vec![acme, globex, at_and_t]).unwrap()
    }

    fn companies(groups: &[MatchGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.company.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        assert!(search("", &fixture(), 5).is_empty());
        assert!(search("   ", &fixture(), 5).is_empty());
    }

    #[test]
    fn test_short_tokens_are_ignored() {
        // "ttl" and "dns" are three characters long
        assert!(search("ttl dns", &fixture(), 5).is_empty());
    }

    #[test]
    fn test_keyword_match_in_tags() {
        let groups = search("algorithms please", &fixture(), 5);

        assert_eq!(companies(&groups), vec!["Acme", "Globex"]);
        assert_eq!(groups[0].matches[0].text, "Reverse a linked list");
        assert!(!groups[0].direct_mention);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let groups = search("LINKED", &fixture(), 5);
        assert_eq!(companies(&groups), vec!["Acme"]);
    }

    #[test]
    fn test_keyword_matches_truncated_in_catalog_order() {
        let groups = search("caching", &fixture(), 5);

        assert_eq!(groups.len(), 1);
        let texts: Vec<&str> = groups[0].matches.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Cache 1", "Cache 2", "Cache 3", "Cache 4", "Cache 5"]);
    }

    #[test]
    fn test_zero_limit_treated_as_one() {
        let groups = search("caching", &fixture(), 0);
        assert_eq!(groups[0].matches.len(), 1);
    }

    #[test]
    fn test_direct_mention_returns_every_question() {
        let groups = search("what does globex ask about sorting", &fixture(), 2);

        let globex = groups.iter().find(|g| g.company == "Globex").unwrap();
        assert!(globex.direct_mention);
        assert_eq!(globex.matches.len(), 7);
    }

    #[test]
    fn test_direct_mention_ignores_punctuation() {
        let groups = search("interviews at AT&T?", &fixture(), 5);

        assert_eq!(companies(&groups), vec!["A.T. & T"]);
        assert!(groups[0].direct_mention);
    }

    #[test]
    fn test_company_name_counts_as_keyword() {
        // "glob" is not a mention of "Globex" but is part of every searchable
        // text for that company
        let groups = search("glob", &fixture(), 2);

        assert_eq!(companies(&groups), vec!["Globex"]);
        assert!(!groups[0].direct_mention);
        assert_eq!(groups[0].matches.len(), 2);
    }

    #[test]
    fn test_mention_inside_longer_word() {
        let groups = search("globexcorp", &fixture(), 2);

        assert_eq!(companies(&groups), vec!["Globex"]);
        assert!(groups[0].direct_mention);
    }

    #[test]
    fn test_results_follow_catalog_order_not_match_count() {
        let groups = search("dns caching conflict", &fixture(), 10);
        assert_eq!(companies(&groups), vec!["Acme", "Globex"]);
        assert_eq!(groups[0].matches.len(), 1);
        assert_eq!(groups[1].matches.len(), 6);
    }

    #[test]
    fn test_resolution_is_a_keyword() {
        let groups = search("resolution", &fixture(), 5);
        assert_eq!(companies(&groups), vec!["A.T. & T"]);
        assert!(!groups[0].direct_mention);
    }

    #[test]
    fn test_search_is_repeatable() {
        let store = fixture();
        let first = search("caching algorithms acme", &store, 5);
        let second = search("caching algorithms acme", &store, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_entries_are_returned_verbatim() {
        let store = fixture();
        let groups = search("linked", &store, 5);
        assert_eq!(groups[0].matches[0], store.get("Acme").unwrap().questions[1]);
    }

    #[test]
    fn test_netflix_direct_mention_over_builtin_catalog() {
        let store = CatalogStore::builtin().unwrap();
        let groups = search("Tell me about Netflix", &store, DEFAULT_MAX_MATCHES_PER_COMPANY);

        let netflix = groups.iter().find(|g| g.company == "Netflix").unwrap();
        assert!(netflix.direct_mention);
        assert_eq!(netflix.matches.len(), 29);
        assert_eq!(netflix.matches, store.get("Netflix").unwrap().questions);
    }

    #[test]
    fn test_ibm_reachable_only_by_direct_mention() {
        let store = CatalogStore::builtin().unwrap();
        let groups = search("Do IBM", &store, DEFAULT_MAX_MATCHES_PER_COMPANY);

        assert_eq!(companies(&groups), vec!["IBM"]);
        assert_eq!(groups[0].matches.len(), 17);
    }

    #[test]
    fn test_keyword_groups_never_exceed_limit_over_builtin_catalog() {
        let store = CatalogStore::builtin().unwrap();
        let groups = search("design system", &store, DEFAULT_MAX_MATCHES_PER_COMPANY);

        assert!(!groups.is_empty());
        for group in &groups {
            assert!(!group.direct_mention);
            assert!(group.matches.len() <= DEFAULT_MAX_MATCHES_PER_COMPANY);
        }
    }
}
