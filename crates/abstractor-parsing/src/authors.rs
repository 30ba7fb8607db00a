use once_cell::sync::Lazy;
use regex::Regex;

use abstractor_core::{AuthorList, AuthorToken};

use crate::config::SegmenterConfig;

/// Split author block text on commas and semicolons.
///
/// Empty pieces are dropped. A token is flagged as presenter when the
/// marker appears anywhere in it.
pub fn split_author_tokens(text: &str, marker: char) -> Vec<AuthorToken> {
    text.split([',', ';'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| AuthorToken {
            raw: t.to_string(),
            is_presenter: t.contains(marker),
        })
        .collect()
}

/// Normalize a raw author token into a display name.
///
/// Removes digits (including superscript affiliation numbers) and the
/// marker, collapses whitespace, then trims commas, semicolons, periods and
/// spaces from both ends. Applying it twice gives the same result.
pub fn clean_author_name(raw: &str, marker: char) -> String {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_numeric() && *c != marker)
        .collect();
    let collapsed = WS_RE.replace_all(&stripped, " ");
    collapsed
        .trim_matches(|c: char| matches!(c, ',' | ';' | '.') || c.is_whitespace())
        .to_string()
}

/// Turns author block text into a presenter and the remaining co-authors.
#[derive(Debug, Clone, Copy)]
pub struct AuthorParser {
    marker: char,
}

impl Default for AuthorParser {
    fn default() -> Self {
        Self::new(&SegmenterConfig::default())
    }
}

impl AuthorParser {
    pub fn new(config: &SegmenterConfig) -> Self {
        Self {
            marker: config.presenter_marker,
        }
    }

    pub fn tokens(&self, text: &str) -> Vec<AuthorToken> {
        split_author_tokens(text, self.marker)
    }

    pub fn parse(&self, text: &str) -> AuthorList {
        self.parse_tokens(&self.tokens(text))
    }

    /// The first marked token is the presenter; later marked tokens stay
    /// ordinary co-authors. Without any marker the first author presents.
    /// The presenter never also appears in `coauthors`.
    pub fn parse_tokens(&self, tokens: &[AuthorToken]) -> AuthorList {
        let names: Vec<(String, bool)> = tokens
            .iter()
            .map(|t| (clean_author_name(&t.raw, self.marker), t.is_presenter))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let Some(presenter_idx) = names
            .iter()
            .position(|(_, marked)| *marked)
            .or((!names.is_empty()).then_some(0))
        else {
            return AuthorList::default();
        };

        let marked = names.iter().filter(|(_, m)| *m).count();
        if marked > 1 {
            tracing::debug!(marked, "multiple presenter markers, using the first");
        }

        let mut presenter = String::new();
        let mut coauthors = Vec::with_capacity(names.len().saturating_sub(1));
        for (i, (name, _)) in names.into_iter().enumerate() {
            if i == presenter_idx {
                presenter = name;
            } else {
                coauthors.push(name);
            }
        }

        AuthorList {
            presenter,
            coauthors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> AuthorList {
        AuthorParser::default().parse(text)
    }

    #[test]
    fn test_split_on_comma_and_semicolon() {
        let tokens = split_author_tokens("Jane Doe*, John Smith; Ana Souza,, ", '*');
        let raws: Vec<&str> = tokens.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raws, vec!["Jane Doe*", "John Smith", "Ana Souza"]);
        assert!(tokens[0].is_presenter);
        assert!(!tokens[1].is_presenter);
    }

    #[test]
    fn test_clean_author_name() {
        assert_eq!(clean_author_name("Jane Doe1*", '*'), "Jane Doe");
        assert_eq!(clean_author_name(" *Ana Souza2,3. ", '*'), "Ana Souza");
        assert_eq!(clean_author_name("Maria Silva¹²", '*'), "Maria Silva");
        assert_eq!(clean_author_name("J. R. R. Tolkien", '*'), "J. R. R. Tolkien");
        assert_eq!(clean_author_name("Carlos 1 Pinto", '*'), "Carlos Pinto");
        assert_eq!(clean_author_name("12*", '*'), "");
    }

    #[test]
    fn test_clean_is_idempotent() {
        for raw in ["Jane Doe1*", "  .Ana; Souza3 ", "Maria  da Silva²*", "**"] {
            let once = clean_author_name(raw, '*');
            assert_eq!(clean_author_name(&once, '*'), once);
            assert!(!once.contains('*'));
            assert!(!once.chars().any(|c| c.is_numeric()));
        }
    }

    #[test]
    fn test_marked_presenter() {
        let list = parse("Jane Doe*, John Smith, Ana Souza");
        assert_eq!(list.presenter, "Jane Doe");
        assert_eq!(list.coauthors, vec!["John Smith", "Ana Souza"]);
    }

    #[test]
    fn test_marker_in_middle() {
        let list = parse("John Smith1, Jane Doe2*, Ana Souza1");
        assert_eq!(list.presenter, "Jane Doe");
        assert_eq!(list.coauthors, vec!["John Smith", "Ana Souza"]);
    }

    #[test]
    fn test_no_marker_first_author_presents() {
        let list = parse("Maria Lopes, Carlos Pinto");
        assert_eq!(list.presenter, "Maria Lopes");
        assert_eq!(list.coauthors, vec!["Carlos Pinto"]);
    }

    #[test]
    fn test_multiple_markers_first_wins() {
        let list = parse("Ana Souza, Jane Doe*, John Smith*");
        assert_eq!(list.presenter, "Jane Doe");
        assert_eq!(list.coauthors, vec!["Ana Souza", "John Smith"]);
    }

    #[test]
    fn test_duplicates_preserved() {
        let list = parse("Jane Doe*, John Smith, John Smith");
        assert_eq!(list.coauthors, vec!["John Smith", "John Smith"]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(parse(""), AuthorList::default());
        assert_eq!(parse(" , ; "), AuthorList::default());
    }

    #[test]
    fn test_tokens_cleaning_to_empty_are_dropped() {
        let list = parse("*, 1, Maria Lopes, Carlos Pinto");
        assert_eq!(list.presenter, "Maria Lopes");
        assert_eq!(list.coauthors, vec!["Carlos Pinto"]);
    }

    #[test]
    fn test_single_author() {
        let list = parse("Jane Doe");
        assert_eq!(list.presenter, "Jane Doe");
        assert!(list.coauthors.is_empty());
    }
}
