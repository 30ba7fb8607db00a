use once_cell::sync::Lazy;
use regex::Regex;

use abstractor_core::config_file::SegmentationConfig;

use crate::ConfigError;

/// Affiliation cues. Matched case-insensitively as word prefixes, so
/// `univ` covers University, Universidade and Universität.
pub const DEFAULT_AFFILIATION_KEYWORDS: &[&str] = &[
    "univ",
    "institut",
    "affiliation",
    "department",
    "departamento",
    "faculdade",
    "faculty",
    "laborat",
    "school",
    "college",
    "hospital",
];

/// Section headings that follow the author list in an abstract.
pub const DEFAULT_SECTION_KEYWORDS: &[&str] = &[
    "keywords",
    "key words",
    "palavras-chave",
    "palavras chave",
    "abstract",
    "resumo",
    "introduction",
    "introdução",
    "background",
];

pub const DEFAULT_MIN_TITLE_CHARS: usize = 10;
pub const DEFAULT_AUTHOR_LINE_MAX_WORDS: usize = 30;
pub const DEFAULT_BODY_TEXT_MIN_WORDS: usize = 40;
pub const DEFAULT_PRESENTER_MARKER: char = '*';

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }

    fn push(&mut self, value: T) {
        match self {
            ListOverride::Replace(v) | ListOverride::Extend(v) => v.push(value),
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
        }
    }
}

/// Tunables for block segmentation and author parsing.
///
/// Keyword regexes are `None` when their list resolves to empty, which
/// disables the corresponding boundary rule. Use [`SegmenterConfigBuilder`]
/// to construct from plain values.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// A title starts at the first line longer than this many characters.
    pub(crate) min_title_chars: usize,
    /// Lines with a comma or marker and fewer words than this look like author lists.
    pub(crate) author_line_max_words: usize,
    /// Lines with at least this many words are body text, not authors.
    pub(crate) body_text_min_words: usize,
    /// Symbol that marks the presenting author.
    pub(crate) presenter_marker: char,
    pub(crate) name_sequence_re: Regex,
    pub(crate) affiliation_re: Option<Regex>,
    pub(crate) section_re: Option<Regex>,
}

static DEFAULT_NAME_SEQUENCE_RE: Lazy<Regex> =
    Lazy::new(|| name_sequence_regex(DEFAULT_PRESENTER_MARKER).unwrap());

static DEFAULT_AFFILIATION_RE: Lazy<Option<Regex>> =
    Lazy::new(|| keyword_regex(&to_owned(DEFAULT_AFFILIATION_KEYWORDS)).unwrap());

static DEFAULT_SECTION_RE: Lazy<Option<Regex>> =
    Lazy::new(|| keyword_regex(&to_owned(DEFAULT_SECTION_KEYWORDS)).unwrap());

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_title_chars: DEFAULT_MIN_TITLE_CHARS,
            author_line_max_words: DEFAULT_AUTHOR_LINE_MAX_WORDS,
            body_text_min_words: DEFAULT_BODY_TEXT_MIN_WORDS,
            presenter_marker: DEFAULT_PRESENTER_MARKER,
            name_sequence_re: DEFAULT_NAME_SEQUENCE_RE.clone(),
            affiliation_re: DEFAULT_AFFILIATION_RE.clone(),
            section_re: DEFAULT_SECTION_RE.clone(),
        }
    }
}

impl SegmenterConfig {
    pub fn builder() -> SegmenterConfigBuilder {
        SegmenterConfigBuilder::new()
    }

    pub fn author_line_max_words(&self) -> usize {
        self.author_line_max_words
    }

    pub fn body_text_min_words(&self) -> usize {
        self.body_text_min_words
    }

    pub fn min_title_chars(&self) -> usize {
        self.min_title_chars
    }

    pub fn presenter_marker(&self) -> char {
        self.presenter_marker
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Compile keywords into one case-insensitive alternation that must not
/// follow a letter. Digits may precede a keyword, since PDF text flattens
/// superscript affiliation numbers into `1Instituto`. An empty list
/// yields `None`.
pub(crate) fn keyword_regex(keywords: &[String]) -> Result<Option<Regex>, regex::Error> {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!(r"(?i)(?:^|\P{{L}})(?:{})", alternatives.join("|"))).map(Some)
}

/// "Firstname [Middle|I.|da|van ...] Lastname" at the start of a line,
/// followed by optional affiliation digits and then a separator or the
/// presenter marker.
pub(crate) fn name_sequence_regex(marker: char) -> Result<Regex, regex::Error> {
    let marker = regex::escape(&marker.to_string());
    Regex::new(&format!(
        r"^\p{{Lu}}[\p{{Ll}}'’-]+(?:\s+(?:\p{{Lu}}\.|\p{{Lu}}[\p{{L}}'’-]+|d[aeo]s?|van|von|de|del|di|la))*\s+\p{{Lu}}[\p{{L}}'’-]+[\d\s]*(?:[,;]|{marker})"
    ))
}

/// Builder for [`SegmenterConfig`].
///
/// Keyword lists are compiled to `Regex` in [`build()`](Self::build), which
/// fails fast on an invalid pattern or marker.
#[derive(Debug, Clone, Default)]
pub struct SegmenterConfigBuilder {
    min_title_chars: Option<usize>,
    author_line_max_words: Option<usize>,
    body_text_min_words: Option<usize>,
    presenter_marker: Option<char>,
    affiliation_keywords: ListOverride<String>,
    section_keywords: ListOverride<String>,
}

impl SegmenterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_title_chars(mut self, chars: usize) -> Self {
        self.min_title_chars = Some(chars);
        self
    }

    pub fn author_line_max_words(mut self, words: usize) -> Self {
        self.author_line_max_words = Some(words);
        self
    }

    pub fn body_text_min_words(mut self, words: usize) -> Self {
        self.body_text_min_words = Some(words);
        self
    }

    pub fn presenter_marker(mut self, marker: char) -> Self {
        self.presenter_marker = Some(marker);
        self
    }

    // ── Affiliation keywords ──

    pub fn set_affiliation_keywords(mut self, keywords: Vec<String>) -> Self {
        self.affiliation_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_affiliation_keyword(mut self, keyword: String) -> Self {
        self.affiliation_keywords.push(keyword);
        self
    }

    // ── Section keywords ──

    pub fn set_section_keywords(mut self, keywords: Vec<String>) -> Self {
        self.section_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_section_keyword(mut self, keyword: String) -> Self {
        self.section_keywords.push(keyword);
        self
    }

    /// Layer the `[segmentation]` section of a config file onto this builder.
    /// Values already set on the builder are overwritten.
    pub fn apply_file(mut self, file: &SegmentationConfig) -> Result<Self, ConfigError> {
        if let Some(n) = file.min_title_chars {
            self = self.min_title_chars(n);
        }
        if let Some(n) = file.author_line_max_words {
            self = self.author_line_max_words(n);
        }
        if let Some(n) = file.body_text_min_words {
            self = self.body_text_min_words(n);
        }
        if let Some(marker) = &file.presenter_marker {
            self = self.presenter_marker(parse_marker(marker)?);
        }
        if let Some(keywords) = &file.affiliation_keywords {
            self = self.set_affiliation_keywords(keywords.clone());
        }
        for keyword in file.extra_affiliation_keywords.iter().flatten() {
            self = self.add_affiliation_keyword(keyword.clone());
        }
        if let Some(keywords) = &file.section_keywords {
            self = self.set_section_keywords(keywords.clone());
        }
        for keyword in file.extra_section_keywords.iter().flatten() {
            self = self.add_section_keyword(keyword.clone());
        }
        Ok(self)
    }

    pub fn build(self) -> Result<SegmenterConfig, ConfigError> {
        let defaults = SegmenterConfig::default();
        let presenter_marker = self.presenter_marker.unwrap_or(defaults.presenter_marker);
        if presenter_marker.is_alphanumeric() || presenter_marker.is_whitespace() {
            return Err(ConfigError::InvalidMarker(presenter_marker.to_string()));
        }

        let name_sequence_re = if presenter_marker == DEFAULT_PRESENTER_MARKER {
            defaults.name_sequence_re
        } else {
            name_sequence_regex(presenter_marker)?
        };

        let affiliation_re = match self.affiliation_keywords {
            ListOverride::Default => defaults.affiliation_re,
            ref list => keyword_regex(&list.resolve(&to_owned(DEFAULT_AFFILIATION_KEYWORDS)))?,
        };
        let section_re = match self.section_keywords {
            ListOverride::Default => defaults.section_re,
            ref list => keyword_regex(&list.resolve(&to_owned(DEFAULT_SECTION_KEYWORDS)))?,
        };

        Ok(SegmenterConfig {
            min_title_chars: self.min_title_chars.unwrap_or(defaults.min_title_chars),
            author_line_max_words: self
                .author_line_max_words
                .unwrap_or(defaults.author_line_max_words),
            body_text_min_words: self
                .body_text_min_words
                .unwrap_or(defaults.body_text_min_words),
            presenter_marker,
            name_sequence_re,
            affiliation_re,
            section_re,
        })
    }
}

/// A marker must be exactly one character.
pub fn parse_marker(value: &str) -> Result<char, ConfigError> {
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::InvalidMarker(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SegmenterConfig::default();
        assert_eq!(config.min_title_chars, 10);
        assert_eq!(config.author_line_max_words, 30);
        assert_eq!(config.body_text_min_words, 40);
        assert_eq!(config.presenter_marker, '*');
        assert!(config.affiliation_re.is_some());
        assert!(config.section_re.is_some());
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string()];
        assert_eq!(ListOverride::<String>::Default.resolve(&defaults), defaults);
        assert_eq!(
            ListOverride::Replace(vec!["b".to_string()]).resolve(&defaults),
            vec!["b".to_string()]
        );
        assert_eq!(
            ListOverride::Extend(vec!["b".to_string()]).resolve(&defaults),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_keyword_regex_is_case_insensitive_prefix() {
        let re = keyword_regex(&to_owned(DEFAULT_AFFILIATION_KEYWORDS))
            .unwrap()
            .unwrap();
        assert!(re.is_match("Universidade Federal de Minas Gerais"));
        assert!(re.is_match("1 INSTITUTO de Física"));
        assert!(!re.is_match("Jane Doe, John Smith"));
    }

    #[test]
    fn test_keyword_regex_accepts_glued_affiliation_digits() {
        let re = keyword_regex(&to_owned(DEFAULT_AFFILIATION_KEYWORDS))
            .unwrap()
            .unwrap();
        assert!(re.is_match("1Instituto de Química"));
        assert!(re.is_match("2Universidade Federal de Minas Gerais"));
        assert!(re.is_match("¹Departamento de Farmácia"));
        assert!(re.is_match("(a)Faculdade de Medicina"));
        // Keyword inside a longer word does not count.
        assert!(!re.is_match("Preschool Nutrition Outcomes"));
    }

    #[test]
    fn test_keyword_regex_escapes_metacharacters() {
        let re = keyword_regex(&["c++ lab".to_string()]).unwrap().unwrap();
        assert!(re.is_match("The C++ Lab"));
    }

    #[test]
    fn test_empty_keyword_list_disables_rule() {
        let config = SegmenterConfigBuilder::new()
            .set_section_keywords(vec![])
            .build()
            .unwrap();
        assert!(config.section_re.is_none());
        assert!(config.affiliation_re.is_some());
    }

    #[test]
    fn test_builder_extends_keywords() {
        let config = SegmenterConfigBuilder::new()
            .add_section_keyword("methods".to_string())
            .build()
            .unwrap();
        let re = config.section_re.unwrap();
        assert!(re.is_match("Methods: we synthesized"));
        assert!(re.is_match("Keywords: nano"));
    }

    #[test]
    fn test_builder_custom_marker() {
        let config = SegmenterConfigBuilder::new()
            .presenter_marker('#')
            .build()
            .unwrap();
        assert_eq!(config.presenter_marker(), '#');
        assert!(config.name_sequence_re.is_match("Jane Doe# and others"));
        assert!(!config.name_sequence_re.is_match("Jane Doe* and others"));
    }

    #[test]
    fn test_builder_rejects_alphanumeric_marker() {
        let err = SegmenterConfigBuilder::new().presenter_marker('a').build();
        assert!(matches!(err, Err(ConfigError::InvalidMarker(_))));
    }

    #[test]
    fn test_parse_marker() {
        assert_eq!(parse_marker("*").unwrap(), '*');
        assert_eq!(parse_marker(" † ").unwrap(), '†');
        assert!(parse_marker("**").is_err());
        assert!(parse_marker("").is_err());
    }

    #[test]
    fn test_apply_file() {
        let file = SegmentationConfig {
            min_title_chars: Some(20),
            presenter_marker: Some("#".to_string()),
            extra_affiliation_keywords: Some(vec!["embrapa".to_string()]),
            ..Default::default()
        };
        let config = SegmenterConfigBuilder::new()
            .apply_file(&file)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.min_title_chars(), 20);
        assert_eq!(config.presenter_marker(), '#');
        assert!(config.affiliation_re.unwrap().is_match("Embrapa Agroenergia"));
    }
}
