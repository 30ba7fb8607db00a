//! Boundary rules: predicates over a single line that end the block being
//! grown. A [`RuleSet`] evaluates its rules in a fixed order and the first
//! match wins, so the order of construction is the tie-break policy.

use once_cell::sync::Lazy;
use regex::Regex;

use abstractor_core::Line;

use crate::config::SegmenterConfig;

/// Stable identifier for a boundary rule, used in logs and dry-run output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    BlankLine,
    AuthorList,
    NameSequence,
    Affiliation,
    Email,
    SectionKeyword,
    NumberedMarker,
    CitationMarker,
    BodyText,
}

impl BoundaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlankLine => "blank_line",
            Self::AuthorList => "author_list",
            Self::NameSequence => "name_sequence",
            Self::Affiliation => "affiliation",
            Self::Email => "email",
            Self::SectionKeyword => "section_keyword",
            Self::NumberedMarker => "numbered_marker",
            Self::CitationMarker => "citation_marker",
            Self::BodyText => "body_text",
        }
    }
}

impl std::fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `1. Introduction`, `2) Universidade ...`, `(3) Instituto ...` at line start.
static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?\d{1,2}[.)]\s*\p{L}").unwrap());

/// `[1]`, `[2, 3]`, `[4–6]` anywhere in the line.
static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+(?:\s*[,\u{2013}-]\s*\d+)*\]").unwrap());

#[derive(Debug, Clone)]
pub enum BoundaryRule {
    /// End of a paragraph run.
    BlankLine,
    /// A comma or the presenter marker on a short line.
    AuthorList { marker: char, max_words: usize },
    /// Line opens with "Firstname Lastname" followed by a separator or marker.
    NameSequence(Regex),
    Affiliation(Regex),
    Email,
    SectionKeyword(Regex),
    NumberedMarker,
    CitationMarker,
    /// Long lines are prose, not names.
    BodyText { min_words: usize },
}

impl BoundaryRule {
    pub fn kind(&self) -> BoundaryKind {
        match self {
            Self::BlankLine => BoundaryKind::BlankLine,
            Self::AuthorList { .. } => BoundaryKind::AuthorList,
            Self::NameSequence(_) => BoundaryKind::NameSequence,
            Self::Affiliation(_) => BoundaryKind::Affiliation,
            Self::Email => BoundaryKind::Email,
            Self::SectionKeyword(_) => BoundaryKind::SectionKeyword,
            Self::NumberedMarker => BoundaryKind::NumberedMarker,
            Self::CitationMarker => BoundaryKind::CitationMarker,
            Self::BodyText { .. } => BoundaryKind::BodyText,
        }
    }

    pub fn matches(&self, line: &Line) -> bool {
        let text = line.text.as_str();
        match self {
            Self::BlankLine => line.is_blank(),
            Self::AuthorList { marker, max_words } => {
                (text.contains(',') || text.contains(*marker)) && line.word_count() < *max_words
            }
            Self::NameSequence(re) | Self::Affiliation(re) | Self::SectionKeyword(re) => {
                re.is_match(text)
            }
            Self::Email => text.contains('@'),
            Self::NumberedMarker => NUMBERED_RE.is_match(text),
            Self::CitationMarker => CITATION_RE.is_match(text),
            Self::BodyText { min_words } => line.word_count() >= *min_words,
        }
    }
}

/// An ordered list of boundary rules; first match wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<BoundaryRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<BoundaryRule>) -> Self {
        Self { rules }
    }

    /// Rules that end the title block: the candidate line looks like the
    /// start of an author list.
    pub fn title_boundaries(config: &SegmenterConfig) -> Self {
        Self::new(vec![
            BoundaryRule::BlankLine,
            BoundaryRule::AuthorList {
                marker: config.presenter_marker,
                max_words: config.author_line_max_words,
            },
            BoundaryRule::NameSequence(config.name_sequence_re.clone()),
        ])
    }

    /// Rules that end the author block: affiliations, contact details,
    /// section headings, list or citation markers, or prose.
    pub fn author_boundaries(config: &SegmenterConfig) -> Self {
        let mut rules = vec![BoundaryRule::BlankLine];
        if let Some(re) = &config.affiliation_re {
            rules.push(BoundaryRule::Affiliation(re.clone()));
        }
        rules.push(BoundaryRule::Email);
        if let Some(re) = &config.section_re {
            rules.push(BoundaryRule::SectionKeyword(re.clone()));
        }
        rules.extend([
            BoundaryRule::NumberedMarker,
            BoundaryRule::CitationMarker,
            BoundaryRule::BodyText {
                min_words: config.body_text_min_words,
            },
        ]);
        Self::new(rules)
    }

    pub fn rules(&self) -> &[BoundaryRule] {
        &self.rules
    }

    /// The first rule matching `line`, if any.
    pub fn first_match(&self, line: &Line) -> Option<&BoundaryRule> {
        self.rules.iter().find(|rule| rule.matches(line))
    }
}
