use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub segmentation: Option<SegmentationConfig>,
    pub pdf: Option<PdfConfig>,
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    pub min_title_chars: Option<usize>,
    pub author_line_max_words: Option<usize>,
    pub body_text_min_words: Option<usize>,
    pub presenter_marker: Option<String>,
    /// Replaces the built-in affiliation keywords.
    pub affiliation_keywords: Option<Vec<String>>,
    /// Appended to the affiliation keywords.
    pub extra_affiliation_keywords: Option<Vec<String>>,
    /// Replaces the built-in section keywords.
    pub section_keywords: Option<Vec<String>>,
    /// Appended to the section keywords.
    pub extra_section_keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    pub header_exclusion: Option<f32>,
    pub footer_exclusion: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: Option<String>,
}

/// Platform config directory path: `<config_dir>/abstractor/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("abstractor").join("config.toml"))
}

/// Load config by cascading CWD `.abstractor.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".abstractor.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Parse a config from TOML text, reporting syntax errors.
pub fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

fn pick<T: Clone, S>(overlay: Option<&S>, base: Option<&S>, f: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay.and_then(&f).or_else(|| base.and_then(&f))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bs, os) = (base.segmentation.as_ref(), overlay.segmentation.as_ref());
    let (bp, op) = (base.pdf.as_ref(), overlay.pdf.as_ref());
    let (be, oe) = (base.export.as_ref(), overlay.export.as_ref());

    ConfigFile {
        segmentation: Some(SegmentationConfig {
            min_title_chars: pick(os, bs, |s| s.min_title_chars),
            author_line_max_words: pick(os, bs, |s| s.author_line_max_words),
            body_text_min_words: pick(os, bs, |s| s.body_text_min_words),
            presenter_marker: pick(os, bs, |s| s.presenter_marker.clone()),
            affiliation_keywords: pick(os, bs, |s| s.affiliation_keywords.clone()),
            extra_affiliation_keywords: pick(os, bs, |s| s.extra_affiliation_keywords.clone()),
            section_keywords: pick(os, bs, |s| s.section_keywords.clone()),
            extra_section_keywords: pick(os, bs, |s| s.extra_section_keywords.clone()),
        }),
        pdf: Some(PdfConfig {
            header_exclusion: pick(op, bp, |p| p.header_exclusion),
            footer_exclusion: pick(op, bp, |p| p.footer_exclusion),
        }),
        export: Some(ExportConfig {
            format: pick(oe, be, |e| e.format.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r##"
[segmentation]
min_title_chars = 12
presenter_marker = "#"
extra_section_keywords = ["methods"]
"##,
        )
        .unwrap();
        let seg = config.segmentation.unwrap();
        assert_eq!(seg.min_title_chars, Some(12));
        assert_eq!(seg.presenter_marker.as_deref(), Some("#"));
        assert_eq!(seg.extra_section_keywords, Some(vec!["methods".to_string()]));
        assert!(seg.section_keywords.is_none());
        assert!(config.pdf.is_none());
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(parse_config("[segmentation]\nmin_title_chars = \"ten\"\n").is_err());
    }

    #[test]
    fn test_merge_overlay_wins_per_field() {
        let base = parse_config(
            "[segmentation]\nmin_title_chars = 8\nbody_text_min_words = 50\n[pdf]\nfooter_exclusion = 0.1\n",
        )
        .unwrap();
        let overlay = parse_config("[segmentation]\nmin_title_chars = 15\n[export]\nformat = \"csv\"\n")
            .unwrap();

        let merged = merge(base, overlay);
        let seg = merged.segmentation.unwrap();
        assert_eq!(seg.min_title_chars, Some(15));
        assert_eq!(seg.body_text_min_words, Some(50));
        assert_eq!(merged.pdf.unwrap().footer_exclusion, Some(0.1));
        assert_eq!(merged.export.unwrap().format.as_deref(), Some("csv"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());
    }

    #[test]
    fn test_load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[export]\nformat = \"json\"\n").unwrap();
        let config = load_from_path(&path).unwrap();
        assert_eq!(config.export.unwrap().format.as_deref(), Some("json"));
    }
}
