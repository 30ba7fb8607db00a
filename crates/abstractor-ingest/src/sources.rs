use std::collections::HashMap;

use abstractor_core::config_file::PdfConfig;
use abstractor_core::{DocumentFormat, LineSource};
use abstractor_docx::DocxBackend;

/// Registry mapping each document format to the adapter that reads it.
///
/// Registering a second source for the same format replaces the first.
pub struct LineSources {
    sources: HashMap<DocumentFormat, Box<dyn LineSource>>,
}

impl Default for LineSources {
    /// DOCX always; PDF when built with the `pdf` feature.
    fn default() -> Self {
        Self::from_pdf_config(&PdfConfig::default())
    }
}

impl LineSources {
    /// A registry with no adapters. Every supported document fails until
    /// sources are added with [`LineSources::with`].
    pub fn empty() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// The default adapters, with the PDF header/footer bands taken from `pdf`.
    #[cfg(feature = "pdf")]
    pub fn from_pdf_config(pdf: &PdfConfig) -> Self {
        Self::empty()
            .with(DocxBackend::new())
            .with(abstractor_pdf_mupdf::MupdfBackend::from_config(pdf))
    }

    #[cfg(not(feature = "pdf"))]
    pub fn from_pdf_config(_pdf: &PdfConfig) -> Self {
        Self::empty().with(DocxBackend::new())
    }

    pub fn with(mut self, source: impl LineSource + 'static) -> Self {
        self.sources.insert(source.format(), Box::new(source));
        self
    }

    pub fn get(&self, format: DocumentFormat) -> Option<&dyn LineSource> {
        self.sources.get(&format).map(|s| s.as_ref())
    }

    pub fn supports(&self, format: DocumentFormat) -> bool {
        self.sources.contains_key(&format)
    }
}

impl std::fmt::Debug for LineSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats: Vec<_> = self.sources.keys().map(|f| f.extension()).collect();
        formats.sort_unstable();
        f.debug_struct("LineSources").field("formats", &formats).finish()
    }
}
