use abstractor_core::{AuthorList, WorkRecord};

/// Sequence label for a 0-based document index: 1-based, at least two
/// digits. Wider indices are never truncated.
pub fn format_sequence(document_index: usize) -> String {
    format!("{:02}", document_index + 1)
}

/// Compose one output record. The sequence derives from the document's
/// position in the batch, not from how many records came before it.
pub fn build_record(document_index: usize, title: String, authors: AuthorList) -> WorkRecord {
    WorkRecord {
        sequence: format_sequence(document_index),
        document_index,
        title,
        presenter: authors.presenter,
        coauthors: authors.coauthors,
    }
}
