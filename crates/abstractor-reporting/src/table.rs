use serde::Serialize;

use abstractor_core::WorkRecord;

/// Column headers, in output order.
pub const COLUMNS: [&str; 4] = ["Sequence", "Title", "Presenter", "Co-authors"];

/// The consolidated table: one row per record, in the order records were
/// pushed. Batch processing pushes them in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkTable {
    records: Vec<WorkRecord>,
}

impl WorkTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: WorkRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[WorkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// String cells for each row, matching [`COLUMNS`]. Co-authors are
    /// joined with `", "`.
    pub fn rows(&self) -> impl Iterator<Item = [String; 4]> + '_ {
        self.records.iter().map(|r| {
            [
                r.sequence.clone(),
                r.title.clone(),
                r.presenter.clone(),
                r.coauthors_joined(),
            ]
        })
    }
}

impl From<Vec<WorkRecord>> for WorkTable {
    fn from(records: Vec<WorkRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<WorkRecord> for WorkTable {
    fn from_iter<I: IntoIterator<Item = WorkRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<WorkRecord> for WorkTable {
    fn extend<I: IntoIterator<Item = WorkRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}
