use log::debug;
use serde_json::Value as JSValue;

use crate::config::*;
use crate::symbols::{assign_column_ids, assign_row_ids};
use crate::{build_table, flatten_document};

/// A builder for tabulating a batch of documents.
///
/// One builder covers one batch. The identifiers are only assigned when
/// calling `build`, once all the documents are known.
///
/// ```
/// use json_tabulate::builder::Builder;
/// # use json_tabulate::TabulateError;
/// use serde_json::json;
///
/// let mut builder = Builder::new();
/// builder.add_json(&json!({"Sec1": {"Q1": "yes"}}))?;
/// builder.add_json(&json!({"Sec2": {"Q1": "maybe"}}))?;
///
/// let table = builder.build()?;
/// assert_eq!(table.to_json()["str2"]["L2"]["H1"], json!("maybe"));
///
/// # Ok::<(), TabulateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _records: Vec<FlatRecord>,
    pub(crate) _num_documents: usize,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Adds the leaves of a document after those of the previous documents.
    ///
    /// Returns the number of leaves found in the document.
    pub fn add_document(&mut self, doc: &SourceDocument) -> usize {
        let mut records = flatten_document(doc);
        let count = records.len();
        debug!(
            "add_document: document {} has {} leaves",
            self._num_documents + 1,
            count
        );
        self._records.append(&mut records);
        self._num_documents += 1;
        count
    }

    /// Adds a document from its JSON form.
    ///
    /// Fails without changing the batch if the value is not an object.
    pub fn add_json(&mut self, value: &JSValue) -> Result<usize, TabulateError> {
        let doc = SourceDocument::from_json(value)?;
        Ok(self.add_document(&doc))
    }

    pub fn num_documents(&self) -> usize {
        self._num_documents
    }

    pub fn records(&self) -> &[FlatRecord] {
        &self._records
    }

    pub fn build(self) -> Result<Table, TabulateError> {
        let rows = assign_row_ids(&self._records);
        let columns = assign_column_ids(&self._records);
        build_table(&rows, &columns, &self._records)
    }
}
