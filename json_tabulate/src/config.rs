// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde_json::Value as JSValue;

/// A position in a source document.
///
/// Mappings are descended into; everything else stops the traversal.
#[derive(PartialEq, Debug, Clone)]
pub enum Node {
    /// Strings (including empty ones), numbers, booleans, null and lists.
    /// Lists are kept as opaque values and never traversed.
    Leaf(JSValue),
    /// A mapping, in the order in which the keys were written.
    Branch(Vec<(String, Node)>),
}

impl Node {
    pub fn from_json(value: &JSValue) -> Node {
        match value {
            JSValue::Object(m) => Node::Branch(
                m.iter()
                    .map(|(k, v)| (k.clone(), Node::from_json(v)))
                    .collect(),
            ),
            x => Node::Leaf(x.clone()),
        }
    }
}

/// The extracted answers of one respondent.
///
/// The top-level keys are the sections of the taxonomy (the rows of the
/// final table).
#[derive(PartialEq, Debug, Clone)]
pub struct SourceDocument {
    pub sections: Vec<(String, Node)>,
}

impl SourceDocument {
    /// Builds a document out of a parsed JSON value.
    ///
    /// Only objects are accepted at the top level. The key order of the
    /// value is kept, which requires `serde_json` to preserve insertion order.
    pub fn from_json(value: &JSValue) -> Result<SourceDocument, TabulateError> {
        match value {
            JSValue::Object(m) => Ok(SourceDocument {
                sections: m
                    .iter()
                    .map(|(k, v)| (k.clone(), Node::from_json(v)))
                    .collect(),
            }),
            x => Err(TabulateError::NotAnObject(json_kind(x).to_string())),
        }
    }
}

fn json_kind(value: &JSValue) -> &'static str {
    match value {
        JSValue::Null => "null",
        JSValue::Bool(_) => "boolean",
        JSValue::Number(_) => "number",
        JSValue::String(_) => "string",
        JSValue::Array(_) => "array",
        JSValue::Object(_) => "object",
    }
}

/// A leaf of a source document, with the full list of keys that lead to it.
///
/// Invariant: the path is never empty.
#[derive(PartialEq, Debug, Clone)]
pub struct FlatRecord {
    pub path: Vec<String>,
    pub value: JSValue,
}

impl FlatRecord {
    /// The section this record belongs to.
    pub fn top_level_key(&self) -> &str {
        &self.path[0]
    }

    /// The keys below the section. May be empty when the section itself is a leaf.
    pub fn sub_path(&self) -> &[String] {
        &self.path[1..]
    }

    /// The header segments of the column holding this record.
    ///
    /// An empty sub-path is the column of the empty string.
    pub fn column_path(&self) -> Vec<String> {
        match self.sub_path() {
            [] => vec![String::new()],
            x => x.to_vec(),
        }
    }
}

// ******** Output data structures *********

/// Row identifier, rendered as `L<n>`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct RowId(pub u32);

impl Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Column identifier, rendered as `H<n>`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct ColumnId(pub u32);

impl Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "H{}", self.0)
    }
}

/// The tabulated batch.
///
/// `rows` and `columns` are sorted by identifier. `cells` follows the order in which
/// the rows, and within a row the columns, were first seen in the records.
#[derive(PartialEq, Debug, Clone)]
pub struct Table {
    /// Number of header segments of the first column (`baseinfo.str1Num`).
    pub str1_num: usize,
    /// `str0`: row identifier to section name.
    pub rows: Vec<(RowId, String)>,
    /// `str1`: column identifier to header segments.
    pub columns: Vec<(ColumnId, Vec<String>)>,
    /// `str2`: the sparse body.
    pub cells: Vec<(RowId, Vec<(ColumnId, JSValue)>)>,
}

/// Errors that prevent a document from being tabulated.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TabulateError {
    /// The top level of a document is not an object. Holds the kind that was found.
    NotAnObject(String),
    /// A record refers to a section or a column that has no identifier.
    MissingIdentifier(Vec<String>),
}

impl Error for TabulateError {}

impl Display for TabulateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabulateError::NotAnObject(kind) => {
                write!(f, "expected a JSON object at the top level, found {}", kind)
            }
            TabulateError::MissingIdentifier(path) => {
                write!(f, "no identifier assigned for path {:?}", path)
            }
        }
    }
}
