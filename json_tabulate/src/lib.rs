mod config;
mod symbols;

pub mod builder;
pub mod manual;

use log::{debug, info};

use serde_json::Map as JSMap;
use serde_json::{json, Value as JSValue};
use std::collections::HashMap;

pub use crate::builder::Builder;
pub use crate::config::*;
pub use crate::symbols::*;

/// Flattens a document into its leaves, depth first, in key order.
///
/// Every record starts with the section key. Sections that hold a leaf
/// directly produce a record with an empty sub-path. Empty mappings produce
/// nothing.
pub fn flatten_document(doc: &SourceDocument) -> Vec<FlatRecord> {
    let mut res: Vec<FlatRecord> = Vec::new();
    for (key, node) in doc.sections.iter() {
        let mut path = vec![key.clone()];
        flatten_node(node, &mut path, &mut res);
    }
    res
}

fn flatten_node(node: &Node, path: &mut Vec<String>, res: &mut Vec<FlatRecord>) {
    match node {
        Node::Leaf(value) => res.push(FlatRecord {
            path: path.clone(),
            value: value.clone(),
        }),
        Node::Branch(children) => {
            for (key, child) in children.iter() {
                path.push(key.clone());
                flatten_node(child, path, res);
                path.pop();
            }
        }
    }
}

/// Places every record in the table.
///
/// Records that land on an occupied cell overwrite its value; the cell keeps
/// the position of its first occurrence.
///
/// Fails if a record has no row or column identifier, which cannot happen when
/// the symbols were assigned from the same records.
pub fn build_table(
    rows: &RowSymbols,
    columns: &ColumnSymbols,
    records: &[FlatRecord],
) -> Result<Table, TabulateError> {
    let mut cells: Vec<(RowId, Vec<(ColumnId, JSValue)>)> = Vec::new();
    let mut row_pos: HashMap<RowId, usize> = HashMap::new();
    let mut cell_pos: HashMap<(RowId, ColumnId), usize> = HashMap::new();

    for r in records.iter() {
        let column_path = r.column_path();
        let (rid, cid) = match (rows.get(r.top_level_key()), columns.get(&column_path)) {
            (Some(rid), Some(cid)) => (rid, cid),
            _ => return Err(TabulateError::MissingIdentifier(r.path.clone())),
        };
        let ridx = *row_pos.entry(rid).or_insert_with(|| {
            cells.push((rid, Vec::new()));
            cells.len() - 1
        });
        let row_cells = &mut cells[ridx].1;
        if let Some(cidx) = cell_pos.get(&(rid, cid)) {
            debug!(
                "build_table: overwriting {}/{} for path {:?}",
                rid, cid, r.path
            );
            row_cells[*cidx].1 = r.value.clone();
        } else {
            cell_pos.insert((rid, cid), row_cells.len());
            row_cells.push((cid, r.value.clone()));
        }
    }

    let str1_num = columns.iter().next().map(|(_, p)| p.len()).unwrap_or(0);

    Ok(Table {
        str1_num,
        rows: rows.iter().map(|(rid, k)| (rid, k.clone())).collect(),
        columns: columns.iter().map(|(cid, p)| (cid, p.clone())).collect(),
        cells,
    })
}

/// Tabulates a batch of documents, in the given order.
///
/// The order of the documents determines the row identifiers. The column
/// identifiers only depend on the set of headers.
pub fn tabulate(docs: &[SourceDocument]) -> Result<Table, TabulateError> {
    info!("Tabulating {} documents", docs.len());
    let mut builder = Builder::new();
    for doc in docs.iter() {
        builder.add_document(doc);
    }
    builder.build()
}

impl Table {
    /// The canonical JSON form of the table.
    pub fn to_json(&self) -> JSValue {
        let mut str0: JSMap<String, JSValue> = JSMap::new();
        for (rid, key) in self.rows.iter() {
            str0.insert(rid.to_string(), json!(key));
        }

        let mut str1: JSMap<String, JSValue> = JSMap::new();
        for (cid, segments) in self.columns.iter() {
            str1.insert(cid.to_string(), json!(segments));
        }

        let mut str2: JSMap<String, JSValue> = JSMap::new();
        for (rid, row) in self.cells.iter() {
            let mut row_js: JSMap<String, JSValue> = JSMap::new();
            for (cid, value) in row.iter() {
                row_js.insert(cid.to_string(), value.clone());
            }
            str2.insert(rid.to_string(), JSValue::Object(row_js));
        }

        json!({
            "baseinfo": { "str1Num": self.str1_num },
            "str0": str0,
            "str1": str1,
            "str2": str2,
        })
    }

    /// The canonical JSON form, pretty-printed with two-space indentation.
    pub fn to_pretty_json(&self) -> String {
        format!("{:#}", self.to_json())
    }

    /// SHA-256 of the pretty-printed canonical form.
    ///
    /// Two runs over the same documents in the same order give the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let pretty = self.to_pretty_json();
        sha256::digest(pretty.as_str())
    }
}
