pub mod config_reader;
pub mod extraction;
pub mod io_common;
pub mod io_docx;
pub mod io_json;
pub mod io_xlsx;
pub mod transcript;

use log::{debug, info, warn};

use json_tabulate::*;
use rayon::prelude::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::tab::config_reader::*;
use crate::tab::io_common::*;
use crate::tab::io_json::*;
use crate::tab::transcript::*;

/// Where the table goes when neither the command line nor the configuration say otherwise.
pub const DEFAULT_OUTPUT_PATH: &str = "flattened_output.json";

#[derive(Debug, Snafu)]
pub enum TabError {
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid document {path}: {source}"))]
    Format { source: TabulateError, path: String },
    #[snafu(display(
        "No input document could be read ({attempted} attempted, {succeeded} succeeded)"
    ))]
    NoInput { attempted: usize, succeeded: usize },
    #[snafu(display("Could not write the output to {path}: {source}"))]
    Persistence {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid input pattern {pattern}: {source}"))]
    InvalidPattern {
        source: glob::PatternError,
        pattern: String,
    },
    #[snafu(display("Could not list the input documents: {source}"))]
    ListingDirectory { source: glob::GlobError },
    #[snafu(display("Error opening Excel file {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Error opening Word file {path}: {source}"))]
    OpeningWord {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid Word archive {path}: {source}"))]
    WordArchive {
        source: zip::result::ZipError,
        path: String,
    },
    #[snafu(display("Error parsing the body of Word file {path}: {source}"))]
    ParsingWord {
        source: quick_xml::Error,
        path: String,
    },
    #[snafu(display("Unsupported cell in worksheet {worksheet}, row {lineno}: {content}"))]
    ExcelWrongCellType {
        worksheet: String,
        lineno: u64,
        content: String,
    },
    #[snafu(display("Tabulation failed: {source}"))]
    Tabulation { source: TabulateError },
    #[snafu(display("Difference detected between the tabulated output and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TabResult<T> = Result<T, TabError>;

/// Tabulates the documents, in the given order, and writes the canonical
/// table to `output_path`.
///
/// Documents that cannot be read are skipped with a warning. The batch fails
/// if no document could be read.
pub fn process_batch(paths: &[PathBuf], output_path: &Path) -> TabResult<Table> {
    let attempted = paths.len();
    ensure!(
        attempted > 0,
        NoInputSnafu {
            attempted,
            succeeded: 0usize
        }
    );
    info!("Processing {} documents", attempted);

    // The documents are independent until they are merged. The collected
    // results keep the order of the paths.
    let parsed: Vec<Result<SourceDocument, String>> = paths
        .par_iter()
        .map(|p| read_source_document(p).map_err(|e| e.to_string()))
        .collect();

    let mut builder = Builder::new();
    for (p, res) in paths.iter().zip(parsed) {
        match res {
            Ok(doc) => {
                let count = builder.add_document(&doc);
                debug!("process_batch: {:?}: {} leaves", p, count);
            }
            Err(e) => {
                warn!("Skipping document {}: {}", simplify_file_name(p), e);
            }
        }
    }

    let succeeded = builder.num_documents();
    ensure!(
        succeeded > 0,
        NoInputSnafu {
            attempted,
            succeeded
        }
    );

    let table = builder.build().context(TabulationSnafu {})?;
    write_output(output_path, table.to_pretty_json().as_str())?;
    info!(
        "Tabulated {} of {} documents into {} rows and {} columns, written to {} (fingerprint {})",
        succeeded,
        attempted,
        table.rows.len(),
        table.columns.len(),
        output_path.display(),
        table.fingerprint()
    );
    Ok(table)
}

/// Compares the table with a reference table, printing the differences if any.
pub fn check_reference(table: &Table, reference_path: &str) -> TabResult<()> {
    let reference = read_json(Path::new(reference_path))?;
    debug!("reference: {:?}", reference);
    let pretty_reference = format!("{:#}", reference);
    let pretty_table = table.to_pretty_json();
    if pretty_reference != pretty_table {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(pretty_reference.as_str(), pretty_table.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The output matches the reference {}", reference_path);
    Ok(())
}

pub fn run_tabulate(
    config_path: Option<String>,
    input: Option<String>,
    files: Vec<String>,
    out: Option<String>,
    reference: Option<String>,
) -> TabResult<()> {
    let loaded = LoadedConfig::load(config_path.as_deref())?;

    let paths: Vec<PathBuf> = if !files.is_empty() {
        files.iter().map(PathBuf::from).collect()
    } else if let Some(pattern) = input.or_else(|| loaded.input_pattern()) {
        let found = discover_documents(&pattern)?;
        ensure!(
            !found.is_empty(),
            NoInputSnafu {
                attempted: 0usize,
                succeeded: 0usize
            }
        );
        found
    } else {
        let listed = loaded.input_files();
        if listed.is_empty() {
            whatever!("No input documents: provide files, --input or a configuration file");
        }
        listed
    };

    let output_path = out
        .map(PathBuf::from)
        .or_else(|| loaded.output_path())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

    let table = process_batch(&paths, &output_path)?;

    if let Some(reference_path) = reference {
        check_reference(&table, &reference_path)?;
    }
    Ok(())
}

pub fn run_chunk(
    config_path: Option<String>,
    input: String,
    chunk_size: Option<usize>,
    out: Option<String>,
) -> TabResult<()> {
    let loaded = LoadedConfig::load(config_path.as_deref())?;
    let size = chunk_size.unwrap_or_else(|| loaded.chunk_size());
    let tables = read_transcript(&input)?;
    let chunks = transcript_chunks(&tables, size);
    info!(
        "{} tables of {} rendered into {} chunks",
        tables.len(),
        input,
        chunks.len()
    );
    match out {
        Some(p) => write_json(Path::new(&p), &JSValue::from(chunks)),
        None => {
            for c in chunks.iter() {
                println!("{}", c);
            }
            Ok(())
        }
    }
}

pub fn run_merge(
    config_path: Option<String>,
    template_path: String,
    reply_paths: Vec<String>,
    out: String,
) -> TabResult<()> {
    let loaded = LoadedConfig::load(config_path.as_deref())?;
    let template = read_json(Path::new(&template_path))?;

    let mut replies: Vec<JSValue> = Vec::new();
    for p in reply_paths.iter() {
        let text = fs::read_to_string(p).context(OpeningJsonSnafu { path: p })?;
        replies.push(extraction::clean_model_reply(&text));
    }

    let merged = extraction::merge_answers(&template, &replies, &loaded.merge_settings())?;
    // The merged document is an input of the tabulation: it must be accepted there.
    SourceDocument::from_json(&merged).context(FormatSnafu { path: &out })?;
    write_json(Path::new(&out), &merged)?;
    info!("Merged {} replies into {}", replies.len(), out);
    Ok(())
}
