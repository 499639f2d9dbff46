// Reading and writing JSON files.

use crate::tab::*;

/// Reads a JSON file, keeping the key order of its objects.
pub fn read_json(path: &Path) -> TabResult<JSValue> {
    let path_s = path.display().to_string();
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path_s.clone(),
    })?;
    // Files saved by some Windows editors start with a byte order mark.
    let contents = contents.trim_start_matches('\u{feff}');
    serde_json::from_str(contents).context(ParsingJsonSnafu { path: path_s })
}

/// Reads the answers of one respondent.
pub fn read_source_document(path: &Path) -> TabResult<SourceDocument> {
    let js = read_json(path)?;
    SourceDocument::from_json(&js).context(FormatSnafu {
        path: path.display().to_string(),
    })
}

/// Writes a string to the given location, creating the missing parent directories.
pub fn write_output(path: &Path, contents: &str) -> TabResult<()> {
    let path_s = path.display().to_string();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(PersistenceSnafu {
                path: path_s.clone(),
            })?;
        }
    }
    fs::write(path, contents).context(PersistenceSnafu { path: path_s })
}

pub fn write_json(path: &Path, js: &JSValue) -> TabResult<()> {
    write_output(path, format!("{:#}", js).as_str())
}
