// Locating input documents.

use glob::{glob_with, MatchOptions};

use crate::tab::*;

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn resolve_path(root: &Path, p: &str) -> PathBuf {
    let path = Path::new(p);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Expands a file-glob pattern such as `data/*/ai/*.json` into the matching files.
///
/// The pattern follows the usual shell rules: `*`, `?` and `[...]` may appear
/// in any component, and wildcards do not match a leading dot. The files are
/// returned in alphabetical order, so that the same directory always yields
/// the same batch. A pattern without wildcards designates a single file.
pub fn discover_documents(pattern: &str) -> TabResult<Vec<PathBuf>> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let entries = glob_with(pattern, options).context(InvalidPatternSnafu { pattern })?;
    let mut res: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.context(ListingDirectorySnafu {})?;
        if path.is_file() {
            res.push(path);
        }
    }
    res.sort();
    debug!("discover_documents: {:?} matched {:?}", pattern, res);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovered_files_are_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "c.txt", "10.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("sub.json")).unwrap();
        let pattern = dir.path().join("*.json");
        let found = discover_documents(pattern.to_str().unwrap()).unwrap();
        let names: Vec<String> = found.iter().map(|p| simplify_file_name(p)).collect();
        assert_eq!(names, vec!["10.json", "a.json", "b.json"]);
    }

    #[test]
    fn literal_pattern_designates_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.json");
        fs::write(&file, "{}").unwrap();
        assert_eq!(
            discover_documents(file.to_str().unwrap()).unwrap(),
            vec![file.clone()]
        );
        let missing = dir.path().join("two.json");
        assert!(discover_documents(missing.to_str().unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn missing_directory_matches_nothing() {
        let res = discover_documents("/nonexistent/interviewtab/*.json").unwrap();
        assert!(res.is_empty());
    }

    #[test]
    fn wildcards_apply_to_directories() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["r2", "r1", "r3"] {
            fs::create_dir_all(dir.path().join(sub).join("ai")).unwrap();
        }
        fs::write(dir.path().join("r2").join("ai").join("x.json"), "{}").unwrap();
        fs::write(dir.path().join("r1").join("ai").join("y.json"), "{}").unwrap();
        fs::write(dir.path().join("r3").join("z.json"), "{}").unwrap();
        let pattern = dir.path().join("*").join("ai").join("*.json");
        let found = discover_documents(pattern.to_str().unwrap()).unwrap();
        assert_eq!(
            found,
            vec![
                dir.path().join("r1").join("ai").join("y.json"),
                dir.path().join("r2").join("ai").join("x.json"),
            ]
        );
    }

    #[test]
    fn character_classes_and_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["d1.json", "d2.json", "dx.json", ".d3.json", ".hidden.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let names = |pattern: &Path| -> Vec<String> {
            discover_documents(pattern.to_str().unwrap())
                .unwrap()
                .iter()
                .map(|p| simplify_file_name(p))
                .collect()
        };
        assert_eq!(
            names(&dir.path().join("d[0-9].json")),
            vec!["d1.json", "d2.json"]
        );
        assert_eq!(
            names(&dir.path().join("*.json")),
            vec!["d1.json", "d2.json", "dx.json"]
        );
        assert_eq!(names(&dir.path().join(".*.json")), vec![".d3.json", ".hidden.json"]);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let res = discover_documents("data/[.json");
        assert!(matches!(res, Err(TabError::InvalidPattern { .. })));
    }

    #[test]
    fn relative_paths_are_resolved() {
        assert_eq!(
            resolve_path(Path::new("/cfg"), "data/x.json"),
            PathBuf::from("/cfg/data/x.json")
        );
        assert_eq!(
            resolve_path(Path::new("/cfg"), "/data/x.json"),
            PathBuf::from("/data/x.json")
        );
    }
}
