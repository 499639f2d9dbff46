// Interview transcripts: their tables, and the prompt chunks made from them.

use crate::tab::*;

/// Default maximum length of a prompt chunk, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 10000;

const TABLE_SEPARATOR_WIDTH: usize = 50;

/// One table of a transcript: the cell texts, row by row.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TranscriptTable {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Reads the tables of a transcript, in document order.
///
/// Word documents (`.docx`) contribute each of their tables, Excel workbooks
/// (`.xlsx`) each of their worksheets.
pub fn read_transcript(path: &str) -> TabResult<Vec<TranscriptTable>> {
    let extension = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    match extension.as_deref() {
        Some("docx") => io_docx::read_docx_tables(path),
        Some("xlsx") | Some("xlsm") => io_xlsx::read_xlsx_tables(path),
        _ => whatever!("Unsupported transcript format: {} (expected .docx or .xlsx)", path),
    }
}

/// Renders one table for the extraction prompt. Tables are numbered from 1.
pub fn render_table(number: usize, table: &TranscriptTable) -> String {
    let mut res = format!("Table {}:\n", number);
    for row in table.rows.iter() {
        res.push_str(&row.join("\t|\t").replace('\n', ""));
        res.push('\n');
    }
    res.push('\n');
    res.push_str(&"=".repeat(TABLE_SEPARATOR_WIDTH));
    res.push('\n');
    res
}

/// Renders all the tables of a transcript, one after the other.
pub fn render_tables(tables: &[TranscriptTable]) -> String {
    tables
        .iter()
        .enumerate()
        .map(|(idx, t)| render_table(idx + 1, t))
        .collect()
}

/// Splits a text into pieces of at most `size` characters.
///
/// Characters are never split. A size of 0 is treated as 1.
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let size = size.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|c| c.iter().collect::<String>())
        .collect()
}

/// The prompt chunks of a transcript.
///
/// Each table is chunked on its own, so that a chunk never mixes two tables.
pub fn transcript_chunks(tables: &[TranscriptTable], size: usize) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for (idx, table) in tables.iter().enumerate() {
        let text = render_table(idx + 1, table);
        res.extend(chunk_text(&text, size));
    }
    debug!("transcript_chunks: {} chunks", res.len());
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> TranscriptTable {
        TranscriptTable {
            name: "Sheet1".to_string(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn tables_are_rendered_with_separators() {
        let t = table(&[&["问题", "回答"], &["规模", "50\n人"]]);
        let expected = format!(
            "Table 2:\n问题\t|\t回答\n规模\t|\t50人\n\n{}\n",
            "=".repeat(50)
        );
        assert_eq!(render_table(2, &t), expected);
    }

    #[test]
    fn all_tables_are_numbered_in_order() {
        let tables = vec![table(&[&["a"]]), table(&[&["b", "c"]])];
        let sep = "=".repeat(50);
        assert_eq!(
            render_tables(&tables),
            format!("Table 1:\na\n\n{sep}\nTable 2:\nb\t|\tc\n\n{sep}\n")
        );
        assert_eq!(render_tables(&[]), "");
    }

    #[test]
    fn chunks_count_characters_not_bytes() {
        assert_eq!(
            chunk_text("基本信息abc", 3),
            vec!["基本信", "息ab", "c"]
        );
        assert_eq!(chunk_text("", 3), Vec::<String>::new());
        assert_eq!(chunk_text("ab", 0), vec!["a", "b"]);
    }

    #[test]
    fn chunks_do_not_span_tables() {
        let tables = vec![table(&[&["a"]]), table(&[&["b"]])];
        let chunks = transcript_chunks(&tables, DEFAULT_CHUNK_SIZE);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with("Table 1:\na\n"));
        assert!(chunks[1].starts_with("Table 2:\nb\n"));
        assert_eq!(chunks.concat(), render_tables(&tables));

        let small = transcript_chunks(&tables, 20);
        let joined: String = small.concat();
        assert_eq!(joined, chunks.concat());
        assert!(small.iter().all(|c| c.chars().count() <= 20));
    }

    #[test]
    fn unknown_formats_are_rejected() {
        let res = read_transcript("transcript.pdf");
        assert!(matches!(res, Err(TabError::Whatever { .. })));
    }
}
