// Primitives for reading interview transcripts stored as Word documents.
//
// A .docx file is a zip archive. The body of the document is the part
// word/document.xml, where tables are w:tbl elements made of w:tr rows and
// w:tc cells.

use std::fs::File;
use std::io::Read;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::tab::*;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the top-level tables of a Word document, in document order.
///
/// The text of a cell is the text of its paragraphs, one per line, trimmed.
/// A cell spanning several grid columns is repeated once per column.
pub fn read_docx_tables(path: &str) -> TabResult<Vec<TranscriptTable>> {
    let file = File::open(path).context(OpeningWordSnafu { path })?;
    let mut archive = ZipArchive::new(file).context(WordArchiveSnafu { path })?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .context(WordArchiveSnafu { path })?
        .read_to_string(&mut xml)
        .context(OpeningWordSnafu { path })?;
    let res = parse_document_xml(&xml, path)?;
    info!("Read {} tables from {}", res.len(), path);
    Ok(res)
}

#[derive(Debug)]
struct CellText {
    paragraphs: Vec<String>,
    span: usize,
}

impl CellText {
    fn push_str(&mut self, s: &str) {
        match self.paragraphs.last_mut() {
            Some(p) => p.push_str(s),
            None => self.paragraphs.push(s.to_string()),
        }
    }

    fn text(&self) -> String {
        self.paragraphs.join("\n").trim().to_string()
    }
}

fn grid_span(e: &BytesStart) -> usize {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"val")
        .and_then(|a| {
            std::str::from_utf8(&a.value)
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
        })
        .unwrap_or(1)
}

fn parse_document_xml(xml: &str, path: &str) -> TabResult<Vec<TranscriptTable>> {
    let mut reader = Reader::from_str(xml);
    let mut res: Vec<TranscriptTable> = Vec::new();
    // Nesting of w:tbl. The text of a nested table is not part of the
    // enclosing cell.
    let mut depth: usize = 0;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<CellText> = None;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event().context(ParsingWordSnafu { path })? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => {
                    depth += 1;
                    if depth == 1 {
                        rows.clear();
                    }
                }
                b"tr" if depth == 1 => row.clear(),
                b"tc" if depth == 1 => {
                    cell = Some(CellText {
                        paragraphs: Vec::new(),
                        span: 1,
                    })
                }
                b"p" if depth == 1 => {
                    if let Some(c) = cell.as_mut() {
                        c.paragraphs.push(String::new());
                    }
                }
                b"r" if depth == 1 => in_run = cell.is_some(),
                b"t" if depth == 1 => in_text = in_run,
                _ => {}
            },
            Event::Empty(e) => match (e.local_name().as_ref(), cell.as_mut()) {
                (b"p", Some(c)) if depth == 1 => c.paragraphs.push(String::new()),
                (b"gridSpan", Some(c)) if depth == 1 => c.span = grid_span(&e),
                (b"tab", Some(c)) if depth == 1 && in_run => c.push_str("\t"),
                (b"br", Some(c)) | (b"cr", Some(c)) if depth == 1 && in_run => c.push_str("\n"),
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e.unescape().context(ParsingWordSnafu { path })?;
                if let Some(c) = cell.as_mut() {
                    c.push_str(&text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" => {
                    if depth == 1 {
                        res.push(TranscriptTable {
                            name: format!("Table {}", res.len() + 1),
                            rows: std::mem::take(&mut rows),
                        });
                    }
                    depth = depth.saturating_sub(1);
                }
                b"tr" if depth == 1 => rows.push(std::mem::take(&mut row)),
                b"tc" if depth == 1 => {
                    if let Some(c) = cell.take() {
                        let text = c.text();
                        for _ in 0..c.span.max(1) {
                            row.push(text.clone());
                        }
                    }
                }
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    debug!("parse_document_xml: {}: {} tables", path, res.len());
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    fn tc(text: &str) -> String {
        format!(
            r#"<w:tc><w:tcPr><w:tcW w:w="1000" w:type="dxa"/></w:tcPr><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc>"#,
            text
        )
    }

    fn write_docx(dir: &Path, name: &str, parts: &[(&str, &str)]) -> PathBuf {
        let p = dir.join(name);
        let mut zip = zip::ZipWriter::new(File::create(&p).unwrap());
        for (part, contents) in parts {
            zip.start_file(*part, zip::write::FileOptions::default())
                .unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        p
    }

    fn interview_body() -> String {
        let mut body = String::from("<w:p><w:r><w:t>访谈记录</w:t></w:r></w:p>");
        body.push_str("<w:tbl><w:tblPr/><w:tr>");
        body.push_str(&tc("问题"));
        body.push_str(&tc(" 回答 "));
        body.push_str("</w:tr><w:tr>");
        body.push_str(concat!(
            r#"<w:tc><w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
            r#"<w:r><w:t>规模</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t xml:space="preserve">50</w:t><w:tab/><w:t>人</w:t></w:r></w:p></w:tc>"#,
            r#"<w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr>"#,
            r#"<w:p><w:r><w:t>A &amp; B</w:t></w:r></w:p></w:tc>"#,
        ));
        body.push_str("</w:tr><w:tr><w:tc><w:tbl><w:tr>");
        body.push_str(&tc("inner"));
        body.push_str("</w:tr></w:tbl><w:p><w:r><w:t>outer</w:t></w:r></w:p></w:tc>");
        body.push_str(&tc(""));
        body.push_str("</w:tr></w:tbl><w:p/><w:tbl><w:tr>");
        body.push_str(&tc("second"));
        body.push_str("</w:tr></w:tbl>");
        body
    }

    fn rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn top_level_tables_are_read() {
        let tables = parse_document_xml(&document(&interview_body()), "t.docx").unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "Table 1");
        assert_eq!(
            tables[0].rows,
            rows(&[
                &["问题", "回答"],
                &["规模\n50\t人", "A & B", "A & B"],
                &["outer", ""],
            ])
        );
        assert_eq!(tables[1].rows, rows(&[&["second"]]));
    }

    #[test]
    fn document_without_tables() {
        let xml = document("<w:p><w:r><w:t>no table</w:t></w:r></w:p>");
        assert!(parse_document_xml(&xml, "t.docx").unwrap().is_empty());
    }

    #[test]
    fn malformed_xml_is_reported() {
        let xml = document("<w:tbl><w:tr></w:tbl>");
        let res = parse_document_xml(&xml, "t.docx");
        assert!(matches!(res, Err(TabError::ParsingWord { .. })));
    }

    #[test]
    fn transcript_file_is_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let xml = document(&interview_body());
        let p = write_docx(
            dir.path(),
            "interview.docx",
            &[("[Content_Types].xml", "<Types/>"), (DOCUMENT_PART, xml.as_str())],
        );
        let tables = read_transcript(p.to_str().unwrap()).unwrap();
        assert_eq!(tables.len(), 2);
        let text = render_tables(&tables);
        assert!(text.starts_with("Table 1:\n问题\t|\t回答\n规模50\t人\t|\tA & B\t|\tA & B\n"));
        assert!(text.contains("Table 2:\nsecond\n"));
    }

    #[test]
    fn broken_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.docx");
        assert!(matches!(
            read_docx_tables(missing.to_str().unwrap()),
            Err(TabError::OpeningWord { .. })
        ));

        let not_zip = dir.path().join("plain.docx");
        fs::write(&not_zip, "plain text").unwrap();
        assert!(matches!(
            read_docx_tables(not_zip.to_str().unwrap()),
            Err(TabError::WordArchive { .. })
        ));

        let no_body = write_docx(dir.path(), "empty.docx", &[("other.xml", "<a/>")]);
        assert!(matches!(
            read_docx_tables(no_body.to_str().unwrap()),
            Err(TabError::WordArchive { .. })
        ));
    }
}
