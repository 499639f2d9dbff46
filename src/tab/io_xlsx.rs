// Primitives for reading interview transcripts stored as Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::tab::*;

/// Reads every worksheet of the workbook as one table, in workbook order.
pub fn read_xlsx_tables(path: &str) -> TabResult<Vec<TranscriptTable>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let mut res: Vec<TranscriptTable> = Vec::new();
    for (worksheet, wrange) in workbook.worksheets() {
        debug!(
            "read_xlsx_tables: worksheet {:?} size {:?}",
            worksheet,
            wrange.get_size()
        );
        let mut rows: Vec<Vec<String>> = Vec::new();
        for (idx, row) in wrange.rows().enumerate() {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| cell_text(cell, &worksheet, idx as u64 + 1))
                .collect::<TabResult<Vec<String>>>()?;
            rows.push(cells);
        }
        res.push(TranscriptTable {
            name: worksheet,
            rows,
        });
    }
    info!("Read {} tables from {}", res.len(), path);
    Ok(res)
}

fn cell_text(cell: &DataType, worksheet: &str, lineno: u64) -> TabResult<String> {
    let s = match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => "".to_string(),
        _ => {
            return ExcelWrongCellTypeSnafu {
                worksheet,
                lineno,
                content: format!("{:?}", cell),
            }
            .fail();
        }
    };
    Ok(s.trim().to_string())
}
