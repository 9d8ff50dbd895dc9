use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::errors::{JournalError, Result};

use super::{ReportTable, RowKind};

const BOM: &[u8] = "\u{feff}".as_bytes();

/// Semicolon-separated, CRLF-terminated, BOM-prefixed so spreadsheet
/// programs pick up UTF-8.
pub fn write_csv(table: &ReportTable, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path).map_err(export_io)?);
    file.write_all(BOM).map_err(export_io)?;
    write_rows(table, file)
}

/// Renders the table into memory; used by previews and tests.
pub fn render_csv(table: &ReportTable) -> Result<Vec<u8>> {
    let mut buffer = BOM.to_vec();
    write_rows(table, &mut buffer)?;
    Ok(buffer)
}

fn write_rows<W: Write>(table: &ReportTable, sink: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .flexible(true)
        .from_writer(sink);
    writer.write_record(&table.head)?;
    for row in &table.rows {
        if row.kind == RowKind::Group {
            continue;
        }
        writer.write_record(&row.cells)?;
    }
    writer.flush().map_err(export_io)?;
    Ok(())
}

pub(crate) fn export_io(err: std::io::Error) -> JournalError {
    JournalError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportRow;

    fn sample() -> ReportTable {
        ReportTable {
            title: "t".into(),
            head: vec!["Имя".into(), "Премия, %".into()],
            rows: vec![
                ReportRow {
                    kind: RowKind::Body,
                    cells: vec!["Максим".into(), "10".into()],
                },
                ReportRow {
                    kind: RowKind::Total,
                    cells: vec!["ИТОГО".into(), String::new()],
                },
            ],
            file_name: "out.csv".into(),
        }
    }

    #[test]
    fn rendered_csv_has_bom_semicolons_and_crlf() {
        let bytes = render_csv(&sample()).unwrap();
        assert!(bytes.starts_with(BOM));
        let text = String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "Имя;Премия, %\r\nМаксим;10\r\nИТОГО;\r\n");
    }

    #[test]
    fn writes_file_to_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("report.csv");
        write_csv(&sample(), &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, render_csv(&sample()).unwrap());
    }
}
