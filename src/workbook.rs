use std::path::Path;

use crate::error::{Result, SheetError};
use crate::models::CellValue;
use crate::numbers::is_plain_number;

/// Sheet name reported for CSV sources, which have none of their own.
pub const CSV_SHEET_NAME: &str = "Sheet1";

// ---------------------------------------------------------------------------
// Formats, dispatched on the file extension
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

impl FileFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Csv => "csv",
        }
    }

    /// Format for `path`, judged by extension alone. Nothing is opened.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "csv" => Ok(Self::Csv),
            _ => Err(SheetError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn read(&self, path: &Path) -> Result<(String, Vec<Vec<CellValue>>)> {
        match self {
            Self::Csv => read_csv(path).map(|m| (CSV_SHEET_NAME.to_string(), m)),
            Self::Xlsx | Self::Xls => read_workbook(path),
        }
    }

    fn write(&self, path: &Path, sheet: &RawSheet) -> Result<()> {
        match self {
            Self::Csv => write_csv(path, sheet),
            Self::Xlsx => write_xlsx(path, sheet),
            Self::Xls => Err(SheetError::UnsupportedFormat(format!(
                "{} (legacy .xls can be read but not written)",
                path.display()
            ))),
        }
    }
}

/// File name without a spreadsheet extension: `stock.xlsx` -> `stock`.
pub fn base_name(path: &Path) -> String {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    match FileFormat::from_path(path) {
        Ok(_) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name)
            .to_string(),
        Err(_) => name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// RawSheet: header and body as they cross the file boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub sheet_name: String,
    pub header: Vec<String>,
    pub body: Vec<Vec<CellValue>>,
}

fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_blank)
}

/// Split a cell matrix into header and body. Blank rows are skipped; the first
/// remaining row is the header.
fn split_header(sheet_name: String, matrix: Vec<Vec<CellValue>>) -> Result<RawSheet> {
    let mut rows = matrix.into_iter().filter(|r| !is_blank_row(r));
    let header_row = rows.next().ok_or(SheetError::EmptySheet)?;
    let header: Vec<String> = header_row.iter().map(|c| c.to_string().trim().to_string()).collect();
    if header.is_empty() {
        return Err(SheetError::NoColumns);
    }
    Ok(RawSheet {
        sheet_name,
        header,
        body: rows.collect(),
    })
}

/// Read the first sheet of a workbook or CSV file.
pub fn read_sheet(path: &Path) -> Result<RawSheet> {
    let format = FileFormat::from_path(path)?;
    let (sheet_name, matrix) = format.read(path)?;
    log::debug!(
        "read {} rows from {} ({})",
        matrix.len(),
        path.display(),
        format.key()
    );
    split_header(sheet_name, matrix)
}

pub fn write_sheet(path: &Path, sheet: &RawSheet) -> Result<()> {
    let format = FileFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    format.write(path, sheet)?;
    log::info!("wrote {} rows to {}", sheet.body.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn csv_cell(field: &str) -> CellValue {
    if is_plain_number(field) {
        if let Ok(n) = field.trim().parse::<f64>() {
            return CellValue::Number(n);
        }
    }
    CellValue::from(field)
}

fn read_csv(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let file = std::fs::File::open(path).map_err(|e| SheetError::Unreadable(e.to_string()))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| SheetError::Unreadable(e.to_string()))?;
        rows.push(record.iter().map(csv_cell).collect());
    }
    Ok(rows)
}

fn write_csv(path: &Path, sheet: &RawSheet) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&sheet.header)?;
    for row in &sheet.body {
        wtr.write_record(row.iter().map(|c| c.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// XLSX / XLS (feature-gated)
// ---------------------------------------------------------------------------

#[cfg(feature = "xlsx")]
fn workbook_cell(data: &calamine::Data) -> CellValue {
    use calamine::Data;
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Bool(b) => CellValue::from(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
        Data::Error(e) => CellValue::from(e.to_string()),
        Data::Empty => CellValue::empty(),
    }
}

#[cfg(feature = "xlsx")]
fn read_workbook(path: &Path) -> Result<(String, Vec<Vec<CellValue>>)> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| SheetError::Unreadable(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoSheets)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SheetError::Unreadable(e.to_string()))?;
    let rows = range
        .rows()
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();
    Ok((sheet_name, rows))
}

#[cfg(not(feature = "xlsx"))]
fn read_workbook(path: &Path) -> Result<(String, Vec<Vec<CellValue>>)> {
    Err(SheetError::UnsupportedFormat(path.display().to_string()))
}

/// Excel sheet names: at most 31 characters, none of `[]:*?/\`, no
/// surrounding apostrophes, not blank.
pub fn sanitize_sheet_name(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').trim();
    if cleaned.is_empty() {
        fallback.chars().take(31).collect()
    } else {
        cleaned.to_string()
    }
}

/// Worksheet coordinates for a 0-based matrix position.
#[cfg(feature = "xlsx")]
fn cell_position(row: usize, col: usize) -> Result<(u32, u16)> {
    let r = u32::try_from(row).map_err(|_| SheetError::TooLarge)?;
    let c = u16::try_from(col).map_err(|_| SheetError::TooLarge)?;
    Ok((r, c))
}

#[cfg(feature = "xlsx")]
fn write_xlsx(path: &Path, sheet: &RawSheet) -> Result<()> {
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sanitize_sheet_name(&sheet.sheet_name, "Inventory"))?;

    for (c, name) in sheet.header.iter().enumerate() {
        let (r, c) = cell_position(0, c)?;
        worksheet.write_string_with_format(r, c, name, &bold)?;
    }
    for (r, row) in sheet.body.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = cell_position(r + 1, c)?;
            match cell {
                CellValue::Number(n) if n.is_finite() => {
                    worksheet.write_number(r, c, *n)?;
                }
                CellValue::Text(s) if s.is_empty() => {}
                other => {
                    worksheet.write_string(r, c, &other.to_string())?;
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

#[cfg(not(feature = "xlsx"))]
fn write_xlsx(path: &Path, _sheet: &RawSheet) -> Result<()> {
    Err(SheetError::UnsupportedFormat(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a.XLSX")).unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_path(Path::new("a.xls")).unwrap(), FileFormat::Xls);
        assert_eq!(FileFormat::from_path(Path::new("dir/a.Csv")).unwrap(), FileFormat::Csv);
        assert!(matches!(
            FileFormat::from_path(Path::new("notes.txt")),
            Err(SheetError::UnsupportedFormat(_))
        ));
        assert!(FileFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_unsupported_extension_is_not_opened() {
        let err = read_sheet(Path::new("/definitely/missing/file.ods")).unwrap_err();
        assert!(matches!(err, SheetError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/tmp/stock.xlsx")), "stock");
        assert_eq!(base_name(Path::new("Week.Report.CSV")), "Week.Report");
        assert_eq!(base_name(Path::new("notes.txt")), "notes.txt");
    }

    #[test]
    fn test_read_csv_infers_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "stock.csv",
            "SKU,Item,Opening Stock,Notes\n007,Soap,12,\nSKU-2,Towel,3.5,fluffy\n",
        );
        let sheet = read_sheet(&path).unwrap();
        assert_eq!(sheet.sheet_name, CSV_SHEET_NAME);
        assert_eq!(sheet.header, vec!["SKU", "Item", "Opening Stock", "Notes"]);
        assert_eq!(sheet.body.len(), 2);
        assert_eq!(sheet.body[0][0], CellValue::from("007"));
        assert_eq!(sheet.body[0][2], CellValue::Number(12.0));
        assert_eq!(sheet.body[0][3], CellValue::empty());
        assert_eq!(sheet.body[1][2], CellValue::Number(3.5));
    }

    #[test]
    fn test_read_csv_skips_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "gaps.csv", ",,\nItem,Qty\n,\nSoap,2\n");
        let sheet = read_sheet(&path).unwrap();
        assert_eq!(sheet.header, vec!["Item", "Qty"]);
        assert_eq!(sheet.body, vec![vec![CellValue::from("Soap"), CellValue::Number(2.0)]]);
    }

    #[test]
    fn test_read_empty_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "empty.csv", "");
        assert!(matches!(read_sheet(&path), Err(SheetError::EmptySheet)));
    }

    #[test]
    fn test_read_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_sheet(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, SheetError::Unreadable(_)));
        assert_eq!(
            err.to_string(),
            "Could not read that file. Please verify the format and try again."
        );
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("stock.csv");
        let sheet = RawSheet {
            sheet_name: "Inventory".to_string(),
            header: vec!["Item".to_string(), "Qty".to_string()],
            body: vec![vec!["Soap, bar".into(), 4.0.into()], vec!["Towel".into(), "".into()]],
        };
        write_sheet(&path, &sheet).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Item,Qty\n\"Soap, bar\",4\nTowel,\n");
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("Week 24/25", "Inventory"), "Week 2425");
        assert_eq!(sanitize_sheet_name("'[]'", "Inventory"), "Inventory");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40), "Inventory").len(), 31);
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_xlsx_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.xlsx");
        let sheet = RawSheet {
            sheet_name: "Inventory Week".to_string(),
            header: vec!["Week".to_string(), "Item".to_string(), "Units Sold".to_string()],
            body: vec![
                vec!["Week 24".into(), "Tea".into(), 5.0.into()],
                vec!["Week 24".into(), "".into(), 0.5.into()],
            ],
        };
        write_sheet(&path, &sheet).unwrap();
        let read = read_sheet(&path).unwrap();
        assert_eq!(read.sheet_name, "Inventory Week");
        assert_eq!(read.header, sheet.header);
        assert_eq!(read.body[0], sheet.body[0]);
        assert_eq!(read.body[1][2], CellValue::Number(0.5));
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_cell_position_rejects_overflow() {
        assert_eq!(cell_position(3, 7).unwrap(), (3, 7));
        assert!(matches!(cell_position(0, 70_000), Err(SheetError::TooLarge)));
    }

    #[test]
    fn test_xls_cannot_be_written() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = RawSheet {
            sheet_name: "S".to_string(),
            header: vec!["A".to_string()],
            body: vec![],
        };
        assert!(write_sheet(&dir.path().join("legacy.xls"), &sheet).is_err());
    }
}
