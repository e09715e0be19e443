// Sheet loading: spreadsheet files -> GridSheet

pub mod csv;
pub mod xlsx;

use std::path::Path;

use fiberaudit_recon::GridSheet;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
    #[error("failed to open workbook {path}: {message}")]
    Open { path: String, message: String },
    #[error("workbook {path} contains no sheets")]
    NoSheets { path: String },
    #[error("workbook {path} has no sheet {sheet}")]
    SheetNotFound { path: String, sheet: String },
    #[error("unsupported file type: {path} (expected .csv, .tsv, .xlsx, .xlsm, .xls, .xlsb or .ods)")]
    UnsupportedFormat { path: String },
    #[error("CSV error in {path}: {message}")]
    Csv { path: String, message: String },
}

/// Which sheet of a workbook to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl SheetSelector {
    /// Numeric text selects by 0-based position, anything else by name.
    pub fn parse(s: &str) -> Self {
        match s.parse::<usize>() {
            Ok(i) => Self::Index(i),
            Err(_) => Self::Name(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Tsv,
    Workbook,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Load one sheet from any supported file. CSV/TSV files have a single
/// sheet and ignore the selector.
pub fn load_sheet(path: &Path, selector: &SheetSelector) -> Result<GridSheet, SheetError> {
    let format = SheetFormat::from_path(path).ok_or_else(|| SheetError::UnsupportedFormat {
        path: path.display().to_string(),
    })?;

    match format {
        SheetFormat::Csv => csv::import(path),
        SheetFormat::Tsv => csv::import_with_delimiter(path, b'\t'),
        SheetFormat::Workbook => xlsx::import(path, selector),
    }
}

/// Load a workbook whose first sheet is the ledger and second the export.
pub fn load_sheet_pair(path: &Path) -> Result<(GridSheet, GridSheet), SheetError> {
    if SheetFormat::from_path(path) != Some(SheetFormat::Workbook) {
        return Err(SheetError::UnsupportedFormat {
            path: path.display().to_string(),
        });
    }
    let ledger = xlsx::import(path, &SheetSelector::Index(0))?;
    let exported = xlsx::import(path, &SheetSelector::Index(1))?;
    Ok((ledger, exported))
}
