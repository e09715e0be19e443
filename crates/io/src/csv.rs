// CSV/TSV import

use std::io::Read;
use std::path::Path;

use fiberaudit_recon::GridSheet;

use crate::SheetError;

pub fn import(path: &Path) -> Result<GridSheet, SheetError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(path, &content, delimiter)
}

pub fn import_with_delimiter(path: &Path, delimiter: u8) -> Result<GridSheet, SheetError> {
    let content = read_file_as_utf8(path)?;
    import_from_string(path, &content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Title rows often have a single field; judge on the widest line instead.
        let target = counts.iter().copied().max().unwrap_or(0);
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed.
///
/// Ledgers exported by Excel on Chinese-locale machines are GB18030/GBK, so
/// that is the fallback when the bytes are not valid UTF-8.
pub fn read_file_as_utf8(path: &Path) -> Result<String, SheetError> {
    let io_err = |e: std::io::Error| SheetError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            tracing::debug!(path = %path.display(), "not UTF-8, decoding as GB18030");
            let (decoded, _, _) = encoding_rs::GB18030.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
}

fn import_from_string(path: &Path, content: &str, delimiter: u8) -> Result<GridSheet, SheetError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet")
        .to_string();

    GridSheet::from_csv_str(name, content, delimiter).map_err(|e| SheetError::Csv {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
