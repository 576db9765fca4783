//! Feedback data file flattening
//!
//! Uploaded spreadsheets and text files are flattened to one value per
//! line before being embedded in the analysis payload. Cell layout carries
//! no meaning for the analyst prompt; only the values do.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::io::Read;
use std::path::Path;

/// Minimum run length for text recovered from a legacy binary workbook
const MIN_PRINTABLE_RUN: usize = 3;

/// Read a feedback data file and flatten it to one value per line.
/// Supported: `.csv`, `.xlsx`, legacy `.xls`, and plain text.
pub fn flatten_data_file(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(flatten_csv(&content))
        }
        "xlsx" => flatten_xlsx(path),
        "xls" => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(flatten_legacy(&bytes))
        }
        "txt" | "md" | "" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        other => bail!("지원하지 않는 파일 형식입니다: .{other}"),
    }
}

/// CSV cells, one per line, empty cells dropped. Handles quoted fields
/// containing commas and escaped quotes.
pub fn flatten_csv(content: &str) -> String {
    let mut out = String::new();
    for line in content.lines() {
        for cell in split_csv_line(line) {
            let cell = cell.trim();
            if !cell.is_empty() {
                out.push_str(cell);
                out.push('\n');
            }
        }
    }
    out
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}

/// Cell values from the first worksheet of an OOXML workbook, one per line
fn flatten_xlsx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive =
        zip::ZipArchive::new(file).with_context(|| format!("Not a valid xlsx: {}", path.display()))?;

    let shared = match read_archive_entry(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet = read_archive_entry(&mut archive, "xl/worksheets/sheet1.xml")?
        .context("Workbook has no first worksheet")?;
    flatten_sheet(&sheet, &shared)
}

fn read_archive_entry(
    archive: &mut zip::ZipArchive<std::fs::File>,
    name: &str,
) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut content = String::new();
            entry
                .read_to_string(&mut content)
                .with_context(|| format!("Failed to read {name}"))?;
            Ok(Some(content))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to open {name}")),
    }
}

/// Shared string table entries, in index order
fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let re = Regex::new(r"(?s)<si>(.*?)</si>").context("Failed to compile si regex")?;
    let text_re = Regex::new(r"(?s)<t[^>]*>(.*?)</t>").context("Failed to compile t regex")?;

    let mut strings = Vec::new();
    for si in re.captures_iter(xml) {
        let mut value = String::new();
        for t in text_re.captures_iter(&si[1]) {
            value.push_str(&unescape_xml(&t[1]));
        }
        strings.push(value);
    }
    Ok(strings)
}

fn flatten_sheet(xml: &str, shared: &[String]) -> Result<String> {
    // empty cells are self-closing and carry no value
    let empty_re = Regex::new(r"<c\s[^>]*/>").context("empty cell regex")?;
    let xml = empty_re.replace_all(xml, "");

    let cell_re = Regex::new(r"(?s)<c\s([^>]*)>(.*?)</c>").context("cell regex")?;
    let type_re = Regex::new(r#"t="([^"]*)""#).context("cell type regex")?;
    let value_re = Regex::new(r"(?s)<(?:v|t)[^>]*>(.*?)</(?:v|t)>").context("value regex")?;

    let mut out = String::new();
    for cell in cell_re.captures_iter(&xml) {
        let attrs = &cell[1];
        let cell_type = type_re
            .captures(attrs)
            .map(|c| c.get(1).unwrap().as_str().to_string())
            .unwrap_or_default();
        let Some(inner) = value_re.captures(&cell[2]) else {
            continue;
        };
        let raw = unescape_xml(&inner[1]);

        let value = if cell_type == "s" {
            raw.parse::<usize>()
                .ok()
                .and_then(|i| shared.get(i).cloned())
                .unwrap_or(raw)
        } else {
            raw
        };

        let value = value.trim();
        if !value.is_empty() {
            out.push_str(value);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Best-effort recovery from a legacy binary workbook: printable runs of
/// the lossy-decoded bytes, one per line
fn flatten_legacy(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut out = String::new();
    let mut run = String::new();

    for c in text.chars() {
        let printable = !c.is_control() && c != '\u{FFFD}';
        if printable {
            run.push(c);
        } else {
            flush_run(&mut run, &mut out);
        }
    }
    flush_run(&mut run, &mut out);
    out
}

fn flush_run(run: &mut String, out: &mut String) {
    let trimmed = run.trim();
    if trimmed.chars().count() >= MIN_PRINTABLE_RUN
        && trimmed.chars().any(|c| c.is_alphanumeric())
    {
        out.push_str(trimmed);
        out.push('\n');
    }
    run.clear();
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_cells_one_per_line() {
        let csv = "이름,만족도,의견\n김철수,5,좋았어요\n,,\n이영희,4,\"실습, 토론 모두 유익\"";
        let flat = flatten_csv(csv);
        assert_eq!(
            flat,
            "이름\n만족도\n의견\n김철수\n5\n좋았어요\n이영희\n4\n실습, 토론 모두 유익\n"
        );
    }

    #[test]
    fn test_csv_escaped_quotes() {
        let cells = split_csv_line(r#"a,"say ""hi""",c"#);
        assert_eq!(cells, vec!["a", r#"say "hi""#, "c"]);
    }

    #[test]
    fn test_shared_strings_in_order() {
        let xml = r#"<sst><si><t>만족</t></si><si><r><t>아주 </t></r><r><t>좋음</t></r></si></sst>"#;
        let strings = parse_shared_strings(xml).unwrap();
        assert_eq!(strings, vec!["만족", "아주 좋음"]);
    }

    #[test]
    fn test_sheet_resolves_shared_and_inline_values() {
        let shared = vec!["좋았어요".to_string()];
        let xml = r#"<worksheet><sheetData>
            <row><c r="A1" t="s"><v>0</v></c><c r="B1"><v>5</v></c></row>
            <row><c r="A2" t="inlineStr"><is><t>직접 입력</t></is></c></row>
        </sheetData></worksheet>"#;
        let flat = flatten_sheet(xml, &shared).unwrap();
        assert_eq!(flat, "좋았어요\n5\n직접 입력\n");
    }

    #[test]
    fn test_legacy_bytes_keep_printable_runs() {
        let mut bytes = vec![0u8, 1, 2];
        bytes.extend_from_slice("응답자 의견".as_bytes());
        bytes.extend_from_slice(&[0, 0, 7]);
        bytes.extend_from_slice(b"ok");
        bytes.extend_from_slice(&[0]);
        bytes.extend_from_slice(b"score 4");

        let flat = flatten_legacy(&bytes);
        assert_eq!(flat, "응답자 의견\nscore 4\n");
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let err = flatten_data_file(Path::new("data.pdf")).unwrap_err();
        assert!(err.to_string().contains("지원하지 않는 파일 형식"));
    }
}
