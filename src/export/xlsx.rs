//! Minimal OOXML workbook writer
//!
//! Writes the handful of parts a single-sheet workbook needs, with every
//! cell as an inline string. Column widths are sized from content length,
//! clamped to a readable range.

use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const MIN_COL_WIDTH: f64 = 10.0;
const MAX_COL_WIDTH: f64 = 50.0;
const WIDTH_PER_CHAR: f64 = 1.5;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Result" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

/// Flatten markdown into sheet rows: a title row, then each table row as
/// cells and each non-empty text line as a single-cell row. Table
/// separator lines are dropped and bold markers stripped.
pub fn linearize(title: &str, markdown: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = vec![vec![title.to_string()], vec![]];
    let mut table_rows: Vec<Vec<String>> = Vec::new();

    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('|') && trimmed.ends_with('|') && trimmed.len() > 1 {
            if trimmed.contains("---") {
                continue;
            }
            let parts: Vec<&str> = trimmed.split('|').collect();
            let cells = parts[1..parts.len() - 1]
                .iter()
                .map(|c| c.trim().replace("**", ""))
                .collect();
            table_rows.push(cells);
        } else {
            if !table_rows.is_empty() {
                rows.append(&mut table_rows);
                rows.push(vec![]);
            }
            if !trimmed.is_empty() {
                let clean = trimmed.trim_start_matches('#').trim().replace("**", "");
                rows.push(vec![clean]);
            }
        }
    }
    rows.append(&mut table_rows);
    rows
}

/// Width for each column: the widest cell's length scaled and clamped
pub fn column_widths(rows: &[Vec<String>]) -> Vec<f64> {
    let mut widths: Vec<f64> = Vec::new();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let w = (cell.chars().count() as f64 * WIDTH_PER_CHAR)
                .clamp(MIN_COL_WIDTH, MAX_COL_WIDTH);
            if i >= widths.len() {
                widths.resize(i + 1, 0.0);
            }
            if widths[i] < w {
                widths[i] = w;
            }
        }
    }
    widths
}

/// A1-style column letter for a zero-based index
fn column_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = String::new();
    loop {
        letters.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters
}

fn sheet_xml(rows: &[Vec<String>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    let widths = column_widths(rows);
    if !widths.is_empty() {
        xml.push_str("<cols>");
        for (i, w) in widths.iter().enumerate() {
            xml.push_str(&format!(
                r#"<col min="{n}" max="{n}" width="{w}" customWidth="1"/>"#,
                n = i + 1
            ));
        }
        xml.push_str("</cols>");
    }

    xml.push_str("<sheetData>");
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            xml.push_str(&format!(
                r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                column_letter(c),
                r + 1,
                escape_xml(cell)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Render a markdown document as xlsx bytes
pub fn render_xlsx(title: &str, markdown: &str) -> Result<Vec<u8>> {
    render_rows(&linearize(title, markdown))
}

/// Render prepared sheet rows as xlsx bytes
pub fn render_rows(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows)),
    ];
    for (name, content) in parts {
        zip.start_file(name, opts)
            .with_context(|| format!("failed to start entry {name}"))?;
        zip.write_all(content.as_bytes())
            .with_context(|| format!("failed to write entry {name}"))?;
    }

    let cursor = zip.finish().context("failed to finish workbook")?;
    Ok(cursor.into_inner())
}

pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_linearize_splits_tables_and_text() {
        let markdown = "# 제목 행\n| a | b |\n|---|---|\n| **1** | 2 |\n설명 텍스트";
        let rows = linearize("결과", markdown);
        assert_eq!(rows[0], vec!["결과"]);
        assert_eq!(rows[2], vec!["제목 행"]);
        assert_eq!(rows[3], vec!["a", "b"]);
        assert_eq!(rows[4], vec!["1", "2"]);
        // blank spacer row after the table, then the trailing text
        assert!(rows[5].is_empty());
        assert_eq!(rows[6], vec!["설명 텍스트"]);
    }

    #[test]
    fn test_column_widths_clamped() {
        let rows = vec![
            vec!["ab".to_string(), "x".repeat(100)],
            vec!["중간 길이의 셀 내용".to_string()],
        ];
        let widths = column_widths(&rows);
        assert_eq!(widths[1], 50.0);
        assert!(widths[0] >= 10.0 && widths[0] <= 50.0);
        assert!((widths[0] - 11.0 * 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }

    #[test]
    fn test_workbook_package_structure() {
        let bytes = render_xlsx("결과", "| 가 | 나 |\n|---|---|\n| 1 | 2 |").unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"[Content_Types].xml".to_string()));
        assert!(names.contains(&"xl/worksheets/sheet1.xml".to_string()));

        let mut sheet = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut sheet)
            .unwrap();
        assert!(sheet.contains("<t xml:space=\"preserve\">가</t>"));
        assert!(sheet.contains("t=\"inlineStr\""));
    }

    #[test]
    fn test_cell_values_escaped() {
        let xml = sheet_xml(&[vec!["a < b & c".to_string()]]);
        assert!(xml.contains("a &lt; b &amp; c"));
    }
}
