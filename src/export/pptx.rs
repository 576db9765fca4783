//! Minimal OOXML presentation writer
//!
//! Emits a 16:9 deck with one master, one layout, and one theme, then a
//! cover slide followed by the parsed outline. Body content flows down a
//! fixed grid; content past the page limit continues on a follow-up slide
//! titled "(Continued)".

use crate::models::{SlideBlock, SlideContent};
use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

// Layout grid in inches
const MARGIN_X: f64 = 0.5;
const TITLE_Y: f64 = 0.3;
const START_Y: f64 = 1.2;
const MAX_Y: f64 = 6.5;
const LINE_HEIGHT: f64 = 0.5;
const TABLE_ROW_HEIGHT: f64 = 0.5;
const BODY_WIDTH: f64 = 9.0;

// 16:9 slide size
const SLIDE_W_EMU: i64 = 12_192_000;
const SLIDE_H_EMU: i64 = 6_858_000;

const EMU_PER_INCH: f64 = 914_400.0;

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// One positioned element on a rendered slide
#[derive(Debug, Clone, PartialEq)]
enum Element {
    Title(String),
    Text { y: f64, text: String, bullet: bool },
    Table { y: f64, rows: Vec<Vec<String>> },
}

/// A slide after pagination, ready for XML rendering
#[derive(Debug, Clone, PartialEq)]
struct RenderedSlide {
    elements: Vec<Element>,
}

/// Lay the parsed blocks out on the fixed grid, starting a "(Continued)"
/// slide whenever content would run past the page limit
fn paginate(title: &str, blocks: &[SlideBlock]) -> Vec<RenderedSlide> {
    let mut slides = Vec::new();

    // cover
    slides.push(RenderedSlide {
        elements: vec![
            Element::Text {
                y: 2.0,
                text: title.to_string(),
                bullet: false,
            },
            Element::Text {
                y: 3.5,
                text: "수업 자료".to_string(),
                bullet: false,
            },
        ],
    });

    for block in blocks {
        let new_slide = |suffix: &str| RenderedSlide {
            elements: vec![Element::Title(format!("{}{}", block.title, suffix))],
        };

        let mut current = new_slide("");
        let mut y = START_Y;

        for item in &block.content {
            match item {
                SlideContent::Table(rows) => {
                    let table_height = rows.len() as f64 * TABLE_ROW_HEIGHT;
                    if y + table_height > MAX_Y {
                        slides.push(current);
                        current = new_slide(" (Continued)");
                        y = START_Y;
                    }
                    current.elements.push(Element::Table {
                        y,
                        rows: rows.clone(),
                    });
                    y += table_height + 0.5;
                }
                SlideContent::Bullet(text) | SlideContent::Text(text) => {
                    if y > MAX_Y {
                        slides.push(current);
                        current = new_slide(" (Continued)");
                        y = START_Y;
                    }
                    current.elements.push(Element::Text {
                        y,
                        text: text.clone(),
                        bullet: matches!(item, SlideContent::Bullet(_)),
                    });
                    y += LINE_HEIGHT;
                }
            }
        }
        slides.push(current);
    }

    slides
}

fn escape_xml(text: &str) -> String {
    super::xlsx::escape_xml(text)
}

fn text_box_xml(x: f64, y: f64, w: f64, h: f64, text: &str, size_pt: u32, bold: bool, bullet: bool) -> String {
    let bold_attr = if bold { r#" b="1""# } else { "" };
    let bullet_props = if bullet {
        r#"<a:buChar char="•"/>"#
    } else {
        r#"<a:buNone/>"#
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="0" name=""/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{w}" cy="{h}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>
<p:txBody><a:bodyPr wrap="square" anchor="t"/><a:lstStyle/><a:p><a:pPr>{bullet_props}</a:pPr><a:r><a:rPr lang="ko-KR" sz="{sz}"{bold_attr}><a:latin typeface="Malgun Gothic"/><a:ea typeface="Malgun Gothic"/></a:rPr><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        x = emu(x),
        y = emu(y),
        w = emu(w),
        h = emu(h),
        sz = size_pt * 100,
        text = escape_xml(text),
    )
}

fn table_xml(y: f64, rows: &[Vec<String>]) -> String {
    let cols = rows.iter().map(|r| r.len()).max().unwrap_or(1).max(1);
    let col_w = emu(BODY_WIDTH / cols as f64);

    let mut grid = String::new();
    for _ in 0..cols {
        grid.push_str(&format!(r#"<a:gridCol w="{col_w}"/>"#));
    }

    let mut body = String::new();
    for row in rows {
        body.push_str(&format!(r#"<a:tr h="{}">"#, emu(TABLE_ROW_HEIGHT)));
        for c in 0..cols {
            let cell = row.get(c).map(String::as_str).unwrap_or("");
            body.push_str(&format!(
                r#"<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="ko-KR" sz="1200"><a:latin typeface="Malgun Gothic"/><a:ea typeface="Malgun Gothic"/></a:rPr><a:t>{}</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>"#,
                escape_xml(cell)
            ));
        }
        body.push_str("</a:tr>");
    }

    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="0" name=""/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>
<p:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{w}" cy="{h}"/></p:xfrm>
<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr/><a:tblGrid>{grid}</a:tblGrid>{body}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#,
        x = emu(MARGIN_X),
        y = emu(y),
        w = emu(BODY_WIDTH),
        h = emu(rows.len() as f64 * TABLE_ROW_HEIGHT),
    )
}

fn slide_xml(slide: &RenderedSlide) -> String {
    let mut shapes = String::new();
    for element in &slide.elements {
        match element {
            Element::Title(text) => {
                shapes.push_str(&text_box_xml(MARGIN_X, TITLE_Y, BODY_WIDTH, 0.8, text, 24, true, false));
            }
            Element::Text { y, text, bullet } => {
                shapes.push_str(&text_box_xml(
                    MARGIN_X,
                    *y,
                    BODY_WIDTH,
                    LINE_HEIGHT,
                    text,
                    16,
                    false,
                    *bullet,
                ));
            }
            Element::Table { y, rows } => {
                shapes.push_str(&table_xml(*y, rows));
            }
        }
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld>
</p:sld>"#
    )
}

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office">
<a:themeElements>
<a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme>
<a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface="Malgun Gothic"/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface="Malgun Gothic"/><a:cs typeface=""/></a:minorFont></a:fontScheme>
<a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme>
</a:themeElements>
</a:theme>"#;

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld>
<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>
</p:sldMaster>"#;

const SLIDE_MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>
</Relationships>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank">
<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld>
</p:sldLayout>"#;

const SLIDE_LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#;

const SLIDE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
</Relationships>"#;

fn content_types_xml(slide_count: usize) -> String {
    let mut overrides = String::new();
    for i in 1..=slide_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
{overrides}</Types>"#
    )
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#;

fn presentation_xml(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for i in 0..slide_count {
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            i + 2
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
<p:sldIdLst>{slide_ids}</p:sldIdLst>
<p:sldSz cx="{SLIDE_W_EMU}" cy="{SLIDE_H_EMU}"/>
<p:notesSz cx="{SLIDE_H_EMU}" cy="{SLIDE_W_EMU}"/>
</p:presentation>"#
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
    );
    for i in 0..slide_count {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            i + 2,
            i + 1
        ));
    }
    rels.push_str("</Relationships>");
    rels
}

/// Render slide blocks as pptx bytes, with a cover slide carrying `title`
pub fn render_pptx(title: &str, blocks: &[SlideBlock]) -> Result<Vec<u8>> {
    let slides = paginate(title, blocks);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".to_string(), content_types_xml(slides.len())),
        ("_rels/.rels".to_string(), ROOT_RELS.to_string()),
        ("ppt/presentation.xml".to_string(), presentation_xml(slides.len())),
        (
            "ppt/_rels/presentation.xml.rels".to_string(),
            presentation_rels_xml(slides.len()),
        ),
        ("ppt/slideMasters/slideMaster1.xml".to_string(), SLIDE_MASTER.to_string()),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
            SLIDE_MASTER_RELS.to_string(),
        ),
        ("ppt/slideLayouts/slideLayout1.xml".to_string(), SLIDE_LAYOUT.to_string()),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
            SLIDE_LAYOUT_RELS.to_string(),
        ),
        ("ppt/theme/theme1.xml".to_string(), THEME.to_string()),
    ];
    for (i, slide) in slides.iter().enumerate() {
        parts.push((format!("ppt/slides/slide{}.xml", i + 1), slide_xml(slide)));
        parts.push((
            format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
            SLIDE_RELS.to_string(),
        ));
    }

    for (name, content) in &parts {
        zip.start_file(name, opts)
            .with_context(|| format!("failed to start entry {name}"))?;
        zip.write_all(content.as_bytes())
            .with_context(|| format!("failed to write entry {name}"))?;
    }

    let cursor = zip.finish().context("failed to finish presentation")?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(title: &str, content: Vec<SlideContent>) -> SlideBlock {
        SlideBlock {
            title: title.to_string(),
            content,
        }
    }

    #[test]
    fn test_cover_plus_one_slide_per_block() {
        let blocks = vec![
            block("도입", vec![SlideContent::Bullet("인사".to_string())]),
            block("정리", vec![SlideContent::Text("복습".to_string())]),
        ];
        let slides = paginate("AI 리터러시", &blocks);
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[1].elements[0], Element::Title("도입".to_string()));
    }

    #[test]
    fn test_long_block_overflows_to_continued_slide() {
        // 12 lines at 0.5 starting at 1.2 passes 6.5 on line 11
        let lines: Vec<SlideContent> = (0..12)
            .map(|i| SlideContent::Bullet(format!("항목 {i}")))
            .collect();
        let slides = paginate("주제", &[block("전개", lines)]);
        assert_eq!(slides.len(), 3);
        assert_eq!(
            slides[2].elements[0],
            Element::Title("전개 (Continued)".to_string())
        );
    }

    #[test]
    fn test_tall_table_moves_whole_to_next_slide() {
        let rows: Vec<Vec<String>> = (0..8).map(|i| vec![format!("행 {i}")]).collect();
        let content = vec![
            SlideContent::Table(rows.clone()),
            SlideContent::Table(rows.clone()),
        ];
        let slides = paginate("주제", &[block("일정", content)]);
        // second table (4.0in tall) does not fit under the first
        assert_eq!(slides.len(), 3);
        match &slides[2].elements[1] {
            Element::Table { y, rows: r } => {
                assert_eq!(*y, START_Y);
                assert_eq!(r.len(), 8);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_package_has_required_parts() {
        let blocks = vec![block(
            "도입",
            vec![
                SlideContent::Bullet("인사".to_string()),
                SlideContent::Table(vec![vec!["주차".to_string(), "주제".to_string()]]),
            ],
        )];
        let bytes = render_pptx("AI 리터러시", &blocks).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();

        for required in [
            "[Content_Types].xml",
            "ppt/presentation.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
        ] {
            assert!(names.contains(&required.to_string()), "missing {required}");
        }

        use std::io::Read;
        let mut slide2 = String::new();
        archive
            .by_name("ppt/slides/slide2.xml")
            .unwrap()
            .read_to_string(&mut slide2)
            .unwrap();
        assert!(slide2.contains("<a:t>도입</a:t>"));
        assert!(slide2.contains("<a:tbl>"));
    }
}
