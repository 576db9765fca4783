//! Zip bundle for batch-exported materials

use crate::models::MaterialKind;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One finished file destined for the bundle
#[derive(Debug, Clone)]
pub struct BundleEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Bundle folder name: topic with whitespace collapsed to underscores
pub fn bundle_folder(topic: &str) -> String {
    let joined = topic.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{joined}_materials")
}

/// Entry file stem: position, kind id, and the topic truncated to ten
/// characters
pub fn bundle_file_stem(index: usize, kind: MaterialKind, topic: &str) -> String {
    let short_topic: String = topic.chars().take(10).collect();
    format!("{}_{}_{}", index + 1, kind.id(), short_topic)
}

/// Write all entries under the bundle folder into a zip at `out_path`
pub fn write_bundle(topic: &str, entries: &[BundleEntry], out_path: &Path) -> Result<usize> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    let out_file = File::create(out_path)
        .with_context(|| format!("failed to create {}", out_path.display()))?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let folder = bundle_folder(topic);
    for entry in entries {
        let path = format!("{}/{}", folder, entry.name);
        zip.start_file(&path, opts)
            .with_context(|| format!("failed to start entry {path}"))?;
        zip.write_all(&entry.bytes)
            .with_context(|| format!("failed to write entry {path}"))?;
    }

    zip.finish().context("failed to finish bundle")?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_folder_and_stem_naming() {
        assert_eq!(bundle_folder("AI 리터러시 교육"), "AI_리터러시_교육_materials");
        assert_eq!(
            bundle_file_stem(2, MaterialKind::SlideOutline, "아주 긴 교육 주제 이름입니다"),
            "3_ppt_outline_아주 긴 교육 주제"
        );
    }

    #[test]
    fn test_bundle_contains_entries_under_folder() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("bundle.zip");
        let entries = vec![
            BundleEntry {
                name: "1_lesson_plan_주제.doc".to_string(),
                bytes: b"doc bytes".to_vec(),
            },
            BundleEntry {
                name: "3_ppt_outline_주제.pptx".to_string(),
                bytes: b"pptx bytes".to_vec(),
            },
        ];

        let count = write_bundle("교육 주제", &entries, &out).unwrap();
        assert_eq!(count, 2);

        let mut archive = zip::ZipArchive::new(File::open(&out).unwrap()).unwrap();
        let mut entry = archive
            .by_name("교육_주제_materials/1_lesson_plan_주제.doc")
            .unwrap();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"doc bytes");
    }
}
