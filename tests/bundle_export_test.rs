//! End-to-end batch export: generate missing materials through a scripted
//! client, render each kind, and pack the results into a zip bundle.

use edumaster::client::{GenerateError, MockClient};
use edumaster::export::{self, BundleEntry, ExportFormat};
use edumaster::models::MaterialKind;
use edumaster::parser;
use edumaster::stages;
use edumaster::state::ProgramStore;
use std::io::Read;
use std::time::Duration;
use tempfile::TempDir;

fn seeded_store(dir: &TempDir) -> ProgramStore {
    let mut store = ProgramStore::load(dir.path()).unwrap();
    store.update(|s| {
        s.topic = "AI 리터러시 교육".to_string();
        s.target_audience = "초등학교 5학년".to_string();
        s.learning_goal = "AI를 비판적으로 이해한다".to_string();
        s.curriculum = Some("# 커리큘럼\n1주차: 개요".to_string());
    });
    store
}

fn material_text(kind: MaterialKind) -> String {
    match kind {
        MaterialKind::SlideOutline => {
            "# Slide 1: 개요\n- AI란 무엇인가\n\n# Slide 2: 활동\n- 토론".to_string()
        }
        other => format!("# {}\n본문입니다", other.short_name()),
    }
}

#[tokio::test]
async fn bundle_contains_six_correctly_named_entries() {
    let dir = TempDir::new().unwrap();
    let mut store = seeded_store(&dir);

    // Two kinds cached up front, the remaining four come from the client
    store.update(|s| {
        s.material_cache
            .insert(MaterialKind::LessonPlan, material_text(MaterialKind::LessonPlan));
        s.material_cache
            .insert(MaterialKind::Quiz, material_text(MaterialKind::Quiz));
    });

    let client = MockClient::new();
    for kind in [
        MaterialKind::Script,
        MaterialKind::SlideOutline,
        MaterialKind::Worksheet,
        MaterialKind::Checklist,
    ] {
        client.push_text(material_text(kind));
    }

    let materials = stages::generate_missing(&client, &mut store, Duration::ZERO, |_| {})
        .await
        .unwrap();
    assert_eq!(materials.len(), 6);
    assert_eq!(client.call_count(), 4);

    let topic = store.state().topic.clone();
    let mut entries = Vec::new();
    for (i, (kind, content)) in materials.iter().enumerate() {
        let format = ExportFormat::for_kind(*kind);
        let artifact = match kind {
            MaterialKind::SlideOutline => {
                edumaster::models::Artifact::SlideDeck(parser::parse_slides(content).unwrap())
            }
            _ => edumaster::models::Artifact::MarkdownReport(parser::parse_report(content).unwrap()),
        };
        entries.push(BundleEntry {
            name: format!(
                "{}.{}",
                export::bundle_file_stem(i, *kind, &topic),
                format.extension()
            ),
            bytes: export::render(&artifact, format, &topic).unwrap(),
        });
    }

    let zip_path = dir.path().join("bundle.zip");
    let count = export::write_bundle(&topic, &entries, &zip_path).unwrap();
    assert_eq!(count, 6);

    let file = std::fs::File::open(&zip_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    let folder = "AI_리터러시_교육_materials";
    assert!(names.contains(&format!("{}/1_lesson_plan_AI 리터러시 교육.doc", folder)));
    assert!(names.contains(&format!("{}/2_script_AI 리터러시 교육.doc", folder)));
    assert!(names.contains(&format!("{}/3_ppt_outline_AI 리터러시 교육.pptx", folder)));
    assert!(names.contains(&format!("{}/4_worksheet_AI 리터러시 교육.doc", folder)));
    assert!(names.contains(&format!("{}/5_quiz_AI 리터러시 교육.doc", folder)));
    assert!(names.contains(&format!("{}/6_checklist_AI 리터러시 교육.doc", folder)));

    // The pptx entry is a real OOXML package
    let mut pptx_bytes = Vec::new();
    archive
        .by_name(&format!("{}/3_ppt_outline_AI 리터러시 교육.pptx", folder))
        .unwrap()
        .read_to_end(&mut pptx_bytes)
        .unwrap();
    let inner = zip::ZipArchive::new(std::io::Cursor::new(pptx_bytes)).unwrap();
    assert!(inner.file_names().any(|n| n == "ppt/presentation.xml"));
}

#[tokio::test]
async fn mid_batch_failure_keeps_earlier_materials_cached() {
    let dir = TempDir::new().unwrap();
    let mut store = seeded_store(&dir);

    let client = MockClient::new();
    client.push_text(material_text(MaterialKind::LessonPlan));
    client.push_text(material_text(MaterialKind::Script));
    client.push_failure(GenerateError::Overloaded("503".to_string()));

    let result = stages::generate_missing(&client, &mut store, Duration::ZERO, |_| {}).await;
    assert!(result.is_err());

    store.save_if_dirty().unwrap();
    let reloaded = ProgramStore::load(dir.path()).unwrap();
    let cache = &reloaded.state().material_cache;
    assert!(cache.contains_key(&MaterialKind::LessonPlan));
    assert!(cache.contains_key(&MaterialKind::Script));
    assert!(!cache.contains_key(&MaterialKind::SlideOutline));

    // A rerun only has to generate what is still missing
    for kind in [
        MaterialKind::SlideOutline,
        MaterialKind::Worksheet,
        MaterialKind::Quiz,
        MaterialKind::Checklist,
    ] {
        client.push_text(material_text(kind));
    }
    let materials = stages::generate_missing(&client, &mut store, Duration::ZERO, |_| {})
        .await
        .unwrap();
    assert_eq!(materials.len(), 6);
}
