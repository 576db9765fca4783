use crate::config::AppConfig;
use crate::export::{self, archive::BundleEntry, ExportFormat};
use crate::models::{Artifact, MaterialKind};
use crate::parser;
use crate::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub async fn run(
    state_dir: Option<&Path>,
    kind: Option<MaterialKind>,
    plan: bool,
    all: bool,
    format: Option<ExportFormat>,
    out: Option<PathBuf>,
) -> Result<()> {
    if all {
        return run_bundle(state_dir, out).await;
    }
    if plan {
        return export_plan(state_dir, format, out);
    }
    match kind {
        Some(kind) => export_material(state_dir, kind, format, out),
        None => anyhow::bail!("내보낼 대상을 지정하세요: <kind>, --plan 또는 --all"),
    }
}

/// Export the curriculum itself
fn export_plan(
    state_dir: Option<&Path>,
    format: Option<ExportFormat>,
    out: Option<PathBuf>,
) -> Result<()> {
    let store = super::open_program_store(state_dir)?;
    let state = store.state();
    let curriculum = state
        .curriculum
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("커리큘럼이 없습니다. 먼저 edumaster plan을 실행하세요"))?;

    let format = format.unwrap_or(ExportFormat::Doc);
    let artifact = Artifact::MarkdownReport(parser::parse_report(curriculum)?);
    let bytes = export::render(&artifact, format, &state.topic)?;

    let path = match out {
        Some(path) => path,
        None => PathBuf::from(export::export_file_name("Curriculum", &state.topic, format)),
    };
    std::fs::write(&path, bytes)?;
    println!("{}", format!("✅ 저장 완료: {}", path.display()).green());
    Ok(())
}

/// Export one cached material in the chosen format
fn export_material(
    state_dir: Option<&Path>,
    kind: MaterialKind,
    format: Option<ExportFormat>,
    out: Option<PathBuf>,
) -> Result<()> {
    let store = super::open_program_store(state_dir)?;
    let state = store.state();
    let content = state.material_cache.get(&kind).ok_or_else(|| {
        anyhow::anyhow!(
            "캐시된 {}이(가) 없습니다. 먼저 edumaster material {}을(를) 실행하세요",
            kind.short_name(),
            kind.cli_name()
        )
    })?;

    let format = format.unwrap_or_else(|| ExportFormat::for_kind(kind));
    let artifact = material_artifact(kind, content)?;
    let bytes = export::render(&artifact, format, &state.topic)?;

    let path = match out {
        Some(path) => path,
        None => PathBuf::from(export::export_file_name(kind.id(), &state.topic, format)),
    };
    std::fs::write(&path, bytes)?;
    println!("{}", format!("✅ 저장 완료: {}", path.display()).green());
    Ok(())
}

/// Generate anything still missing, render every kind in its natural
/// format, and pack all six files into one zip.
async fn run_bundle(state_dir: Option<&Path>, out: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load()?;
    let mut store = super::open_program_store(state_dir)?;

    if !store.state().has_plan() {
        anyhow::bail!("커리큘럼이 없습니다. 먼저 edumaster plan을 실행하세요");
    }

    println!("{}", "📦 수업 자료 일괄 내보내기".cyan().bold());
    println!();

    let client = super::build_client(&config)?;
    let pb = super::spinner("시작 중...");
    let batch_delay = Duration::from_millis(config.batch_delay_ms);
    let result = crate::stages::generate_missing(&client, &mut store, batch_delay, |progress| {
        let status = if progress.cached { "캐시" } else { "생성" };
        pb.set_message(format!(
            "[{}/{}] {} ({})",
            progress.current,
            progress.total,
            progress.kind.short_name(),
            status
        ));
    })
    .await;

    // Materials finished before a failure stay cached for the next attempt
    store.save_if_dirty()?;
    let materials = match result {
        Ok(materials) => {
            pb.finish_and_clear();
            materials
        }
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    let topic = store.state().topic.clone();
    let mut entries = Vec::with_capacity(materials.len());
    for (i, (kind, content)) in materials.iter().enumerate() {
        let format = ExportFormat::for_kind(*kind);
        let artifact = material_artifact(*kind, content)?;
        let bytes = export::render(&artifact, format, &topic)?;
        entries.push(BundleEntry {
            name: format!(
                "{}.{}",
                export::archive::bundle_file_stem(i, *kind, &topic),
                format.extension()
            ),
            bytes,
        });
    }

    let path = match out {
        Some(path) => path,
        None => PathBuf::from(format!("{}_materials.zip", export::sanitize_title(&topic))),
    };
    let count = export::archive::write_bundle(&topic, &entries, &path)?;
    println!(
        "{}",
        format!("✅ {}개 파일 저장 완료: {}", count, path.display()).green()
    );
    Ok(())
}

fn material_artifact(kind: MaterialKind, content: &str) -> Result<Artifact> {
    let artifact = match kind {
        MaterialKind::SlideOutline => Artifact::SlideDeck(parser::parse_slides(content)?),
        _ => Artifact::MarkdownReport(parser::parse_report(content)?),
    };
    Ok(artifact)
}
