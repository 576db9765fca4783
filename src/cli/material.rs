use crate::config::AppConfig;
use crate::models::MaterialKind;
use crate::stages::{self, StageSession};
use crate::Result;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

pub async fn run(
    state_dir: Option<&Path>,
    kind: MaterialKind,
    count: Option<u32>,
) -> Result<()> {
    let config = AppConfig::load()?;
    let client = super::build_client(&config)?;
    let mut store = super::open_program_store(state_dir)?;

    if !store.state().has_plan() {
        anyhow::bail!("커리큘럼이 없습니다. 먼저 edumaster plan을 실행하세요");
    }

    println!(
        "{}",
        format!("📚 {} 생성", kind.display_name()).cyan().bold()
    );
    if store.state().material_cache.contains_key(&kind) {
        println!(
            "   {}",
            "기존 자료를 새로 생성합니다 (캐시 덮어쓰기)".yellow()
        );
    }
    println!();

    let mut session = StageSession::new();
    let result = stages::generate_material(
        &client,
        &mut store,
        &mut session,
        kind,
        count,
        |fragment| {
            print!("{}", fragment);
            let _ = std::io::stdout().flush();
        },
    )
    .await;

    store.save_if_dirty()?;

    result?;
    println!();
    println!();
    println!(
        "{}",
        format!("✅ {} 저장 완료", kind.short_name()).green()
    );
    println!(
        "   {}",
        format!("내보내기: edumaster export {}", kind.cli_name()).bright_black()
    );
    Ok(())
}
