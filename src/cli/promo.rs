use crate::config::AppConfig;
use crate::export::{self, ExportFormat};
use crate::models::ReportDocument;
use crate::stages::{self, StageSession};
use crate::Result;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Preset distribution channels, in menu order
pub const CHANNELS: [&str; 6] = [
    "가정통신문/알림장 (학부모 대상)",
    "블로그/SNS (수강생 모집용)",
    "전단지/포스터 (오프라인)",
    "문자/카톡 안내 메시지",
    "학교 홈페이지 공지",
    "학부모 설명회 대본",
];

pub fn list_channels() {
    println!("{}", "📣 배포 채널".cyan().bold());
    for (i, channel) in CHANNELS.iter().enumerate() {
        println!("   {}. {}", i + 1, channel);
    }
}

pub async fn run(
    state_dir: Option<&Path>,
    channel: Option<usize>,
    benefit: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = AppConfig::load()?;
    let client = super::build_client(&config)?;
    let store = super::open_program_store(state_dir)?;
    let state = store.state();

    if !state.has_plan() {
        anyhow::bail!("커리큘럼이 없습니다. 먼저 edumaster plan을 실행하세요");
    }

    let channel = match channel {
        Some(n) if (1..=CHANNELS.len()).contains(&n) => CHANNELS[n - 1],
        Some(n) => {
            anyhow::bail!("채널 번호는 1에서 {} 사이여야 합니다: {}", CHANNELS.len(), n)
        }
        None => CHANNELS[0],
    };

    // Unspecified benefit falls back to a sentence built from the goal
    let benefit = match benefit.filter(|b| !b.trim().is_empty()) {
        Some(b) => b,
        None => format!("이 수업을 통해 {} 할 수 있습니다.", state.learning_goal),
    };

    println!("{}", "📣 홍보 문구 생성".cyan().bold());
    println!("   채널: {}", channel);
    println!();

    let mut session = StageSession::new();
    let copy = stages::generate_promo(&client, state, &mut session, &benefit, channel, |fragment| {
        print!("{}", fragment);
        let _ = std::io::stdout().flush();
    })
    .await?;

    println!();
    println!();

    if let Some(out) = out {
        let document = ReportDocument {
            main: copy,
            answer_key: None,
        };
        let bytes = export::render(
            &crate::models::Artifact::MarkdownReport(document),
            ExportFormat::Doc,
            &state.topic,
        )?;
        std::fs::write(&out, bytes)?;
        println!(
            "{}",
            format!("✅ 저장 완료: {}", out.display()).green()
        );
    } else {
        println!(
            "{}",
            "ℹ️  홍보 문구는 저장되지 않습니다. 파일로 받으려면 --out을 사용하세요".bright_black()
        );
    }
    Ok(())
}
