use crate::config::AppConfig;
use crate::export::{self, ExportFormat};
use crate::models::{Artifact, ReportDocument};
use crate::parser;
use crate::stages::{self, StageSession};
use crate::Result;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Analyze feedback data. The data comes from a file (`.csv`, `.xlsx`,
/// `.xls`, `.txt`, `.md`), from a literal argument, or from the answers
/// collected with `survey fill`.
pub async fn run(
    state_dir: Option<&Path>,
    file: Option<PathBuf>,
    data: Option<String>,
    collected: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = AppConfig::load()?;
    let client = super::build_client(&config)?;
    let store = super::open_program_store(state_dir)?;
    let state = store.state();

    if !state.has_plan() {
        anyhow::bail!("커리큘럼이 없습니다. 먼저 edumaster plan을 실행하세요");
    }

    let data = if let Some(path) = file {
        println!(
            "{}",
            format!("📂 파일에서 데이터를 읽는 중: {}", path.display()).bright_black()
        );
        parser::flatten_data_file(&path)?
    } else if let Some(data) = data {
        data
    } else if collected {
        collected_answers_text(state_dir)?
    } else {
        anyhow::bail!("분석할 데이터가 없습니다. --file, --data 또는 --collected를 지정하세요");
    };

    if data.trim().is_empty() {
        anyhow::bail!("분석할 데이터가 비어 있습니다");
    }

    println!("{}", "📊 피드백 분석".cyan().bold());
    println!();

    let mut session = StageSession::new();
    let report = stages::analyze_feedback(&client, state, &mut session, &data, |fragment| {
        print!("{}", fragment);
        let _ = std::io::stdout().flush();
    })
    .await?;

    println!();
    println!();

    if let Some(out) = out {
        let document = ReportDocument {
            main: report,
            answer_key: None,
        };
        let bytes = export::render(
            &Artifact::MarkdownReport(document),
            ExportFormat::Doc,
            &state.topic,
        )?;
        std::fs::write(&out, bytes)?;
        println!(
            "{}",
            format!("✅ 분석 리포트 저장 완료: {}", out.display()).green()
        );
    }
    Ok(())
}

/// Flatten collected survey responses into analyzable lines, one
/// `question: answer` pair per line.
fn collected_answers_text(state_dir: Option<&Path>) -> Result<String> {
    let survey_store = super::open_survey_store(state_dir)?;
    let schema = survey_store
        .load_schema()?
        .ok_or_else(|| anyhow::anyhow!("설문지가 없습니다. 먼저 edumaster survey create를 실행하세요"))?;
    let respondents = survey_store.load_answers()?;
    if respondents.is_empty() {
        anyhow::bail!("수집된 응답이 없습니다. 먼저 edumaster survey fill을 실행하세요");
    }

    let mut text = String::new();
    for (i, answers) in respondents.iter().enumerate() {
        text.push_str(&format!("[응답 {}]\n", i + 1));
        for question in &schema.questions {
            if let Some(value) = answers.get(&question.id) {
                text.push_str(&format!("{}: {}\n", question.title, value.display()));
            }
        }
        text.push('\n');
    }
    Ok(text)
}
