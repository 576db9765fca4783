use crate::config::AppConfig;
use crate::export::{self, ExportFormat};
use crate::models::{AnswerValue, Artifact, QuestionType, SurveyAnswers, SurveySchema};
use crate::parser::MalformedSurvey;
use crate::stages;
use crate::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use std::path::{Path, PathBuf};

/// Generate a survey draft for the planned course. An existing draft is
/// only replaced after confirmation since its collected answers go with it.
pub async fn create(state_dir: Option<&Path>, force: bool) -> Result<()> {
    let config = AppConfig::load()?;
    let client = super::build_client(&config)?;
    let program = super::open_program_store(state_dir)?;
    let survey_store = super::open_survey_store(state_dir)?;

    if !program.state().has_plan() {
        anyhow::bail!("커리큘럼이 없습니다. 먼저 edumaster plan을 실행하세요");
    }

    if survey_store.has_schema() && !force {
        let confirmed = Confirm::new()
            .with_prompt("기존 설문지와 수집된 응답이 모두 삭제됩니다. 계속할까요?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "취소되었습니다".yellow());
            return Ok(());
        }
    }

    let pb = super::spinner("설문지 생성 중...");
    let result = stages::create_survey(&client, program.state()).await;
    pb.finish_and_clear();

    let schema = match result {
        Ok(schema) => schema,
        Err(e) => {
            if let Some(malformed) = e.downcast_ref::<MalformedSurvey>() {
                println!("{}", "⚠️  응답이 설문지 형식이 아닙니다. 원문:".yellow());
                println!();
                println!("{}", malformed.raw);
            }
            return Err(e);
        }
    };

    survey_store.save_schema(&schema)?;

    println!("{}", format!("📋 {}", schema.title).cyan().bold());
    println!("   {}", schema.description);
    println!();
    print_questions(&schema);
    println!();
    println!(
        "{}",
        format!("✅ 설문지 저장 완료 ({}문항)", schema.questions.len()).green()
    );
    println!(
        "   {}",
        "응답 입력: edumaster survey fill / 인쇄용 내보내기: edumaster survey export".bright_black()
    );
    Ok(())
}

pub fn show(state_dir: Option<&Path>) -> Result<()> {
    let survey_store = super::open_survey_store(state_dir)?;
    let schema = survey_store
        .load_schema()?
        .ok_or_else(|| anyhow::anyhow!("설문지가 없습니다. 먼저 edumaster survey create를 실행하세요"))?;

    println!("{}", format!("📋 {}", schema.title).cyan().bold());
    println!("   {}", schema.description);
    println!();
    print_questions(&schema);

    let respondents = survey_store.load_answers()?;
    println!();
    println!("   수집된 응답: {}건", respondents.len());
    Ok(())
}

/// Walk through the survey question by question, saving a draft after every
/// answer so an interrupted session can resume where it left off.
pub fn fill(state_dir: Option<&Path>) -> Result<()> {
    let survey_store = super::open_survey_store(state_dir)?;
    let schema = survey_store
        .load_schema()?
        .ok_or_else(|| anyhow::anyhow!("설문지가 없습니다. 먼저 edumaster survey create를 실행하세요"))?;

    let mut draft = match survey_store.load_fill_draft()? {
        Some(draft) => {
            println!("{}", "ℹ️  이전에 작성하던 응답을 이어서 진행합니다".blue());
            draft
        }
        None => SurveyAnswers::new(),
    };

    println!("{}", format!("📋 {}", schema.title).cyan().bold());
    println!("   {}", schema.description);
    println!();

    for (idx, question) in schema.questions.iter().enumerate() {
        if draft.contains_key(&question.id) {
            continue;
        }
        let required = if question.required { " *" } else { "" };
        let prompt = format!("{}. {}{}", idx + 1, question.title, required);

        let answer = match question.effective_type() {
            QuestionType::ShortAnswer | QuestionType::Paragraph => {
                let text: String = Input::new()
                    .with_prompt(&prompt)
                    .allow_empty(!question.required)
                    .interact_text()?;
                if text.trim().is_empty() {
                    continue;
                }
                AnswerValue::Text(text)
            }
            QuestionType::MultipleChoice | QuestionType::Dropdown => {
                let choice = Select::new()
                    .with_prompt(&prompt)
                    .items(&question.options)
                    .default(0)
                    .interact()?;
                AnswerValue::Text(question.options[choice].clone())
            }
            QuestionType::Checkbox => {
                let chosen = MultiSelect::new()
                    .with_prompt(&prompt)
                    .items(&question.options)
                    .interact()?;
                if chosen.is_empty() {
                    continue;
                }
                AnswerValue::Selections(
                    chosen.iter().map(|&i| question.options[i].clone()).collect(),
                )
            }
            QuestionType::LinearScale => {
                let scale = ["1", "2", "3", "4", "5"];
                let choice = Select::new()
                    .with_prompt(&prompt)
                    .items(&scale)
                    .default(0)
                    .interact()?;
                AnswerValue::Scale(choice as u8 + 1)
            }
        };

        draft.insert(question.id.clone(), answer);
        survey_store.save_fill_draft(&draft)?;
    }

    let total = survey_store.append_answers(vec![draft])?;
    survey_store.clear_fill_draft()?;

    println!();
    println!(
        "{}",
        format!("✅ 응답이 저장되었습니다 (총 {}건)", total).green()
    );
    Ok(())
}

/// Export the survey: `.doc` is the printable form, `.xlsx` the collected
/// answer sheet. With `filled` the form carries the most recent response.
pub fn export(
    state_dir: Option<&Path>,
    format: ExportFormat,
    filled: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let survey_store = super::open_survey_store(state_dir)?;
    let schema = survey_store
        .load_schema()?
        .ok_or_else(|| anyhow::anyhow!("설문지가 없습니다. 먼저 edumaster survey create를 실행하세요"))?;

    let respondents = survey_store.load_answers()?;
    let answers = match format {
        ExportFormat::Xlsx => respondents,
        _ if filled => respondents.last().cloned().into_iter().collect(),
        _ => Vec::new(),
    };

    let title = schema.title.clone();
    let artifact = Artifact::Survey { schema, answers };
    let bytes = export::render(&artifact, format, &title)?;

    // Filenames key off the course topic like every other exporter
    let topic = super::open_program_store(state_dir)?.state().topic.clone();
    let path = match out {
        Some(path) => path,
        None => default_export_path(&topic, format),
    };
    std::fs::write(&path, bytes)?;
    println!(
        "{}",
        format!("✅ 저장 완료: {}", path.display()).green()
    );
    Ok(())
}

pub fn reset(state_dir: Option<&Path>, force: bool) -> Result<()> {
    let survey_store = super::open_survey_store(state_dir)?;
    if !survey_store.has_schema() {
        println!("{}", "삭제할 설문지가 없습니다".yellow());
        return Ok(());
    }

    if !force {
        let confirmed = Confirm::new()
            .with_prompt("설문지와 수집된 응답을 모두 삭제할까요?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "취소되었습니다".yellow());
            return Ok(());
        }
    }

    survey_store.reset()?;
    println!("{}", "✅ 설문 데이터가 삭제되었습니다".green());
    Ok(())
}

fn default_export_path(topic: &str, format: ExportFormat) -> PathBuf {
    PathBuf::from(export::export_file_name("Survey", topic, format))
}

fn print_questions(schema: &SurveySchema) {
    for (idx, question) in schema.questions.iter().enumerate() {
        let required = if question.required { " *".red().to_string() } else { String::new() };
        println!(
            "   {}. [{}] {}{}",
            idx + 1,
            question.question_type.label(),
            question.title,
            required
        );
        for option in &question.options {
            println!("      - {}", option);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_export_name_derives_from_topic() {
        assert_eq!(
            default_export_path("AI 리터러시 교육", ExportFormat::Doc),
            PathBuf::from("Survey_AI 리터러시 교육.doc")
        );
        assert_eq!(
            default_export_path("", ExportFormat::Xlsx),
            PathBuf::from("Survey_문서.xlsx")
        );
    }
}
