use crate::models::MaterialKind;
use crate::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(state_dir: Option<&Path>) -> Result<()> {
    let store = super::open_program_store(state_dir)?;
    let survey_store = super::open_survey_store(state_dir)?;
    let state = store.state();

    println!("{}", "📋 edumaster 상태".cyan().bold());
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black()
    );
    println!();

    if !state.has_plan() {
        println!("{}", "아직 설계된 과정이 없습니다".yellow());
        println!(
            "   {}",
            "edumaster plan <topic> 으로 시작하세요".bright_black()
        );
        return Ok(());
    }

    println!("   주제: {}", state.topic.bold());
    if !state.target_audience.is_empty() {
        println!("   대상: {}", state.target_audience);
    }
    if !state.learning_goal.is_empty() {
        println!("   목표: {}", state.learning_goal);
    }
    match &state.schedule {
        Some(schedule) => {
            println!(
                "   일정: {} ({})",
                schedule.summary(),
                schedule.intensity_label()
            );
        }
        None if !state.duration.is_empty() => {
            println!("   기간: {}", state.duration);
        }
        None => {}
    }
    println!();

    let planned = if state.curriculum.is_some() {
        "✅ 생성됨".green().to_string()
    } else {
        "▫️ 없음".to_string()
    };
    println!("   커리큘럼: {}", planned);

    println!(
        "   수업 자료: {}/{}종",
        state.material_cache.len(),
        MaterialKind::ALL.len()
    );
    for kind in MaterialKind::ALL {
        let mark = if state.material_cache.contains_key(&kind) {
            "✅"
        } else {
            "▫️"
        };
        println!("      {} {}", mark, kind.short_name());
    }

    println!();
    match survey_store.load_schema()? {
        Some(schema) => {
            let respondents = survey_store.load_answers()?;
            println!(
                "   설문지: ✅ {} ({}문항, 응답 {}건)",
                schema.title,
                schema.questions.len(),
                respondents.len()
            );
        }
        None => println!("   설문지: ▫️ 없음"),
    }

    println!();
    println!(
        "   {}",
        format!(
            "마지막 수정: {}",
            state.last_modified.format("%Y-%m-%d %H:%M UTC")
        )
        .bright_black()
    );
    Ok(())
}
