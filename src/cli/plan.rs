use crate::config::AppConfig;
use crate::models::Schedule;
use crate::stages::{self, PlanRequest, StageSession};
use crate::Result;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    state_dir: Option<&Path>,
    topic: &str,
    target: Vec<String>,
    students: Option<String>,
    goal: Option<String>,
    format: Option<String>,
    duration: Option<String>,
    weeks: Option<u32>,
    sessions_per_week: Option<u32>,
    hours: Option<f64>,
) -> Result<()> {
    let config = AppConfig::load()?;
    let client = super::build_client(&config)?;
    let mut store = super::open_program_store(state_dir)?;

    println!("{}", "🎯 커리큘럼 설계".cyan().bold());
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black()
    );
    println!();

    let schedule = match (weeks, sessions_per_week, hours) {
        (Some(w), Some(s), Some(h)) => Some(Schedule::new(w, s, h)),
        (None, None, None) => None,
        _ => {
            anyhow::bail!("--weeks, --sessions-per-week, --hours는 함께 지정해야 합니다");
        }
    };

    if let Some(schedule) = &schedule {
        println!("   {} ({})", schedule.summary(), schedule.intensity_label());
        println!();
    }

    let request = PlanRequest {
        topic: topic.to_string(),
        target_audience: target.join(", "),
        student_count: students.unwrap_or_default(),
        learning_goal: goal.unwrap_or_default(),
        training_type: format.unwrap_or_default(),
        duration: duration.unwrap_or_default(),
        schedule,
    };

    let mut session = StageSession::new();
    let result = stages::generate_plan(&client, &mut store, &mut session, request, |fragment| {
        print!("{}", fragment);
        let _ = std::io::stdout().flush();
    })
    .await;

    // Inputs were persisted before the call; keep them even on failure
    store.save_if_dirty()?;

    result?;
    println!();
    println!();
    println!("{}", "✅ 커리큘럼이 저장되었습니다".green());
    println!(
        "   {}",
        "다음 단계: edumaster material <kind> 또는 edumaster export --all".bright_black()
    );
    Ok(())
}
