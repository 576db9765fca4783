use crate::Result;
use colored::Colorize;
use dialoguer::Confirm;
use std::path::Path;

/// Wipe the program, survey, and collected answers
pub fn run(state_dir: Option<&Path>, force: bool) -> Result<()> {
    let mut store = super::open_program_store(state_dir)?;
    let survey_store = super::open_survey_store(state_dir)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt("커리큘럼, 수업 자료, 설문 데이터가 모두 삭제됩니다. 계속할까요?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "취소되었습니다".yellow());
            return Ok(());
        }
    }

    store.reset();
    store.save()?;
    survey_store.reset()?;

    println!("{}", "✅ 초기화되었습니다".green());
    Ok(())
}
