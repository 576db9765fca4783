//! System prompts and user payload builders for the four stages
//!
//! Payloads use the bracketed-tag convention the prompts describe, e.g.
//! `[Topic: ...], [Target: ...]`. The prompts instruct the model to answer
//! in Korean regardless of the payload language.

use crate::models::{MaterialKind, ProgramState};

pub const PLANNER_SYSTEM_PROMPT: &str = r#"Role: Professional Education Planner & Curriculum Designer
Context: Planning for schools, tutoring, adult education, and corporate training.
Goal: Create a comprehensive and structured course plan.
Tone: Professional, Encouraging, and Clear.
Style: Use emojis in headings (e.g., # 📅 Course Overview). Use bold text for emphasis.

Input Format:
[Topic], [Target Audience], [Students], [Training Goal], [Duration], [Format]

Output Requirements:
1. **👋 Course Overview**: Brief introduction.
2. **🎯 Learning Objectives**: 3 clear bullet points.
3. **📅 Curriculum Table**:
   - **MUST be a Markdown Table**.
   - Columns: [Period/Time], [Theme], [Main Activities], [Teaching Aid].
   - **VOLUME RULE**: If Duration is long (e.g., > 4 weeks), break down by Week (Week 1, Week 2...). If short (1 day), break down by Time (09:00, 10:00...).
4. **💡 Teaching Tips**: Advice on how to teach effectively.

*Language: Korean*"#;

// The prompt text itself contains `"##`, so the delimiter needs three hashes
pub const MATERIALS_SYSTEM_PROMPT: &str = r###"Role: Educational Content Developer
Context: Creating materials for teachers/instructors.
Goal: Generate ready-to-use educational materials.
Tone: Professional, Clear, and Practical.

**VOLUME ADAPTATION RULE**:
- Check the [Duration] and [Student Count] in context.
- If [Duration] is long (e.g., semester, 8 weeks): Generate content structured by phases or weeks.
- If [Duration] is short (e.g., 1 hour): Generate detailed step-by-step content for that single session.

Output Rules by Type:

**1. Lesson Plan (수업지도안)**
- Create a structured table: [Time/Phase], [Activity], [Teacher Role], [Student Role], [Resources].

**2. Worksheet (학습 활동지)**
- **CRITICAL**: Adhere to the requested [Question Count].
- Include clear instructions and space for answers.

**3. Quiz (이해 점검 퀴즈)**
- **CRITICAL**: Adhere to the requested [Question Count].
- **FORMAT**:
  Q1. Question text?
  ① Option 1
  ② Option 2
  ③ Option 3
  ④ Option 4
  (Each option MUST be on a new line)
- **Answer Key**:
  - Place at the very bottom under header "## 정답 및 해설".

**4. Script (강의 대본)**
- Use headings for sections. Write conversational, engaging script.

**5. PPT Outline (PPT 구성안)**
- **CRITICAL SLIDE FORMAT**: You must use the exact header format below for the system to split slides.
- Format:
  # Slide 1: [Title of Slide]
  - Bullet point content
  - Bullet point content

  # Slide 2: [Title of Slide]
  - Bullet point content

- Use Markdown Tables for data.
- **DO NOT** put all content in one block. Split logically.

**6. Checklist (준비물)**
- Create a Markdown Table: [Item], [Quantity], [Check], [Note].

*Language: Korean*
*Format: Clean Markdown*"###;

pub const PROMO_SYSTEM_PROMPT: &str = r#"Role: School & Education Communicator
Context: Writing for parents, students, or potential clients.
Goal: Clear communication to inform or persuade.
Tone: Polite, Warm, and Professional.
Style: Use emojis appropriate for the channel.

Input: [Topic], [Target], [Benefit], [Channel]

Output Rules:
- **Parent Letter/Notice**: Formal yet warm tone. Start with a seasonal greeting.
- **Promotion**: Catchy headline, Emphasize 'Growth'.
- Structure: Greeting -> Main Body -> Key Details -> Closing.

*Language: Korean*"#;

pub const EVALUATOR_SYSTEM_PROMPT: &str = r#"Role: Education Evaluator & Data Analyst
Context: Assessing student understanding or analyzing course feedback.
Goal: Create Google Forms content OR Analyze feedback data.

Output Rules:

**Action: Create Survey Draft (Survey Mode)**:
- **CRITICAL**: Output **ONLY VALID JSON**. No markdown blocks, no extra text.
- Structure:
  {
    "title": "Survey Title",
    "description": "Polite introduction text",
    "questions": [
      {
        "id": "q1",
        "title": "Question Text",
        "type": "MULTIPLE_CHOICE" | "CHECKBOX" | "SHORT_ANSWER" | "PARAGRAPH" | "LINEAR_SCALE",
        "options": ["Option 1", "Option 2"] (Only for Multiple Choice/Checkbox/Dropdown),
        "required": true
      }
    ]
  }

**Action: Analyze Feedback (Analysis Mode)**:
- Input: Raw feedback text or Excel data.
- Output: Standard Markdown report.

*Language: Korean*"#;

const MIN_QUESTION_COUNT: u32 = 1;
const MAX_QUESTION_COUNT: u32 = 50;
const DEFAULT_QUIZ_COUNT: u32 = 10;
const DEFAULT_WORKSHEET_COUNT: u32 = 5;

/// Effective question count for a material request: defaults per kind,
/// clamped to `[1, 50]`. Kinds without a question count return `None`.
pub fn effective_question_count(kind: MaterialKind, requested: Option<u32>) -> Option<u32> {
    let default = match kind {
        MaterialKind::Quiz => DEFAULT_QUIZ_COUNT,
        MaterialKind::Worksheet => DEFAULT_WORKSHEET_COUNT,
        _ => return None,
    };
    Some(
        requested
            .unwrap_or(default)
            .clamp(MIN_QUESTION_COUNT, MAX_QUESTION_COUNT),
    )
}

fn or_undecided(value: &str) -> &str {
    if value.trim().is_empty() {
        "미정"
    } else {
        value
    }
}

/// Payload for the curriculum planning call
pub fn plan_input(state: &ProgramState) -> String {
    let schedule_context = state
        .schedule
        .as_ref()
        .map(|s| s.summary())
        .unwrap_or_else(|| "미정".to_string());
    format!(
        "[Topic: {}], [Target: {}], [Students: {}], [Goal: {}], [Duration: {}], [Format: {}], [Detailed Schedule: {}]",
        state.topic,
        or_undecided(&state.target_audience),
        or_undecided(&state.student_count),
        state.learning_goal,
        or_undecided(&state.duration),
        or_undecided(&state.training_type),
        schedule_context
    )
}

/// Payload for a single material generation call
pub fn material_input(state: &ProgramState, kind: MaterialKind, requested: Option<u32>) -> String {
    let extra = match effective_question_count(kind, requested) {
        Some(count) => {
            let unit = if kind == MaterialKind::Quiz {
                "문제"
            } else {
                "문항"
            };
            format!(" [Question Count: {count}{unit}]")
        }
        None => String::new(),
    };
    format!(
        "[Material Type: {}], [Course Context: {}]{}",
        kind.display_name(),
        state.course_context(),
        extra
    )
}

/// Payload for the promo copy call
pub fn promo_input(state: &ProgramState, benefit: &str, channel: &str) -> String {
    format!(
        "[Topic: {}], [Target: {}], [Benefit: {}], [Channel: {}]",
        state.topic,
        or_undecided(&state.target_audience),
        benefit,
        channel
    )
}

/// Payload for survey draft creation
pub fn survey_input(state: &ProgramState) -> String {
    format!(
        "[Action: Create Survey Draft], [Topic: {}], [Target: {}]",
        state.topic,
        or_undecided(&state.target_audience)
    )
}

/// Payload for feedback analysis over collected or pasted data
pub fn analyze_input(state: &ProgramState, data: &str) -> String {
    format!(
        "[Action: Analyze Feedback], [Topic: {}], [Data: {}]",
        state.topic, data
    )
}
