//! Program state: the course being designed across all four stages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Weekly schedule with derived totals.
///
/// `total_sessions` and `total_hours` are derived from the three input
/// factors and must never be stored stale relative to them; construct via
/// [`Schedule::new`] or call [`Schedule::recompute`] after changing a factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub duration_weeks: u32,
    pub sessions_per_week: u32,
    pub hours_per_session: f64,
    pub total_sessions: u32,
    pub total_hours: f64,
}

impl Schedule {
    pub fn new(duration_weeks: u32, sessions_per_week: u32, hours_per_session: f64) -> Self {
        let mut schedule = Self {
            duration_weeks,
            sessions_per_week,
            hours_per_session,
            total_sessions: 0,
            total_hours: 0.0,
        };
        schedule.recompute();
        schedule
    }

    /// Recompute derived totals from the input factors
    pub fn recompute(&mut self) {
        self.total_sessions = self.duration_weeks * self.sessions_per_week;
        self.total_hours = f64::from(self.total_sessions) * self.hours_per_session;
    }

    /// Hours of class time per week
    pub fn weekly_intensity(&self) -> f64 {
        f64::from(self.sessions_per_week) * self.hours_per_session
    }

    /// Human label for the weekly load: standard, high (> 5h/wk), low (< 2h/wk)
    pub fn intensity_label(&self) -> &'static str {
        let intensity = self.weekly_intensity();
        if intensity > 5.0 {
            "high"
        } else if intensity < 2.0 {
            "low"
        } else {
            "standard"
        }
    }

    /// One-line summary embedded into generation payloads
    pub fn summary(&self) -> String {
        format!(
            "총 기간: {}주, 주 {}회, 1회 {}시간 (총 {}회, {}시간)",
            self.duration_weeks,
            self.sessions_per_week,
            self.hours_per_session,
            self.total_sessions,
            self.total_hours
        )
    }
}

/// The six categories of teaching material
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    LessonPlan,
    Script,
    #[value(name = "slide-outline")]
    #[serde(rename = "ppt_outline")]
    SlideOutline,
    Worksheet,
    Quiz,
    Checklist,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 6] = [
        MaterialKind::LessonPlan,
        MaterialKind::Script,
        MaterialKind::SlideOutline,
        MaterialKind::Worksheet,
        MaterialKind::Quiz,
        MaterialKind::Checklist,
    ];

    /// Stable id used for cache keys and export filenames
    pub fn id(&self) -> &'static str {
        match self {
            MaterialKind::LessonPlan => "lesson_plan",
            MaterialKind::Script => "script",
            MaterialKind::SlideOutline => "ppt_outline",
            MaterialKind::Worksheet => "worksheet",
            MaterialKind::Quiz => "quiz",
            MaterialKind::Checklist => "checklist",
        }
    }

    /// Display name sent to the model inside `[Material Type: …]`
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialKind::LessonPlan => "수업 지도안 (Lesson Plan)",
            MaterialKind::Script => "강의 스크립트/대본",
            MaterialKind::SlideOutline => "수업 PPT 구성안",
            MaterialKind::Worksheet => "학습 활동지/워크시트",
            MaterialKind::Quiz => "이해 점검 퀴즈/테스트",
            MaterialKind::Checklist => "수업 준비물 및 체크리스트",
        }
    }

    /// Short name: display name with the parenthesized tail dropped
    pub fn short_name(&self) -> &'static str {
        match self {
            MaterialKind::LessonPlan => "수업 지도안",
            other => other.display_name().split(" (").next().unwrap_or(""),
        }
    }

    /// Name accepted on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            MaterialKind::LessonPlan => "lesson-plan",
            MaterialKind::Script => "script",
            MaterialKind::SlideOutline => "slide-outline",
            MaterialKind::Worksheet => "worksheet",
            MaterialKind::Quiz => "quiz",
            MaterialKind::Checklist => "checklist",
        }
    }

    /// Position in the canonical batch-export ordering
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The in-progress course. Singleton, persisted as whole-object JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramState {
    pub topic: String,
    pub target_audience: String,
    pub student_count: String,
    pub learning_goal: String,
    pub training_type: String,
    pub duration: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,

    /// Last planning-stage output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curriculum: Option<String>,

    /// Last generated text per material kind; entries are created lazily and
    /// overwritten on regeneration, never expired
    pub material_cache: BTreeMap<MaterialKind, String>,

    pub last_modified: DateTime<Utc>,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self {
            topic: String::new(),
            target_audience: String::new(),
            student_count: String::new(),
            learning_goal: String::new(),
            training_type: String::new(),
            duration: String::new(),
            schedule: None,
            curriculum: None,
            material_cache: BTreeMap::new(),
            last_modified: Utc::now(),
        }
    }
}

impl ProgramState {
    /// A plan exists once a topic has been set
    pub fn has_plan(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    /// Course context string shared by the material and promo payloads.
    /// Uses the detailed schedule totals when present, the free-text
    /// duration otherwise.
    pub fn course_context(&self) -> String {
        let mut context = format!(
            "Topic: {}, Target: {}, Students: {}, Goal: {}",
            self.topic, self.target_audience, self.student_count, self.learning_goal
        );
        match &self.schedule {
            Some(s) => {
                context.push_str(&format!(
                    ", Duration: {}주, Sessions: {}회, TotalHours: {}시간",
                    s.duration_weeks, s.total_sessions, s.total_hours
                ));
            }
            None => context.push_str(&format!(", Duration: {}", self.duration)),
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_derived_totals() {
        let s = Schedule::new(8, 2, 1.5);
        assert_eq!(s.total_sessions, 16);
        assert_eq!(s.total_hours, 24.0);
    }

    #[test]
    fn test_schedule_recompute_after_factor_change() {
        let mut s = Schedule::new(4, 1, 1.0);
        assert_eq!(s.total_sessions, 4);

        s.sessions_per_week = 3;
        s.recompute();
        assert_eq!(s.total_sessions, 12);
        assert_eq!(s.total_hours, 12.0);

        s.hours_per_session = 2.5;
        s.recompute();
        assert_eq!(s.total_sessions, 12);
        assert_eq!(s.total_hours, 30.0);
    }

    #[test]
    fn test_intensity_labels() {
        assert_eq!(Schedule::new(4, 3, 2.0).intensity_label(), "high");
        assert_eq!(Schedule::new(4, 1, 1.0).intensity_label(), "low");
        assert_eq!(Schedule::new(4, 2, 1.5).intensity_label(), "standard");
    }

    #[test]
    fn test_material_kind_ids_are_stable() {
        let ids: Vec<&str> = MaterialKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(
            ids,
            vec![
                "lesson_plan",
                "script",
                "ppt_outline",
                "worksheet",
                "quiz",
                "checklist"
            ]
        );
    }

    #[test]
    fn test_course_context_prefers_schedule() {
        let mut state = ProgramState {
            topic: "초등 영어 회화".to_string(),
            duration: "8주 과정 (표준)".to_string(),
            ..Default::default()
        };
        assert!(state.course_context().contains("Duration: 8주 과정 (표준)"));

        state.schedule = Some(Schedule::new(8, 2, 1.0));
        let context = state.course_context();
        assert!(context.contains("Duration: 8주"));
        assert!(context.contains("Sessions: 16회"));
        assert!(context.contains("TotalHours: 16시간"));
    }

    #[test]
    fn test_program_state_json_round_trip() {
        let mut state = ProgramState {
            topic: "파이썬 기초".to_string(),
            target_audience: "중학생".to_string(),
            schedule: Some(Schedule::new(12, 2, 2.0)),
            ..Default::default()
        };
        state
            .material_cache
            .insert(MaterialKind::Quiz, "Q1. ...".to_string());

        let json = serde_json::to_string(&state).unwrap();
        let restored: ProgramState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
