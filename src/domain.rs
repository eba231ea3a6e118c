use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use serde::{Deserialize, Serialize};

use crate::duration::block_hours;
use crate::templates::{default_priorities, default_schedule};

const ID_LEN: usize = 6;

pub type HistoryData = BTreeMap<String, DailyData>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    MorningRoutine,
    FieldWork,
    DeepWork,
    Learning,
    Health,
    #[default]
    Transit,
}

impl ActivityType {
    pub const ALL: [ActivityType; 6] = [
        ActivityType::MorningRoutine,
        ActivityType::FieldWork,
        ActivityType::DeepWork,
        ActivityType::Learning,
        ActivityType::Health,
        ActivityType::Transit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActivityType::MorningRoutine => "Morning Routine",
            ActivityType::FieldWork => "Field Work",
            ActivityType::DeepWork => "Deep Work",
            ActivityType::Learning => "Learning",
            ActivityType::Health => "Health",
            ActivityType::Transit => "Transit",
        }
    }

    pub fn chart_label(self) -> &'static str {
        match self {
            ActivityType::MorningRoutine => "Morning Routine",
            ActivityType::FieldWork => "Field Work (on site)",
            ActivityType::DeepWork => "Deep Work",
            ActivityType::Learning => "Learning",
            ActivityType::Health => "Health & Rest",
            ActivityType::Transit => "Transit & Misc",
        }
    }

    pub fn chart_color(self) -> &'static str {
        match self {
            ActivityType::MorningRoutine => "#F97316",
            ActivityType::FieldWork => "#2563EB",
            ActivityType::DeepWork => "#9333EA",
            ActivityType::Learning => "#4F46E5",
            ActivityType::Health => "#10B981",
            ActivityType::Transit => "#94A3B8",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL.into_iter().find(|activity| {
            activity.name().eq_ignore_ascii_case(wanted)
                || activity.cli_name().eq_ignore_ascii_case(wanted)
        })
    }

    pub fn cli_name(self) -> &'static str {
        match self {
            ActivityType::MorningRoutine => "morning-routine",
            ActivityType::FieldWork => "field-work",
            ActivityType::DeepWork => "deep-work",
            ActivityType::Learning => "learning",
            ActivityType::Health => "health",
            ActivityType::Transit => "transit",
        }
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for ActivityType {
    fn from(raw: String) -> Self {
        Self::parse(&raw).unwrap_or_else(|| {
            tracing::warn!(activity = %raw, "unknown activity type, counting it as transit");
            ActivityType::default()
        })
    }
}

impl From<ActivityType> for String {
    fn from(activity: ActivityType) -> Self {
        activity.name().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl SubTask {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    pub id: String,
    pub time_range: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub activity: ActivityType,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
}

impl ScheduleBlock {
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            time_range: "00:00 - 01:00".to_string(),
            title: "New block".to_string(),
            description: Some("Describe this block...".to_string()),
            activity: ActivityType::DeepWork,
            sub_tasks: Vec::new(),
        }
    }

    pub fn hours(&self) -> f64 {
        block_hours(&self.time_range)
    }

    pub fn completed_count(&self) -> usize {
        self.sub_tasks.iter().filter(|task| task.completed).count()
    }

    pub fn all_done(&self) -> bool {
        !self.sub_tasks.is_empty() && self.sub_tasks.iter().all(|task| task.completed)
    }

    pub fn sub_task_mut(&mut self, id: &str) -> Option<&mut SubTask> {
        self.sub_tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn next_sub_task_id(&self) -> String {
        loop {
            let id = format!("{}-{}", self.id, generate_id());
            if self.sub_tasks.iter().all(|task| task.id != id) {
                return id;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Priority {
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyData {
    #[serde(default)]
    pub schedule: Vec<ScheduleBlock>,
    #[serde(default)]
    pub priorities: Vec<Priority>,
    #[serde(default = "never_updated", with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

fn never_updated() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl DailyData {
    pub fn from_templates(now: DateTime<Utc>) -> Self {
        Self {
            schedule: default_schedule(),
            priorities: default_priorities(),
            last_updated: now,
        }
    }

    pub fn block(&self, id: &str) -> Option<&ScheduleBlock> {
        self.schedule.iter().find(|block| block.id == id)
    }

    pub fn next_block_id(&self, now: DateTime<Utc>) -> String {
        let id = format!("new-{}", now.timestamp_millis());
        if self.block(&id).is_none() {
            return id;
        }

        loop {
            let id = format!("new-{}-{}", now.timestamp_millis(), generate_id());
            if self.block(&id).is_none() {
                return id;
            }
        }
    }
}

pub fn generate_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}
