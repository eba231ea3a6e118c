use crate::domain::{ActivityType, Priority, ScheduleBlock, SubTask};

pub fn default_priorities() -> Vec<Priority> {
    vec![
        Priority::new(1, "Bridge inspection site acceptance"),
        Priority::new(2, "Drone platform user module"),
        Priority::new(3, "API fundamentals"),
    ]
}

pub fn default_schedule() -> Vec<ScheduleBlock> {
    vec![
        block(
            "1",
            "05:30 - 05:40",
            "Wake up",
            ActivityType::MorningRoutine,
            "Wash up, drink water, loosen up.",
            &["Drink a glass of warm water", "Quick stretch"],
        ),
        block(
            "2",
            "05:40 - 06:10",
            "Breakfast & daily plan",
            ActivityType::MorningRoutine,
            "Proper breakfast, write down the three things that matter today.",
            &["Eat a real breakfast", "Confirm today's top 3"],
        ),
        block(
            "3",
            "06:10 - 07:10",
            "Light warm-up",
            ActivityType::DeepWork,
            "Sketch the user module data model, no heavy coding.",
            &["Map out role permissions", "Skim the API outline"],
        ),
        block(
            "4",
            "07:10 - 08:00",
            "Site prep",
            ActivityType::FieldWork,
            "Check gear, sort the checklist, change into work clothes.",
            &[
                "Check drone & batteries",
                "Pack helmet & inspection report",
                "Write the acceptance checklist",
            ],
        ),
        block(
            "5",
            "08:00 - 09:00",
            "Commute (driving)",
            ActivityType::Transit,
            "Drive safe. Voice-note any system ideas.",
            &["Arrive on site safely"],
        ),
        block(
            "6",
            "09:00 - 11:00",
            "Site acceptance (bridge inspection)",
            ActivityType::FieldWork,
            "Go through the checklist. Note candidate database fields and process pain points.",
            &[
                "Walk the acceptance checklist",
                "Note key data fields to upload",
                "Note error-prone drone steps",
            ],
        ),
        block(
            "7",
            "11:00 - 12:00",
            "Wrap-up & return",
            ActivityType::Transit,
            "Pack up on site, lunch, head back.",
            &["Count returned equipment", "Lunch break"],
        ),
        block(
            "8",
            "14:00 - 17:00",
            "Deep work (platform)",
            ActivityType::DeepWork,
            "Drone management system, user module.",
            &[
                "14:00 review site requirements (3-5 items)",
                "14:20 user table & sign-up endpoint",
                "15:30 ten minute eye break",
                "16:30 self-test & plan tomorrow",
            ],
        ),
        block(
            "9",
            "17:30 - 18:00",
            "Strength (dumbbells)",
            ActivityType::Health,
            "2-3 exercises, 3 sets each, about 20 minutes.",
            &["Finish today's sets"],
        ),
        block(
            "10",
            "19:00 - 22:00",
            "API study & practice",
            ActivityType::Learning,
            "HTTP basics, REST, write a demo.",
            &[
                "19:00 API fundamentals",
                "20:00 backend client demo",
                "21:30 review & pick tomorrow's first task",
            ],
        ),
        block(
            "11",
            "22:00 - End",
            "Power down & rest",
            ActivityType::Health,
            "Away from screens, get ready for sleep.",
            &["Phone on silent, off the nightstand"],
        ),
    ]
}

fn block(
    id: &str,
    time_range: &str,
    title: &str,
    activity: ActivityType,
    description: &str,
    sub_tasks: &[&str],
) -> ScheduleBlock {
    ScheduleBlock {
        id: id.to_string(),
        time_range: time_range.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        activity,
        sub_tasks: sub_tasks
            .iter()
            .enumerate()
            .map(|(index, text)| SubTask::new(format!("{id}-{}", index + 1), *text))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{default_priorities, default_schedule};

    #[test]
    fn template_ids_are_fixed_and_unique() {
        let schedule = default_schedule();
        let ids = schedule.iter().map(|block| block.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"]);

        let sub_task_ids = schedule
            .iter()
            .flat_map(|block| block.sub_tasks.iter().map(|task| task.id.clone()))
            .collect::<HashSet<_>>();
        assert_eq!(sub_task_ids.len(), 24);
        assert!(sub_task_ids.contains("8-4"));

        let priority_ids = default_priorities()
            .iter()
            .map(|priority| priority.id)
            .collect::<Vec<_>>();
        assert_eq!(priority_ids, [1, 2, 3]);
    }

    #[test]
    fn template_starts_untouched() {
        assert!(default_schedule()
            .iter()
            .flat_map(|block| &block.sub_tasks)
            .all(|task| !task.completed));
        assert!(default_priorities().iter().all(|priority| !priority.done));
    }
}
