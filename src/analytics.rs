use serde::Serialize;

use crate::domain::{ActivityType, ScheduleBlock};
use crate::duration::round_tenths;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSlice {
    pub activity: ActivityType,
    pub label: &'static str,
    pub hours: f64,
    pub color: &'static str,
}

pub fn time_allocation(schedule: &[ScheduleBlock]) -> Vec<AllocationSlice> {
    let mut totals = ActivityType::ALL.map(|activity| (activity, 0.0_f64));
    for block in schedule {
        if let Some((_, hours)) = totals
            .iter_mut()
            .find(|(activity, _)| *activity == block.activity)
        {
            *hours += block.hours();
        }
    }

    totals
        .into_iter()
        .map(|(activity, hours)| (activity, round_tenths(hours)))
        .filter(|(_, hours)| *hours > 0.0)
        .map(|(activity, hours)| AllocationSlice {
            activity,
            label: activity.chart_label(),
            hours,
            color: activity.chart_color(),
        })
        .collect()
}

pub fn total_hours(schedule: &[ScheduleBlock]) -> f64 {
    round_tenths(schedule.iter().map(ScheduleBlock::hours).sum())
}

pub fn progress_percent(schedule: &[ScheduleBlock]) -> u8 {
    let total = schedule
        .iter()
        .map(|block| block.sub_tasks.len())
        .sum::<usize>();
    if total == 0 {
        return 0;
    }

    let completed = schedule
        .iter()
        .map(ScheduleBlock::completed_count)
        .sum::<usize>();
    (completed as f64 * 100.0 / total as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use crate::domain::{ActivityType, ScheduleBlock, SubTask};
    use crate::templates::default_schedule;

    use super::{progress_percent, time_allocation, total_hours};

    fn block(id: &str, time_range: &str, activity: ActivityType) -> ScheduleBlock {
        ScheduleBlock {
            time_range: time_range.to_string(),
            activity,
            ..ScheduleBlock::placeholder(id)
        }
    }

    fn with_tasks(mut block: ScheduleBlock, done: &[bool]) -> ScheduleBlock {
        block.sub_tasks = done
            .iter()
            .enumerate()
            .map(|(index, completed)| SubTask {
                completed: *completed,
                ..SubTask::new(format!("{}-{index}", block.id), "task")
            })
            .collect();
        block
    }

    #[test]
    fn single_field_work_slice() {
        let schedule = vec![
            block("a", "09:00 - 10:00", ActivityType::FieldWork),
            block("b", "10:00 - 11:00", ActivityType::FieldWork),
            block("c", "not a range", ActivityType::DeepWork),
            block("d", "12:00 - 12:00", ActivityType::Health),
        ];

        let slices = time_allocation(&schedule);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].activity, ActivityType::FieldWork);
        assert_eq!(slices[0].hours, 2.0);
        assert_eq!(slices[0].label, ActivityType::FieldWork.chart_label());
        assert_eq!(slices[0].color, "#2563EB");
    }

    #[test]
    fn template_allocation_follows_declaration_order() {
        let slices = time_allocation(&default_schedule());
        let summary = slices
            .iter()
            .map(|slice| (slice.activity, slice.hours))
            .collect::<Vec<_>>();

        assert_eq!(
            summary,
            vec![
                (ActivityType::MorningRoutine, 0.7),
                (ActivityType::FieldWork, 2.8),
                (ActivityType::DeepWork, 4.0),
                (ActivityType::Learning, 3.0),
                (ActivityType::Health, 2.5),
                (ActivityType::Transit, 2.0),
            ]
        );
        assert_eq!(total_hours(&default_schedule()), 15.0);
    }

    #[test]
    fn empty_schedule_has_no_slices() {
        assert!(time_allocation(&[]).is_empty());
        assert_eq!(total_hours(&[]), 0.0);
    }

    #[test]
    fn progress_without_sub_tasks_is_zero() {
        let schedule = vec![block("a", "09:00 - 10:00", ActivityType::Learning)];
        assert_eq!(progress_percent(&schedule), 0);
        assert_eq!(progress_percent(&[]), 0);
    }

    #[test]
    fn progress_counts_across_blocks() {
        let schedule = vec![
            with_tasks(block("a", "", ActivityType::Learning), &[true, true]),
            with_tasks(block("b", "", ActivityType::Health), &[true, false]),
        ];
        assert_eq!(progress_percent(&schedule), 75);

        let third = vec![with_tasks(
            block("c", "", ActivityType::Health),
            &[true, false, false],
        )];
        assert_eq!(progress_percent(&third), 33);
    }
}
