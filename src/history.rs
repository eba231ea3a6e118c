use chrono::{DateTime, Utc};

use crate::domain::{DailyData, HistoryData, Priority, ScheduleBlock, SubTask};
use crate::templates::{default_priorities, default_schedule};

type Clock = Box<dyn Fn() -> DateTime<Utc>>;
type PersistHook = Box<dyn FnMut(&HistoryData)>;

/// Owner of every day's record. `upsert` is the only way a record changes and
/// each upsert hands the full mapping to the persistence hook.
pub struct HistoryStore {
    history: HistoryData,
    clock: Clock,
    hook: Option<PersistHook>,
}

impl HistoryStore {
    pub fn new(history: HistoryData) -> Self {
        Self {
            history,
            clock: Box::new(Utc::now),
            hook: None,
        }
    }

    pub fn with_hook(mut self, hook: impl FnMut(&HistoryData) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn history(&self) -> &HistoryData {
        &self.history
    }

    pub fn contains(&self, key: &str) -> bool {
        self.history.contains_key(key)
    }

    pub fn recorded_days(&self) -> impl Iterator<Item = (&str, &DailyData)> {
        self.history.iter().map(|(key, day)| (key.as_str(), day))
    }

    pub fn record_for(&self, key: &str) -> DailyData {
        self.history
            .get(key)
            .cloned()
            .unwrap_or_else(|| DailyData::from_templates((self.clock)()))
    }

    pub fn upsert(
        &mut self,
        key: &str,
        schedule: Vec<ScheduleBlock>,
        priorities: Vec<Priority>,
    ) -> &HistoryData {
        let record = DailyData {
            schedule,
            priorities,
            last_updated: (self.clock)(),
        };
        tracing::debug!(
            date = key,
            blocks = record.schedule.len(),
            priorities = record.priorities.len(),
            "record upserted"
        );
        self.history.insert(key.to_string(), record);

        if let Some(hook) = self.hook.as_mut() {
            hook(&self.history);
        }
        &self.history
    }

    pub fn toggle_sub_task(&mut self, key: &str, block_id: &str, sub_task_id: &str) -> bool {
        self.edit_block(key, block_id, |block| match block.sub_task_mut(sub_task_id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        })
    }

    pub fn update_block(&mut self, key: &str, updated: ScheduleBlock) -> bool {
        let block_id = updated.id.clone();
        self.edit_block(key, &block_id, move |block| {
            *block = updated;
            true
        })
    }

    pub fn delete_block(&mut self, key: &str, block_id: &str) -> bool {
        self.edit_schedule(key, |schedule| {
            let before = schedule.len();
            schedule.retain(|block| block.id != block_id);
            schedule.len() != before
        })
    }

    pub fn add_block(&mut self, key: &str) -> String {
        let day = self.record_for(key);
        let id = day.next_block_id((self.clock)());
        let mut schedule = day.schedule;
        schedule.push(ScheduleBlock::placeholder(id.clone()));
        self.upsert(key, schedule, day.priorities);
        id
    }

    pub fn add_sub_task(&mut self, key: &str, block_id: &str, text: &str) -> Option<String> {
        let mut created = None;
        self.edit_block(key, block_id, |block| {
            let id = block.next_sub_task_id();
            block.sub_tasks.push(SubTask::new(id.clone(), text));
            created = Some(id);
            true
        });
        created
    }

    pub fn edit_sub_task(
        &mut self,
        key: &str,
        block_id: &str,
        sub_task_id: &str,
        text: &str,
    ) -> bool {
        self.edit_block(key, block_id, |block| match block.sub_task_mut(sub_task_id) {
            Some(task) => {
                task.text = text.to_string();
                true
            }
            None => false,
        })
    }

    pub fn remove_sub_task(&mut self, key: &str, block_id: &str, sub_task_id: &str) -> bool {
        self.edit_block(key, block_id, |block| {
            let before = block.sub_tasks.len();
            block.sub_tasks.retain(|task| task.id != sub_task_id);
            block.sub_tasks.len() != before
        })
    }

    pub fn update_priorities(&mut self, key: &str, priorities: Vec<Priority>) {
        let day = self.record_for(key);
        self.upsert(key, day.schedule, priorities);
    }

    pub fn toggle_priority(&mut self, key: &str, priority_id: u32) -> bool {
        self.edit_priority(key, priority_id, |priority| priority.done = !priority.done)
    }

    pub fn set_priority_text(&mut self, key: &str, priority_id: u32, text: &str) -> bool {
        self.edit_priority(key, priority_id, |priority| priority.text = text.to_string())
    }

    pub fn reset_to_template(&mut self, key: &str) {
        tracing::info!(date = key, "resetting day to template");
        self.upsert(key, default_schedule(), default_priorities());
    }

    fn edit_schedule(
        &mut self,
        key: &str,
        edit: impl FnOnce(&mut Vec<ScheduleBlock>) -> bool,
    ) -> bool {
        let day = self.record_for(key);
        let mut schedule = day.schedule;
        if !edit(&mut schedule) {
            return false;
        }

        self.upsert(key, schedule, day.priorities);
        true
    }

    fn edit_block(
        &mut self,
        key: &str,
        block_id: &str,
        edit: impl FnOnce(&mut ScheduleBlock) -> bool,
    ) -> bool {
        self.edit_schedule(key, |schedule| {
            schedule
                .iter_mut()
                .find(|block| block.id == block_id)
                .is_some_and(edit)
        })
    }

    fn edit_priority(
        &mut self,
        key: &str,
        priority_id: u32,
        edit: impl FnOnce(&mut Priority),
    ) -> bool {
        let day = self.record_for(key);
        let mut priorities = day.priorities;
        let Some(priority) = priorities.iter_mut().find(|priority| priority.id == priority_id)
        else {
            return false;
        };

        edit(priority);
        self.upsert(key, day.schedule, priorities);
        true
    }
}
