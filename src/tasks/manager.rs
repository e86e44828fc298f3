//! Tracks the current generation of each task type and filters completions.

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use tracing::debug;

use super::{Generation, TaskHandle, TaskType, TaskUpdate};

pub struct BackgroundTaskManager {
    sender: mpsc::Sender<TaskUpdate>,
    receiver: mpsc::Receiver<TaskUpdate>,
    /// Latest generation issued per type
    latest: HashMap<TaskType, Generation>,
    /// Types with a current task still outstanding, and when it started
    running: HashMap<TaskType, Instant>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            latest: HashMap::new(),
            running: HashMap::new(),
        }
    }

    /// Start a task of this type, superseding any outstanding one.
    pub fn begin(&mut self, task_type: TaskType) -> TaskHandle {
        let generation = self.bump(task_type);
        self.running.insert(task_type, Instant::now());
        TaskHandle {
            task_type,
            generation,
            sender: self.sender.clone(),
        }
    }

    /// Make any outstanding task of this type stale without starting another.
    pub fn invalidate(&mut self, task_type: TaskType) {
        self.bump(task_type);
        self.running.remove(&task_type);
    }

    fn bump(&mut self, task_type: TaskType) -> Generation {
        let next = self.current(task_type).next();
        self.latest.insert(task_type, next);
        next
    }

    pub fn current(&self, task_type: TaskType) -> Generation {
        self.latest.get(&task_type).copied().unwrap_or_default()
    }

    pub fn is_current(&self, update: &TaskUpdate) -> bool {
        update.generation == self.current(update.output.task_type())
    }

    /// Drain finished tasks, returning only current ones.
    pub fn poll_updates(&mut self) -> Vec<TaskUpdate> {
        let mut fresh = Vec::new();

        while let Ok(update) = self.receiver.try_recv() {
            let task_type = update.output.task_type();
            if self.is_current(&update) {
                self.running.remove(&task_type);
                fresh.push(update);
            } else {
                debug!(
                    task = task_type.display_name(),
                    generation = update.generation.0,
                    current = self.current(task_type).0,
                    "Discarding stale result"
                );
            }
        }

        fresh
    }

    pub fn is_running(&self, task_type: TaskType) -> bool {
        self.running.contains_key(&task_type)
    }

    pub fn has_running_tasks(&self) -> bool {
        !self.running.is_empty()
    }

    /// Outstanding tasks with how long they've been running, oldest first.
    pub fn running_tasks(&self) -> Vec<(TaskType, Duration)> {
        let mut tasks: Vec<(TaskType, Duration)> = self
            .running
            .iter()
            .map(|(task_type, started)| (*task_type, started.elapsed()))
            .collect();
        tasks.sort_by(|a, b| b.1.cmp(&a.1));
        tasks
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}
