//! Background network work and stale-result filtering.
//!
//! Every task is tagged with a generation number per [`TaskType`]. Starting a
//! new task of a type makes older ones of that type stale; their results are
//! dropped when they arrive instead of rendering over newer state.

pub mod manager;

use std::sync::mpsc;

use crate::drive::FolderLink;
use crate::gallery::FolderView;
use crate::nav::CategoryMap;

pub use manager::BackgroundTaskManager;

/// Monotonic per-type request counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Kind of background task. At most one generation of each kind is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    Categories,
    Subfolders,
    Folder,
}

impl TaskType {
    /// Short display name for status bar.
    pub fn short_name(&self) -> &'static str {
        match self {
            TaskType::Categories => "C",
            TaskType::Subfolders => "N",
            TaskType::Folder => "F",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskType::Categories => "Categories",
            TaskType::Subfolders => "Subfolders",
            TaskType::Folder => "Folder",
        }
    }
}

/// What a finished task produced.
#[derive(Debug)]
pub enum TaskOutput {
    Categories(CategoryMap),
    Subfolders {
        category: String,
        folders: Vec<FolderLink>,
    },
    Folder {
        title: String,
        view: Box<FolderView>,
    },
}

impl TaskOutput {
    pub fn task_type(&self) -> TaskType {
        match self {
            TaskOutput::Categories(_) => TaskType::Categories,
            TaskOutput::Subfolders { .. } => TaskType::Subfolders,
            TaskOutput::Folder { .. } => TaskType::Folder,
        }
    }
}

/// A finished task's result, sent back over the manager's channel.
#[derive(Debug)]
pub struct TaskUpdate {
    pub generation: Generation,
    pub output: TaskOutput,
}

/// Handed to the worker; sends the result when the work is done.
pub struct TaskHandle {
    pub task_type: TaskType,
    pub generation: Generation,
    sender: mpsc::Sender<TaskUpdate>,
}

impl TaskHandle {
    pub fn finish(self, output: TaskOutput) {
        debug_assert_eq!(output.task_type(), self.task_type);
        // The receiver only disappears when the app is shutting down.
        let _ = self.sender.send(TaskUpdate {
            generation: self.generation,
            output,
        });
    }
}
