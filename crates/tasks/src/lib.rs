use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Batch task has no subtasks")]
    EmptyBatch,
    #[error("Duplicate task id: {0}")]
    DuplicateId(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Skipped
        )
    }

    /// `Pending` is asked and becomes `Running` or `Skipped`; `Running`
    /// ends `Completed` or `Failed`.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Running)
                | (TaskStatus::Pending, TaskStatus::Skipped)
                | (TaskStatus::Running, TaskStatus::Completed)
                | (TaskStatus::Running, TaskStatus::Failed)
        )
    }
}

/// Non-empty, ordered subtasks of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Task>", into = "Vec<Task>")]
pub struct Subtasks(Vec<Task>);

impl Subtasks {
    pub fn new(tasks: Vec<Task>) -> Result<Self, TaskError> {
        if tasks.is_empty() {
            return Err(TaskError::EmptyBatch);
        }
        Ok(Self(tasks))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> &Task {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.0.iter()
    }
}

impl TryFrom<Vec<Task>> for Subtasks {
    type Error = TaskError;

    fn try_from(tasks: Vec<Task>) -> Result<Self, Self::Error> {
        Self::new(tasks)
    }
}

impl From<Subtasks> for Vec<Task> {
    fn from(subtasks: Subtasks) -> Self {
        subtasks.0
    }
}

impl<'a> IntoIterator for &'a Subtasks {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    Write { path: PathBuf, contents: String },
    MakeDirectory { path: PathBuf },
    Remove { path: PathBuf },
    RunCommand { cwd: PathBuf, cmd: String },
    Batch { subtasks: Subtasks },
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Write { .. } => "write",
            TaskKind::MakeDirectory { .. } => "make_directory",
            TaskKind::Remove { .. } => "remove",
            TaskKind::RunCommand { .. } => "run_command",
            TaskKind::Batch { .. } => "batch",
        }
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, TaskKind::Batch { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
        }
    }

    pub fn write(
        id: impl Into<String>,
        title: impl Into<String>,
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            title,
            TaskKind::Write {
                path: path.into(),
                contents: contents.into(),
            },
        )
    }

    pub fn make_directory(
        id: impl Into<String>,
        title: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(id, title, TaskKind::MakeDirectory { path: path.into() })
    }

    pub fn remove(
        id: impl Into<String>,
        title: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(id, title, TaskKind::Remove { path: path.into() })
    }

    pub fn run_command(
        id: impl Into<String>,
        title: impl Into<String>,
        cwd: impl Into<PathBuf>,
        cmd: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            title,
            TaskKind::RunCommand {
                cwd: cwd.into(),
                cmd: cmd.into(),
            },
        )
    }

    /// Fails with [`TaskError::EmptyBatch`] when `subtasks` is empty.
    pub fn batch(
        id: impl Into<String>,
        title: impl Into<String>,
        subtasks: Vec<Task>,
    ) -> Result<Self, TaskError> {
        Ok(Self::new(
            id,
            title,
            TaskKind::Batch {
                subtasks: Subtasks::new(subtasks)?,
            },
        ))
    }

    /// One-line summary of what the task will do.
    pub fn describe(&self) -> String {
        match &self.kind {
            TaskKind::Write { path, .. } => format!("Write file: {}", path.display()),
            TaskKind::MakeDirectory { path } => format!("Create folder: {}", path.display()),
            TaskKind::Remove { path } => format!("Remove: {}", path.display()),
            TaskKind::RunCommand { cwd, cmd } => {
                format!("Run command: \"{}\" in {}", cmd, cwd.display())
            }
            TaskKind::Batch { subtasks } => format!("Batch: {} subtasks", subtasks.len()),
        }
    }

    /// File an editor should open to preview this task, if any.
    pub fn open_target(&self) -> Option<&Path> {
        match &self.kind {
            TaskKind::Write { path, .. } => Some(path),
            TaskKind::Batch { subtasks } => match &subtasks.first().kind {
                TaskKind::Write { path, .. } => Some(path),
                _ => None,
            },
            _ => None,
        }
    }

    /// Number of leaf tasks, counting through nested batches.
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            TaskKind::Batch { subtasks } => subtasks.iter().map(Task::leaf_count).sum(),
            _ => 1,
        }
    }

    fn collect_ids<'a>(&'a self, seen: &mut HashSet<&'a str>) -> Result<(), TaskError> {
        if !seen.insert(self.id.as_str()) {
            return Err(TaskError::DuplicateId(self.id.clone()));
        }
        if let TaskKind::Batch { subtasks } = &self.kind {
            for sub in subtasks {
                sub.collect_ids(seen)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.title)
    }
}

/// Ordered result of one analysis pass. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTodoList")]
pub struct TodoList {
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct RawTodoList {
    tasks: Vec<Task>,
}

impl TryFrom<RawTodoList> for TodoList {
    type Error = TaskError;

    fn try_from(raw: RawTodoList) -> Result<Self, Self::Error> {
        Self::new(raw.tasks)
    }
}

impl TodoList {
    /// Ids must be unique across the whole list, nested subtasks included.
    pub fn new(tasks: Vec<Task>) -> Result<Self, TaskError> {
        let mut seen = HashSet::new();
        for task in &tasks {
            task.collect_ids(&mut seen)?;
        }
        Ok(Self { tasks })
    }

    pub fn from_json(content: &str) -> Result<Self, TaskError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> Result<String, TaskError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_batch() -> Task {
        Task::batch(
            "multi",
            "Multi edit",
            vec![
                Task::write("multi/a", "Write a", "/ws/a.txt", "a"),
                Task::write("multi/b", "Write b", "/ws/b.txt", "b"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_batch_rejected() {
        let result = Task::batch("empty", "Empty", vec![]);
        assert!(matches!(result, Err(TaskError::EmptyBatch)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = TodoList::new(vec![
            Task::make_directory("dup", "Make dir", "/ws/dir"),
            Task::remove("dup", "Remove", "/ws/old"),
        ]);
        assert!(matches!(result, Err(TaskError::DuplicateId(id)) if id == "dup"));
    }

    #[test]
    fn test_duplicate_ids_in_nested_batch_rejected() {
        let result = TodoList::new(vec![
            Task::write("multi/a", "Clash", "/ws/x", "x"),
            sample_batch(),
        ]);
        assert!(matches!(result, Err(TaskError::DuplicateId(_))));
    }

    #[test]
    fn test_describe() {
        let run = Task::run_command("install", "Install", "/ws", "npm install");
        assert_eq!(run.describe(), "Run command: \"npm install\" in /ws");
        assert_eq!(
            Task::make_directory("d", "Dir", "/ws/d").describe(),
            "Create folder: /ws/d"
        );
        assert_eq!(sample_batch().describe(), "Batch: 2 subtasks");
    }

    #[test]
    fn test_open_target() {
        assert_eq!(
            sample_batch().open_target(),
            Some(Path::new("/ws/a.txt"))
        );
        assert_eq!(Task::remove("r", "Remove", "/ws/r").open_target(), None);
    }

    #[test]
    fn test_leaf_count() {
        let nested = Task::batch(
            "outer",
            "Outer",
            vec![sample_batch(), Task::remove("r", "Remove", "/ws/r")],
        )
        .unwrap();
        assert_eq!(nested.leaf_count(), 3);
    }

    #[test]
    fn test_json_shape() {
        let list = TodoList::new(vec![
            Task::run_command("install", "Install", "/ws", "npm install"),
            sample_batch(),
        ])
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&list.to_json().unwrap()).unwrap();
        assert_eq!(value["tasks"][0]["type"], "run_command");
        assert_eq!(value["tasks"][0]["cmd"], "npm install");
        assert_eq!(value["tasks"][1]["type"], "batch");
        assert_eq!(value["tasks"][1]["subtasks"][1]["path"], "/ws/b.txt");

        let parsed = TodoList::from_json(&list.to_json().unwrap()).unwrap();
        assert_eq!(parsed, list);
    }

    #[test]
    fn test_json_empty_batch_rejected() {
        let json = r#"{"tasks": [{"id": "b", "title": "B", "type": "batch", "subtasks": []}]}"#;
        assert!(TodoList::from_json(json).is_err());
    }

    #[test]
    fn test_json_duplicate_ids_rejected() {
        let json = r#"{"tasks": [
            {"id": "x", "title": "X", "type": "remove", "path": "/a"},
            {"id": "x", "title": "Y", "type": "make_directory", "path": "/b"}
        ]}"#;
        assert!(TodoList::from_json(json).is_err());
    }

    #[test]
    fn test_terminal_status() {
        assert!(TaskStatus::Skipped.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
    }

    #[test]
    fn test_status_transitions() {
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Running));
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Skipped));
        assert!(TaskStatus::Running.can_transition_to(TaskStatus::Completed));
        assert!(TaskStatus::Running.can_transition_to(TaskStatus::Failed));

        assert!(!TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
        assert!(!TaskStatus::Running.can_transition_to(TaskStatus::Skipped));
        assert!(!TaskStatus::Skipped.can_transition_to(TaskStatus::Running));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Failed));
    }
}
