use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use workbench_app::{Cursor, EditorConfig, EditorError, EditorSession};
use workbench_predictor::{NGramModel, SharedModel};
use workbench_tools::{CommandOutput, LocalWorkspace, ToolError, Workspace};

fn session(workspace: Arc<dyn Workspace>) -> EditorSession {
    let model = SharedModel::new(NGramModel::new(3).unwrap());
    EditorSession::new(workspace, model, EditorConfig::default())
}

#[tokio::test]
async fn test_open_seeds_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("story.txt");
    std::fs::write(&path, "the cat sat on the mat. the cat ran.").unwrap();

    let mut editor = session(Arc::new(LocalWorkspace::new()));
    editor.open(&path).await.unwrap();

    assert_eq!(editor.model().predict("the cat"), vec!["sat", "ran"]);
    assert_eq!(editor.file(), Some(path.as_path()));
}

#[tokio::test]
async fn test_open_missing_file_shows_error_and_skips_training() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = session(Arc::new(LocalWorkspace::new()));

    let result = editor.open(&dir.path().join("missing.txt")).await;

    assert!(matches!(result, Err(EditorError::Workspace(_))));
    assert!(editor.content().starts_with("// Error: "));
    assert_eq!(editor.model().context_count(), 0);
}

#[tokio::test]
async fn test_content_changed_suggests_from_cursor_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.rs");
    std::fs::write(&path, "fn main() {}\nfn helper() {}\n").unwrap();

    let mut editor = session(Arc::new(LocalWorkspace::new()));
    editor.open(&path).await.unwrap();

    let text = "fn main() {}\nfn helper() {}\nlet x = 1;\nfn";
    let suggestions = editor.content_changed(text, Cursor::end_of(text)).to_vec();

    // nothing has ever followed (";", "fn")
    assert!(suggestions.is_empty());
    assert_eq!(editor.content(), text);

    let text = "fn main() {}\nfn";
    let suggestions = editor.content_changed(text, Cursor::end_of(text)).to_vec();
    assert_eq!(suggestions, vec!["helper"]);
}

#[tokio::test]
async fn test_save_writes_and_trains() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "").unwrap();

    let mut editor = session(Arc::new(LocalWorkspace::new()));
    editor.open(&path).await.unwrap();

    let text = "red green blue";
    editor.content_changed(text, Cursor::new(1, 1));
    editor.save().await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    // once from the edit, once from the save
    assert_eq!(editor.model().predict_scored("red green")[0].count, 2);
}

#[tokio::test]
async fn test_save_without_file() {
    let mut editor = session(Arc::new(LocalWorkspace::new()));
    assert!(matches!(editor.save().await, Err(EditorError::NoFile)));
}

struct ReadOnlyWorkspace;

#[async_trait]
impl Workspace for ReadOnlyWorkspace {
    async fn read_file(&self, _path: &Path) -> Result<String, ToolError> {
        Ok("alpha beta".to_string())
    }

    async fn write_file(&self, _path: &Path, _contents: &str) -> Result<(), ToolError> {
        Err(ToolError::Io("read-only file system".to_string()))
    }

    async fn make_directory(&self, _path: &Path) -> Result<(), ToolError> {
        Err(ToolError::Io("read-only file system".to_string()))
    }

    async fn remove(&self, _path: &Path) -> Result<(), ToolError> {
        Err(ToolError::Io("read-only file system".to_string()))
    }

    async fn run_command(&self, _cwd: &Path, _cmd: &str) -> Result<CommandOutput, ToolError> {
        Err(ToolError::ExecutionFailed("not supported".to_string()))
    }
}

#[tokio::test]
async fn test_failed_save_still_trains() {
    let mut editor = session(Arc::new(ReadOnlyWorkspace));
    editor.open(Path::new("/ro/file.txt")).await.unwrap();

    editor.content_changed("alpha beta gamma", Cursor::new(1, 1));
    let result = editor.save().await;

    assert!(matches!(result, Err(EditorError::Workspace(_))));
    assert_eq!(editor.model().predict_scored("alpha beta")[0].count, 2);
}

#[tokio::test]
async fn test_sessions_share_one_model() {
    let model = SharedModel::new(NGramModel::new(2).unwrap());
    let workspace: Arc<dyn Workspace> = Arc::new(ReadOnlyWorkspace);
    let mut first = EditorSession::new(workspace.clone(), model.clone(), EditorConfig::default());
    let second = EditorSession::new(workspace, model, EditorConfig::default());

    first.open(Path::new("/ro/a.txt")).await.unwrap();

    assert_eq!(second.model().predict("alpha"), vec!["beta"]);
}
