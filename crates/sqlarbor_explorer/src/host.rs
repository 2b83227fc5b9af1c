//! Host integration surface.
//!
//! The explorer never talks to a UI toolkit directly; everything the user
//! sees or answers goes through [`ExplorerHost`]. The embedding application
//! implements this trait, tests use a scripted implementation.

use sqlarbor_core::{ConnectionProfile, QueryResult};
use std::path::PathBuf;

/// Answer to a yes/no confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// What a file/folder picker is being opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePurpose {
    /// A `.sql` file to import and execute.
    ImportSql,
    /// A directory to write an export dump into.
    ExportDirectory,
}

/// Everything the explorer needs from the embedding application.
///
/// Prompt methods return `None` when the user dismisses the dialog; the
/// dispatcher treats that as a cancelled command, not an error.
pub trait ExplorerHost: Send + Sync {
    fn confirm(&self, message: &str) -> Confirmation;

    /// Free-text input, optionally pre-filled (e.g. the current name for a
    /// rename).
    fn prompt_input(&self, prompt: &str, initial: Option<&str>) -> Option<String>;

    fn pick_path(&self, purpose: FilePurpose) -> Option<PathBuf>;

    /// Collect a new connection profile, typically via a connect form.
    fn prompt_connection(&self) -> Option<ConnectionProfile>;

    /// Open an editor buffer with the given SQL (templates, generated DDL,
    /// history). An empty string opens a blank query editor.
    fn open_editor(&self, sql: &str);

    /// SQL of the currently focused editor, if any.
    fn active_editor_sql(&self) -> Option<String>;

    fn copy_text(&self, text: &str);

    fn show_results(&self, result: &QueryResult);

    fn notify_info(&self, message: &str);

    fn notify_error(&self, message: &str);
}
