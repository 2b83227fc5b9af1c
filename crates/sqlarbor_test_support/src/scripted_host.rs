use sqlarbor_core::{ConnectionProfile, QueryResult};
use sqlarbor_explorer::{Confirmation, ExplorerHost, FilePurpose};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Scripted [`ExplorerHost`]: prompt answers are queued up front, everything
/// shown to the "user" is recorded for assertions.
///
/// Defaults are the conservative path: confirmations are accepted, input
/// prompts and pickers are dismissed.
#[derive(Default)]
pub struct ScriptedHost {
    confirm_answer: RwLock<Option<Confirmation>>,
    inputs: Mutex<VecDeque<String>>,
    picked_path: RwLock<Option<PathBuf>>,
    connection_answer: RwLock<Option<ConnectionProfile>>,
    editor_sql: RwLock<Option<String>>,

    confirm_prompts: Mutex<Vec<String>>,
    opened_editors: Mutex<Vec<String>>,
    copied: Mutex<Vec<String>>,
    shown_row_counts: Mutex<Vec<usize>>,
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with Declined.
    pub fn declining(self) -> Self {
        *rwlock_write(&self.confirm_answer) = Some(Confirmation::Declined);
        self
    }

    /// Queue an answer for the next input prompt. Prompts beyond the queued
    /// answers are dismissed.
    pub fn with_input(self, input: impl Into<String>) -> Self {
        mutex_lock(&self.inputs).push_back(input.into());
        self
    }

    pub fn with_picked_path(self, path: impl Into<PathBuf>) -> Self {
        *rwlock_write(&self.picked_path) = Some(path.into());
        self
    }

    pub fn with_connection_answer(self, profile: ConnectionProfile) -> Self {
        *rwlock_write(&self.connection_answer) = Some(profile);
        self
    }

    pub fn with_editor_sql(self, sql: impl Into<String>) -> Self {
        *rwlock_write(&self.editor_sql) = Some(sql.into());
        self
    }

    // --- recorded interactions ---------------------------------------------

    pub fn confirm_prompts(&self) -> Vec<String> {
        mutex_lock(&self.confirm_prompts).clone()
    }

    pub fn opened_editors(&self) -> Vec<String> {
        mutex_lock(&self.opened_editors).clone()
    }

    pub fn copied(&self) -> Vec<String> {
        mutex_lock(&self.copied).clone()
    }

    pub fn shown_row_counts(&self) -> Vec<usize> {
        mutex_lock(&self.shown_row_counts).clone()
    }

    pub fn infos(&self) -> Vec<String> {
        mutex_lock(&self.infos).clone()
    }

    pub fn errors(&self) -> Vec<String> {
        mutex_lock(&self.errors).clone()
    }
}

impl ExplorerHost for ScriptedHost {
    fn confirm(&self, message: &str) -> Confirmation {
        mutex_lock(&self.confirm_prompts).push(message.to_string());
        rwlock_read(&self.confirm_answer).unwrap_or(Confirmation::Confirmed)
    }

    fn prompt_input(&self, _prompt: &str, _initial: Option<&str>) -> Option<String> {
        mutex_lock(&self.inputs).pop_front()
    }

    fn pick_path(&self, _purpose: FilePurpose) -> Option<PathBuf> {
        rwlock_read(&self.picked_path).clone()
    }

    fn prompt_connection(&self) -> Option<ConnectionProfile> {
        rwlock_read(&self.connection_answer).clone()
    }

    fn open_editor(&self, sql: &str) {
        mutex_lock(&self.opened_editors).push(sql.to_string());
    }

    fn active_editor_sql(&self) -> Option<String> {
        rwlock_read(&self.editor_sql).clone()
    }

    fn copy_text(&self, text: &str) {
        mutex_lock(&self.copied).push(text.to_string());
    }

    fn show_results(&self, result: &QueryResult) {
        mutex_lock(&self.shown_row_counts).push(result.row_count());
    }

    fn notify_info(&self, message: &str) {
        mutex_lock(&self.infos).push(message.to_string());
    }

    fn notify_error(&self, message: &str) {
        mutex_lock(&self.errors).push(message.to_string());
    }
}

fn rwlock_read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn rwlock_write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn mutex_lock<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}
