//! Page surface used by the client controllers.
//!
//! Controllers never touch a real document; they go through [`Page`], which
//! covers the few browser affordances they need (dialogs, navigation,
//! cookies). [`HeadlessPage`] records every call and backs the command-line
//! tools and tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

pub trait Page: Send + Sync {
    /// Blocking yes/no prompt
    fn confirm(&self, message: &str) -> bool;

    /// Blocking notice
    fn alert(&self, message: &str);

    /// Navigate without adding a history entry
    fn replace_location(&self, url: &str);

    /// Expire every cookie visible to the page
    fn clear_cookies(&self);

    /// Close any open modal dialog
    fn close_dialogs(&self);
}

#[derive(Debug, Default)]
struct HeadlessState {
    confirm_answer: bool,
    alerts: Vec<String>,
    confirmations: Vec<String>,
    navigations: Vec<String>,
    cookies: BTreeMap<String, String>,
    open_dialogs: usize,
}

/// Page that records interactions instead of rendering them
#[derive(Debug)]
pub struct HeadlessPage {
    state: Mutex<HeadlessState>,
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPage {
    /// A page whose confirmations are accepted
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HeadlessState {
                confirm_answer: true,
                ..HeadlessState::default()
            }),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut HeadlessState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Answer future confirmations with `answer`
    pub fn answer_confirmations(&self, answer: bool) {
        self.with_state(|s| s.confirm_answer = answer);
    }

    pub fn set_cookie(&self, name: &str, value: &str) {
        self.with_state(|s| {
            s.cookies.insert(name.to_string(), value.to_string());
        });
    }

    pub fn open_dialog(&self) {
        self.with_state(|s| s.open_dialogs += 1);
    }

    pub fn alerts(&self) -> Vec<String> {
        self.with_state(|s| s.alerts.clone())
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.with_state(|s| s.confirmations.clone())
    }

    pub fn navigations(&self) -> Vec<String> {
        self.with_state(|s| s.navigations.clone())
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.with_state(|s| s.navigations.last().cloned())
    }

    pub fn cookies(&self) -> BTreeMap<String, String> {
        self.with_state(|s| s.cookies.clone())
    }

    pub fn open_dialogs(&self) -> usize {
        self.with_state(|s| s.open_dialogs)
    }
}

impl Page for HeadlessPage {
    fn confirm(&self, message: &str) -> bool {
        self.with_state(|s| {
            s.confirmations.push(message.to_string());
            s.confirm_answer
        })
    }

    fn alert(&self, message: &str) {
        tracing::info!("alert: {}", message);
        self.with_state(|s| s.alerts.push(message.to_string()));
    }

    fn replace_location(&self, url: &str) {
        tracing::info!("navigate (replace): {}", url);
        self.with_state(|s| s.navigations.push(url.to_string()));
    }

    fn clear_cookies(&self) {
        self.with_state(|s| s.cookies.clear());
    }

    fn close_dialogs(&self) {
        self.with_state(|s| s.open_dialogs = 0);
    }
}
