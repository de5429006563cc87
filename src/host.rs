//! Host platform capabilities.
//!
//! The editing surface never owns the selection, the clipboard, modal
//! dialogs or the edit history; it reaches them through [`Host`].

use std::collections::VecDeque;

use crate::dom::Range;

/// Capabilities the embedding platform provides to the editing surface.
pub trait Host {
    /// The current selection, if any.
    fn selection(&self) -> Option<Range>;

    fn set_selection(&mut self, range: Option<Range>);

    /// Plain text payload of the clipboard. Rich formatting is never exposed.
    fn clipboard_text(&self) -> String;

    /// Ask the user for a line of text. `None` means the prompt was dismissed.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;

    /// Blocking user-facing notice.
    fn alert(&mut self, message: &str);

    fn request_undo(&mut self);

    fn request_redo(&mut self);
}

/// In-memory host used by the headless binary and tests.
///
/// Prompt replies are queued ahead of time; a prompt with nothing queued
/// behaves like a dismissed dialog.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    selection: Option<Range>,
    clipboard: String,
    prompt_replies: VecDeque<Option<String>>,
    prompts: Vec<String>,
    alerts: Vec<String>,
    undo_requests: usize,
    redo_requests: usize,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_clipboard(&mut self, text: impl Into<String>) {
        self.clipboard = text.into();
    }

    /// Queue the answer for the next prompt. `None` dismisses it.
    pub fn queue_prompt_reply(&mut self, reply: Option<String>) {
        self.prompt_replies.push_back(reply);
    }

    /// Messages of every prompt shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub const fn undo_requests(&self) -> usize {
        self.undo_requests
    }

    pub const fn redo_requests(&self) -> usize {
        self.redo_requests
    }
}

impl Host for HeadlessHost {
    fn selection(&self) -> Option<Range> {
        self.selection
    }

    fn set_selection(&mut self, range: Option<Range>) {
        self.selection = range;
    }

    fn clipboard_text(&self) -> String {
        self.clipboard.clone()
    }

    fn prompt(&mut self, message: &str, _default: &str) -> Option<String> {
        self.prompts.push(message.to_owned());
        self.prompt_replies.pop_front().flatten()
    }

    fn alert(&mut self, message: &str) {
        tracing::debug!(message, "alert");
        self.alerts.push(message.to_owned());
    }

    fn request_undo(&mut self) {
        self.undo_requests += 1;
    }

    fn request_redo(&mut self) {
        self.redo_requests += 1;
    }
}
