//! The editing surface.
//!
//! This module follows The Elm Architecture:
//! - [`Message`]: every interaction the surface reacts to
//! - [`EditorSurface::update`]: one synchronous pass per message
//!
//! A pass runs the mutation the message implies, then re-inspects the
//! selection and hands the fresh serialization to the change callback.

mod input;

pub use input::{ParseKeyError, command_for_key, parse_key_combo};

use crossterm::event::KeyEvent;

use crate::dom::Document;
use crate::format::{self, EditError};
use crate::host::Host;
use crate::inspector::{FormattingState, inspect};
use crate::toolbar::ToolbarCommand;

/// Interactions that trigger a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Toolbar button or menu entry
    Command(ToolbarCommand),
    /// Key pressed; formatting shortcuts map to commands
    KeyDown(KeyEvent),
    KeyUp,
    MouseUp,
    /// Clipboard paste, always as plain text
    Paste,
    Blur,
}

type ChangeCallback = Box<dyn FnMut(&str)>;

/// A content-editable surface owning its document.
pub struct EditorSurface<H: Host> {
    document: Document,
    host: H,
    state: FormattingState,
    on_change: Option<ChangeCallback>,
}

impl<H: Host> EditorSurface<H> {
    /// Mount the surface with its initial HTML content.
    pub fn mount(html: &str, host: H) -> Self {
        Self {
            document: Document::parse_fragment(html),
            host,
            state: FormattingState::default(),
            on_change: None,
        }
    }

    /// Register the callback that receives the content after every pass.
    #[must_use]
    pub fn with_on_change(mut self, on_change: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Formatting state as of the last successful pass.
    pub const fn state(&self) -> FormattingState {
        self.state
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current content snapshot, serialized fresh.
    pub fn content(&self) -> String {
        self.document.to_html()
    }

    /// Run one pass for `msg`.
    ///
    /// On success the formatting state is re-derived and the change callback
    /// fires. On failure the document is untouched and nothing is synced.
    pub fn update(&mut self, msg: Message) -> Result<FormattingState, EditError> {
        let span = tracing::debug_span!("pass", message = ?msg);
        let _enter = span.enter();

        let result = match msg {
            Message::Command(command) => self.run(command),
            Message::KeyDown(key) => command_for_key(&key).map_or(Ok(()), |command| self.run(command)),
            Message::Paste => format::paste_plain_text(&mut self.document, &mut self.host),
            Message::KeyUp | Message::MouseUp | Message::Blur => Ok(()),
        };

        self.reclaim();
        if let Err(err) = result {
            if err == EditError::NoSelection {
                tracing::debug!("no selection, skipping");
            } else {
                tracing::warn!(error = %err, "formatting skipped");
            }
            return Err(err);
        }
        Ok(self.sync())
    }

    fn run(&mut self, command: ToolbarCommand) -> Result<(), EditError> {
        tracing::debug!(%command, mutates = command.mutates(), "command");
        format::apply(&mut self.document, &mut self.host, command)
    }

    /// Drop a selection that no longer points into the tree, then free the
    /// nodes the pass detached.
    fn reclaim(&mut self) {
        if self
            .host
            .selection()
            .is_some_and(|range| !range.is_live(&self.document))
        {
            self.host.set_selection(None);
        }
        let freed = self.document.prune_detached();
        if freed > 0 {
            tracing::trace!(freed, "freed detached nodes");
        }
    }

    fn sync(&mut self) -> FormattingState {
        let selection = self
            .host
            .selection()
            .filter(|range| range.is_live(&self.document));
        self.state = inspect(&self.document, selection.as_ref());
        let html = self.document.to_html();
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&html);
        }
        self.state
    }
}

impl<H: Host + std::fmt::Debug> std::fmt::Debug for EditorSurface<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSurface")
            .field(
                "document",
                &format_args!("Document({} nodes)", self.document.descendants(self.document.root()).count()),
            )
            .field("host", &self.host)
            .field("state", &self.state)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
