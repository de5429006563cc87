// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. format::FormatError)
    clippy::module_name_repetitions
)]

//! # Quire
//!
//! A rich text editing surface over an HTML document tree.
//!
//! Quire keeps toolbar state and markup in sync:
//! - Inspecting the selection to find the active inline styles and block type
//! - Applying bold, italic, underline, strikethrough, font sizes and links
//! - Changing block types, alignment and lists
//! - Pasting clipboard content as plain text
//!
//! ## Architecture
//!
//! Quire uses The Elm Architecture (TEA) pattern:
//! - **Model**: the [`editor::EditorSurface`] owning the document
//! - **Message**: [`editor::Message`] for every interaction
//! - **Update**: one synchronous pass per message, mutation then inspection
//!
//! ## Modules
//!
//! - [`dom`]: Document tree, HTML parsing and serialization, ranges
//! - [`inspector`]: Selection to formatting state
//! - [`format`]: Formatting mutations
//! - [`toolbar`]: Command vocabulary
//! - [`editor`]: The editing surface and key bindings
//! - [`host`]: Platform capabilities (selection, clipboard, prompts, history)
//! - [`script`]: Interaction scripts for the headless host
//! - [`config`]: Saved command-line defaults

pub mod config;
pub mod dom;
pub mod editor;
pub mod format;
pub mod host;
pub mod inspector;
pub mod script;
pub mod toolbar;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::dom::{Boundary, Document, Range};
    pub use crate::editor::{EditorSurface, Message};
    pub use crate::format::{Alignment, BlockTag, EditError, FontSize, ListKind};
    pub use crate::host::{HeadlessHost, Host};
    pub use crate::inspector::{FormattingState, inspect};
    pub use crate::toolbar::ToolbarCommand;
}
