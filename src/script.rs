//! Line-oriented interaction scripts for the headless host.
//!
//! Each non-blank line is one step. `#` starts a comment line.
//!
//! ```text
//! select 0/0:6 0/0:11    # path/to/node:offset, `:3` addresses the root
//! caret 0/0:2
//! find world             # select the first occurrence of the text
//! caret-after world
//! deselect
//! prompt example.com     # answer for the next prompt
//! cancel-prompt
//! clipboard <b>x</b>
//! paste | mouseup | keyup | blur
//! key ctrl+b
//! bold | block h1 | size 5 | align center | list bullet | link | unlink
//! ```
//!
//! Selection and host lines only prepare state; every other line runs one
//! pass on the surface.

use serde::Serialize;

use crate::dom::{Boundary, Document, DomError, Range};
use crate::editor::{EditorSurface, Message, parse_key_combo};
use crate::host::{HeadlessHost, Host};
use crate::inspector::FormattingState;
use crate::toolbar::ToolbarCommand;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: no node at path `{path}`")]
    Resolve { line: usize, path: String },
    #[error("line {line}: text `{text}` not found")]
    NotFound { line: usize, text: String },
    #[error("line {line}: {source}")]
    Range { line: usize, source: DomError },
}

/// A node path plus an offset inside the node.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Location {
    path: Vec<usize>,
    offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Select(Location, Location),
    Caret(Location),
    Find(String),
    CaretAfter(String),
    Deselect,
    Prompt(String),
    CancelPrompt,
    Clipboard(String),
    Pass(Message),
}

/// What one pass did, for printing by the headless host.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub line: usize,
    pub step: String,
    pub state: FormattingState,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Replay `script` against the surface, reporting every pass to `observe`.
///
/// The whole script is parsed before anything runs. Formatting failures are
/// part of the report; only malformed lines and unresolvable locations stop
/// the run.
pub fn run(
    surface: &mut EditorSurface<HeadlessHost>,
    script: &str,
    mut observe: impl FnMut(&PassReport),
) -> Result<usize, ScriptError> {
    let steps = parse(script)?;
    let mut passes = 0;
    for (line, text, step) in steps {
        let message = match step {
            Step::Pass(message) => message,
            other => {
                prepare(surface, line, other)?;
                continue;
            }
        };
        let outcome = surface.update(message);
        passes += 1;
        observe(&PassReport {
            line,
            step: text,
            state: surface.state(),
            html: surface.content(),
            error: outcome.err().map(|e| e.to_string()),
        });
    }
    Ok(passes)
}

fn prepare(
    surface: &mut EditorSurface<HeadlessHost>,
    line: usize,
    step: Step,
) -> Result<(), ScriptError> {
    let doc = surface.document();
    let selection = match step {
        Step::Select(from, to) => {
            let start = resolve(doc, line, &from)?;
            let end = resolve(doc, line, &to)?;
            Some(Range::new(doc, start, end).map_err(|source| ScriptError::Range { line, source })?)
        }
        Step::Caret(at) => {
            let at = resolve(doc, line, &at)?;
            Some(Range::new(doc, at, at).map_err(|source| ScriptError::Range { line, source })?)
        }
        Step::Find(text) => Some(find_text(doc, line, &text)?),
        Step::CaretAfter(text) => {
            let found = find_text(doc, line, &text)?;
            Some(Range::new(doc, found.end(), found.end()).map_err(|source| ScriptError::Range { line, source })?)
        }
        Step::Deselect => None,
        Step::Prompt(reply) => {
            surface.host_mut().queue_prompt_reply(Some(reply));
            return Ok(());
        }
        Step::CancelPrompt => {
            surface.host_mut().queue_prompt_reply(None);
            return Ok(());
        }
        Step::Clipboard(text) => {
            surface.host_mut().set_clipboard(text);
            return Ok(());
        }
        Step::Pass(_) => return Ok(()),
    };
    surface.host_mut().set_selection(selection);
    Ok(())
}

fn resolve(doc: &Document, line: usize, location: &Location) -> Result<Boundary, ScriptError> {
    let node = doc
        .node_at_path(&location.path)
        .ok_or_else(|| ScriptError::Resolve {
            line,
            path: location
                .path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("/"),
        })?;
    Ok(Boundary::new(node, location.offset))
}

/// Select the first occurrence of `needle` inside a single text node.
fn find_text(doc: &Document, line: usize, needle: &str) -> Result<Range, ScriptError> {
    doc.descendants(doc.root())
        .find_map(|node| {
            let text = doc.text(node)?;
            let byte = text.find(needle)?;
            let start = text[..byte].chars().count();
            Some((node, start, start + needle.chars().count()))
        })
        .ok_or_else(|| ScriptError::NotFound {
            line,
            text: needle.to_owned(),
        })
        .and_then(|(node, start, end)| {
            Range::new(doc, Boundary::new(node, start), Boundary::new(node, end))
                .map_err(|source| ScriptError::Range { line, source })
        })
}

fn parse(script: &str) -> Result<Vec<(usize, String, Step)>, ScriptError> {
    script
        .lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, text)| !text.is_empty() && !text.starts_with('#'))
        .map(|(line, text)| Ok((line, text.to_owned(), parse_step(line, text)?)))
        .collect()
}

fn parse_step(line: usize, text: &str) -> Result<Step, ScriptError> {
    let (word, rest) = text
        .split_once(char::is_whitespace)
        .map_or((text, ""), |(w, r)| (w, r.trim()));
    let parse_err = |message: String| ScriptError::Parse { line, message };
    let needs_rest = || {
        if rest.is_empty() {
            Err(parse_err(format!("`{word}` needs an argument")))
        } else {
            Ok(rest.to_owned())
        }
    };

    let step = match word {
        "select" => {
            let mut parts = rest.split_whitespace();
            let (Some(from), Some(to), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(parse_err("`select` takes two locations".into()));
            };
            Step::Select(
                parse_location(from).ok_or_else(|| parse_err(format!("bad location `{from}`")))?,
                parse_location(to).ok_or_else(|| parse_err(format!("bad location `{to}`")))?,
            )
        }
        "caret" => Step::Caret(
            parse_location(rest).ok_or_else(|| parse_err(format!("bad location `{rest}`")))?,
        ),
        "find" => Step::Find(needs_rest()?),
        "caret-after" => Step::CaretAfter(needs_rest()?),
        "deselect" => Step::Deselect,
        "prompt" => Step::Prompt(rest.to_owned()),
        "cancel-prompt" => Step::CancelPrompt,
        "clipboard" => Step::Clipboard(rest.to_owned()),
        "paste" => Step::Pass(Message::Paste),
        "mouseup" => Step::Pass(Message::MouseUp),
        "keyup" => Step::Pass(Message::KeyUp),
        "blur" => Step::Pass(Message::Blur),
        "key" => Step::Pass(Message::KeyDown(
            parse_key_combo(rest).map_err(|e| parse_err(e.to_string()))?,
        )),
        _ => Step::Pass(Message::Command(
            text.parse::<ToolbarCommand>()
                .map_err(|e| parse_err(e.to_string()))?,
        )),
    };
    Ok(step)
}

/// `0/1:3` is offset 3 in the second child of the first child of the root.
fn parse_location(text: &str) -> Option<Location> {
    let (path, offset) = text.rsplit_once(':')?;
    let path = if path.is_empty() {
        Vec::new()
    } else {
        path.split('/')
            .map(|idx| idx.parse().ok())
            .collect::<Option<Vec<usize>>>()?
    };
    Some(Location {
        path,
        offset: offset.parse().ok()?,
    })
}
