//! Inline style declarations and computed style.
//!
//! Only the properties the formatting layer inspects are resolved:
//! `font-weight`, `font-style` and `text-decoration`. Everything else in a
//! `style` attribute is carried through untouched.

use super::{Document, NodeId};

const WEIGHT_NORMAL: u16 = 400;
const WEIGHT_BOLD: u16 = 700;

/// Parse a `style` attribute into `(property, value)` pairs.
///
/// Property names are lowercased, values trimmed and `!important` dropped.
/// Malformed declarations are skipped.
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .map_or(value, str::trim_end);
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name, value.to_owned()))
        })
        .collect()
}

pub fn serialize_declarations(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The resolved values of the style properties the inspector cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    /// Numeric weight, `"400"` for normal and `"700"` for bold.
    pub font_weight: String,
    pub font_style: String,
    pub text_decoration: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            font_weight: WEIGHT_NORMAL.to_string(),
            font_style: "normal".to_owned(),
            text_decoration: "none".to_owned(),
        }
    }
}

/// Resolve the computed style of an element.
///
/// Weight and style inherit through ancestors, starting from user agent
/// defaults for tags such as `b` or `em`; inline declarations override them.
/// Text decoration does not inherit, so only the element itself is consulted.
pub fn computed_style(doc: &Document, element: NodeId) -> ComputedStyle {
    let chain: Vec<NodeId> = doc
        .ancestors(element)
        .filter(|n| doc.is_element(*n))
        .collect();

    let mut weight = WEIGHT_NORMAL;
    let mut font_style = "normal".to_owned();
    for node in chain.iter().rev() {
        let Some(el) = doc.element(*node) else {
            continue;
        };
        if ua_bold(el.tag()) {
            weight = WEIGHT_BOLD;
        }
        if ua_italic(el.tag()) {
            "italic".clone_into(&mut font_style);
        }
        if let Some(value) = el.style_property("font-weight") {
            weight = resolve_weight(&value, weight);
        }
        if let Some(value) = el.style_property("font-style") {
            font_style = value.to_ascii_lowercase();
        }
    }

    let text_decoration = doc
        .element(element)
        .and_then(|el| {
            el.style_property("text-decoration")
                .or_else(|| el.style_property("text-decoration-line"))
                .map(|v| v.to_ascii_lowercase())
                .or_else(|| ua_decoration(el.tag()).map(str::to_owned))
        })
        .unwrap_or_else(|| "none".to_owned());

    ComputedStyle {
        font_weight: weight.to_string(),
        font_style,
        text_decoration,
    }
}

fn ua_bold(tag: &str) -> bool {
    matches!(
        tag,
        "b" | "strong" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th"
    )
}

fn ua_italic(tag: &str) -> bool {
    matches!(tag, "i" | "em" | "cite" | "var" | "dfn")
}

fn ua_decoration(tag: &str) -> Option<&'static str> {
    match tag {
        "u" | "ins" => Some("underline"),
        "s" | "strike" | "del" => Some("line-through"),
        _ => None,
    }
}

fn resolve_weight(value: &str, inherited: u16) -> u16 {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => WEIGHT_NORMAL,
        "bold" => WEIGHT_BOLD,
        "bolder" => match inherited {
            0..=349 => WEIGHT_NORMAL,
            350..=549 => WEIGHT_BOLD,
            _ => 900,
        },
        "lighter" => match inherited {
            0..=549 => 100,
            550..=749 => WEIGHT_NORMAL,
            _ => WEIGHT_BOLD,
        },
        other => other
            .parse::<u16>()
            .ok()
            .filter(|w| (1..=1000).contains(w))
            .unwrap_or(inherited),
    }
}
