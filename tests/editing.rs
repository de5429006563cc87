use std::cell::RefCell;
use std::rc::Rc;

use quire::prelude::*;

fn mount(html: &str) -> (EditorSurface<HeadlessHost>, Rc<RefCell<Vec<String>>>) {
    let emitted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emitted);
    let surface = EditorSurface::mount(html, HeadlessHost::new())
        .with_on_change(move |html| sink.borrow_mut().push(html.to_owned()));
    (surface, emitted)
}

fn select(surface: &mut EditorSurface<HeadlessHost>, path: &[usize], from: usize, to: usize) {
    let doc = surface.document();
    let node = doc.node_at_path(path).unwrap();
    let range = Range::new(doc, Boundary::new(node, from), Boundary::new(node, to)).unwrap();
    surface.host_mut().set_selection(Some(range));
}

fn command(surface: &mut EditorSurface<HeadlessHost>, cmd: &str) -> Result<FormattingState, EditError> {
    surface.update(Message::Command(cmd.parse().unwrap()))
}

#[test]
fn test_every_inline_style_is_reported_after_applying() {
    for (cmd, style) in [
        ("bold", ToolbarCommand::Bold),
        ("italic", ToolbarCommand::Italic),
        ("underline", ToolbarCommand::Underline),
        ("strike", ToolbarCommand::Strikethrough),
    ] {
        let (mut surface, _) = mount("<p>Hello world</p>");
        select(&mut surface, &[0, 0], 6, 11);
        let state = command(&mut surface, cmd).unwrap();
        assert!(style.is_active(&state), "{cmd} should be active");
    }
}

#[test]
fn test_styles_accumulate_on_the_same_text() {
    let (mut surface, _) = mount("<p>Hello</p>");
    select(&mut surface, &[0, 0], 0, 5);
    command(&mut surface, "bold").unwrap();
    let state = command(&mut surface, "italic").unwrap();
    assert!(state.is_bold);
    assert!(state.is_italic);
    assert!(!state.is_underline);
    assert_eq!(surface.document().text_content(surface.document().root()), "Hello");
}

#[test]
fn test_caret_inside_legacy_markup_reports_styles() {
    let (mut surface, _) = mount("<h3><b><u>x</u></b></h3>");
    select(&mut surface, &[0, 0, 0, 0], 1, 1);
    let state = surface.update(Message::MouseUp).unwrap();
    assert!(state.is_bold);
    assert!(state.is_underline);
    assert!(!state.is_italic);
    assert_eq!(state.current_block, BlockTag::H3);
}

#[test]
fn test_block_change_then_inline_style() {
    let (mut surface, _) = mount("<p>Title</p>");
    select(&mut surface, &[0, 0], 0, 5);
    let state = command(&mut surface, "block h2").unwrap();
    assert_eq!(state.current_block, BlockTag::H2);
    assert_eq!(surface.content(), "<h2>Title</h2>");

    select(&mut surface, &[0, 0], 0, 5);
    let state = command(&mut surface, "bold").unwrap();
    assert!(state.is_bold);
    assert_eq!(state.current_block, BlockTag::H2);
}

#[test]
fn test_alignment_replaces_previous_alignment() {
    let (mut surface, _) = mount("<p>x</p>");
    select(&mut surface, &[0, 0], 0, 1);
    command(&mut surface, "align center").unwrap();
    command(&mut surface, "align right").unwrap();
    let doc = surface.document();
    let p = doc.element(doc.node_at_path(&[0]).unwrap()).unwrap();
    assert_eq!(p.classes().collect::<Vec<_>>(), ["text-right"]);
    assert_eq!(p.attr("style"), Some("text-align: right;"));
}

#[test]
fn test_list_round_trip_leaves_paragraph() {
    let (mut surface, _) = mount("<ul><li>one</li></ul>");
    select(&mut surface, &[0, 0, 0], 1, 1);
    let state = command(&mut surface, "list bullet").unwrap();
    assert_eq!(state.current_block, BlockTag::P);
    assert_eq!(surface.content(), "<ul><p>one</p></ul>");
}

#[test]
fn test_font_size_wraps_in_span() {
    let (mut surface, _) = mount("<p>big</p>");
    select(&mut surface, &[0, 0], 0, 3);
    command(&mut surface, "size 7").unwrap();
    assert_eq!(
        surface.content(),
        "<p><span style=\"font-size: 40px;\">big</span></p>"
    );
}

#[test]
fn test_link_then_unlink_restores_markup() {
    let (mut surface, _) = mount("<p>visit docs today</p>");
    select(&mut surface, &[0, 0], 6, 10);
    surface.host_mut().queue_prompt_reply(Some("docs.rs".into()));
    command(&mut surface, "link").unwrap();
    assert!(surface.content().contains("<a href=\"https://docs.rs\""));

    command(&mut surface, "unlink").unwrap();
    assert_eq!(surface.content(), "<p>visit docs today</p>");
}

#[test]
fn test_cancelled_link_prompt_changes_nothing() {
    let (mut surface, emitted) = mount("<p>text</p>");
    select(&mut surface, &[0, 0], 0, 4);
    surface.host_mut().queue_prompt_reply(None);
    assert_eq!(command(&mut surface, "link"), Err(EditError::EmptyUrl));
    assert_eq!(surface.content(), "<p>text</p>");
    assert!(emitted.borrow().is_empty());
}

#[test]
fn test_paste_inserts_markup_as_text() {
    let (mut surface, emitted) = mount("<p>ab</p>");
    select(&mut surface, &[0, 0], 1, 1);
    surface.host_mut().set_clipboard("<i>x</i>");
    surface.update(Message::Paste).unwrap();
    assert_eq!(surface.content(), "<p>a&lt;i&gt;x&lt;/i&gt;b</p>");
    assert_eq!(emitted.borrow().last().unwrap(), &surface.content());
}

#[test]
fn test_undo_and_redo_are_forwarded_to_host() {
    let (mut surface, _) = mount("<p>a</p>");
    command(&mut surface, "undo").unwrap();
    command(&mut surface, "redo").unwrap();
    command(&mut surface, "redo").unwrap();
    assert_eq!(surface.host().undo_requests(), 1);
    assert_eq!(surface.host().redo_requests(), 2);
}

#[test]
fn test_state_serializes_for_toolbar() {
    let doc = Document::parse_fragment("<h1><em>t</em></h1>");
    let text = doc.node_at_path(&[0, 0, 0]).unwrap();
    let caret = Range::collapsed(&doc, text, 0).unwrap();
    let json = serde_json::to_value(inspect(&doc, Some(&caret))).unwrap();
    assert_eq!(json["isItalic"], true);
    assert_eq!(json["isBold"], false);
    assert_eq!(json["currentBlock"], "h1");
}
