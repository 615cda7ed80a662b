//! Structural auto-formatting: `#label:` tokens are underlined
//!
//! Text already inside a `<u>` element is left alone, which makes the pass
//! idempotent.

use std::sync::OnceLock;

use regex::Regex;

use crate::editable::{markup, MarkupNode, Mutation, NodeId, Point, Surface};
use crate::error::EditorError;

fn label_regex() -> &'static Regex {
    static LABEL_REGEX: OnceLock<Regex> = OnceLock::new();
    LABEL_REGEX.get_or_init(|| Regex::new(r"#\w+:").expect("Invalid label regex"))
}

/// Underline every `#label:` in a markup string
pub fn apply_underline_formatting(value: &str) -> String {
    let nodes = markup::parse(value);
    markup::serialize(&underline_nodes(nodes, false))
}

fn underline_nodes(nodes: Vec<MarkupNode>, in_underline: bool) -> Vec<MarkupNode> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            MarkupNode::Text(text) if !in_underline => split_labels(&text, &mut out),
            MarkupNode::Element {
                tag,
                attrs,
                children,
            } => {
                let inside = in_underline || tag == "u";
                out.push(MarkupNode::Element {
                    children: underline_nodes(children, inside),
                    tag,
                    attrs,
                });
            }
            text => out.push(text),
        }
    }
    out
}

fn split_labels(text: &str, out: &mut Vec<MarkupNode>) {
    let mut last = 0;
    for m in label_regex().find_iter(text) {
        if m.start() > last {
            out.push(MarkupNode::text(&text[last..m.start()]));
        }
        out.push(MarkupNode::element(
            "u",
            Vec::new(),
            vec![MarkupNode::text(m.as_str())],
        ));
        last = m.end();
    }
    if last < text.len() {
        out.push(MarkupNode::text(&text[last..]));
    }
}

/// Underline labels in the live surface. Returns whether anything changed.
/// The caret stays on the same characters, except that a caret at the end of
/// a freshly wrapped label moves out of the `<u>`.
///
/// Labels split over adjacent inline text leaves (one tracked span per typed
/// character) are underlined too, as long as the label covers whole elements.
pub fn underline_labels(surface: &mut Surface) -> Result<bool, EditorError> {
    let mut changed = underline_in_leaves(surface)?;
    changed |= underline_across_leaves(surface)?;
    if changed {
        tracing::debug!(target: "format", "underlined labels");
    }
    Ok(changed)
}

fn underline_in_leaves(surface: &mut Surface) -> Result<bool, EditorError> {
    let mut changed = false;
    for node in surface.text_leaves() {
        if surface.has_ancestor_tag(node, "u") {
            continue;
        }
        let Some(text) = surface.text(node) else {
            continue;
        };
        // Char ranges, right to left so earlier ranges stay valid in `node`
        let ranges: Vec<(usize, usize)> = label_regex()
            .find_iter(text)
            .map(|m| {
                let start = text[..m.start()].chars().count();
                (start, start + m.as_str().chars().count())
            })
            .collect();

        for (start, end) in ranges.into_iter().rev() {
            let label_end = surface.apply(Mutation::WrapRange {
                node,
                range: start..end,
                tag: "u".to_string(),
                attrs: Vec::new(),
            })?;
            leave_label(surface, label_end)?;
            changed = true;
        }
    }
    Ok(changed)
}

fn underline_across_leaves(surface: &mut Surface) -> Result<bool, EditorError> {
    let mut changed = false;
    for run in inline_runs(surface) {
        let mut text = String::new();
        // (leaf, char offset of the leaf in `text`, char length)
        let mut pieces = Vec::with_capacity(run.len());
        let mut offset = 0;
        for &leaf in &run {
            let leaf_text = surface.text(leaf).unwrap_or_default();
            let len = leaf_text.chars().count();
            text.push_str(leaf_text);
            pieces.push((leaf, offset, len));
            offset += len;
        }

        let labels: Vec<(Point, Point)> = label_regex()
            .find_iter(&text)
            .filter_map(|m| {
                let start = text[..m.start()].chars().count();
                let end = start + m.as_str().chars().count();
                let (first, first_at, _) = pieces
                    .iter()
                    .find(|(_, at, len)| *at <= start && start < at + len)?;
                let (last, last_at, _) = pieces
                    .iter()
                    .find(|(_, at, len)| *at < end && end <= at + len)?;
                (first != last).then(|| {
                    (
                        Point::new(*first, start - first_at),
                        Point::new(*last, end - last_at),
                    )
                })
            })
            .collect();

        for (start, end) in labels.into_iter().rev() {
            let result = surface.apply(Mutation::WrapSpan {
                start,
                end,
                tag: "u".to_string(),
                attrs: Vec::new(),
            });
            match result {
                Ok(label_end) => {
                    leave_label(surface, label_end)?;
                    changed = true;
                }
                // The label would cut through formatting; leave it alone
                Err(e) => tracing::trace!(target: "format", %e, "label spans partial elements"),
            }
        }
    }
    Ok(changed)
}

/// Maximal runs of two or more adjacent inline text leaves outside `<u>`
fn inline_runs(surface: &Surface) -> Vec<Vec<NodeId>> {
    let mut runs: Vec<Vec<NodeId>> = Vec::new();
    let mut current: Vec<NodeId> = Vec::new();
    for leaf in surface.text_leaves() {
        if surface.has_ancestor_tag(leaf, "u") {
            runs.push(std::mem::take(&mut current));
            continue;
        }
        let joined = current
            .last()
            .is_some_and(|&prev| surface.next_inline_leaf(prev) == Some(leaf));
        if !joined {
            runs.push(std::mem::take(&mut current));
        }
        current.push(leaf);
    }
    runs.push(current);
    runs.retain(|run| run.len() > 1);
    runs
}

/// A caret sitting at the end of a label just wrapped moves out of the `<u>`
fn leave_label(surface: &mut Surface, label_end: Point) -> Result<(), EditorError> {
    if surface.normalize(surface.caret()) != label_end {
        return Ok(());
    }
    let mut cur = surface.parent(label_end.node);
    while let Some(id) = cur {
        if surface.node(id).and_then(|n| n.tag()) == Some("u") {
            surface.set_caret_after(id)?;
            return Ok(());
        }
        cur = surface.parent(id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underline_label() {
        assert_eq!(
            apply_underline_formatting("see #Plan: follow up"),
            "see <u>#Plan:</u> follow up"
        );
    }

    #[test]
    fn test_multiple_labels_and_nested_markup() {
        assert_eq!(
            apply_underline_formatting("#A: x <b>#Dx2: y</b> #bad :"),
            "<u>#A:</u> x <b><u>#Dx2:</u> y</b> #bad :"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "#Plan:",
            "<u>#Plan:</u> and #Plan: again",
            "a &amp; #x: <u>pre #y: inside</u>",
            "no labels at all",
            "#: # x: ##a::",
            "<1\"=a\">",
        ];
        for input in inputs {
            let once = apply_underline_formatting(input);
            assert_eq!(apply_underline_formatting(&once), once, "input: {}", input);
        }
    }

    #[test]
    fn test_surface_pass_keeps_caret() {
        let mut surface = Surface::from_markup("x #Plan: y");
        assert!(underline_labels(&mut surface).unwrap());
        assert_eq!(surface.serialize(), "x <u>#Plan:</u> y");

        let caret = surface.caret();
        assert_eq!(surface.text(caret.node), Some(" y"));
        assert_eq!(caret.offset, 2);

        assert!(!underline_labels(&mut surface).unwrap());
        assert_eq!(surface.serialize(), "x <u>#Plan:</u> y");
    }

    #[test]
    fn test_typing_after_fresh_label_is_not_underlined() {
        let mut surface = Surface::from_markup("#Plan:");
        assert!(underline_labels(&mut surface).unwrap());
        let caret = surface.caret();
        assert_eq!(surface.text(caret.node), Some(""));

        let after = surface.apply(Mutation::insert_text(caret, " f/u")).unwrap();
        surface.set_caret(after);
        assert_eq!(surface.serialize(), "<u>#Plan:</u> f/u");
    }

    #[test]
    fn test_surface_pass_joins_tracked_characters() {
        let mut surface = Surface::from_markup("x <i>#</i><i>P</i><i>:</i>");
        assert!(underline_labels(&mut surface).unwrap());
        assert_eq!(surface.serialize(), "x <u><i>#</i><i>P</i><i>:</i></u>");

        // The caret left the label
        let caret = surface.caret();
        assert_eq!(surface.text(caret.node), Some(""));
        assert!(!surface.has_ancestor_tag(caret.node, "u"));
        assert!(!underline_labels(&mut surface).unwrap());
    }

    #[test]
    fn test_surface_pass_skips_labels_cutting_elements() {
        let mut surface = Surface::from_markup("<i>x #P</i><i>lan:</i>");
        assert!(!underline_labels(&mut surface).unwrap());
        assert_eq!(surface.serialize(), "<i>x #P</i><i>lan:</i>");
    }

    #[test]
    fn test_surface_pass_several_labels_in_one_node() {
        let mut surface = Surface::from_markup("#S: ok #O: fine");
        underline_labels(&mut surface).unwrap();
        assert_eq!(surface.serialize(), "<u>#S:</u> ok <u>#O:</u> fine");
    }
}
