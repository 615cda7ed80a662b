//! Markup codec for editor values.
//!
//! Values are HTML-like markup strings owned by the host. The parser is
//! lenient and never fails: the host is trusted to send well-formed content,
//! so unknown tags are kept as-is, stray closing tags are dropped and
//! unclosed elements are closed at the end of input.

use std::fmt::Write;

use super::node::is_void_tag;

/// An owned markup tree, used for fragments before they are grafted into the
/// surface arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<MarkupNode>,
    },
    Text(String),
}

impl MarkupNode {
    pub fn text(s: impl Into<String>) -> Self {
        MarkupNode::Text(s.into())
    }

    pub fn element(tag: &str, attrs: Vec<(String, String)>, children: Vec<MarkupNode>) -> Self {
        MarkupNode::Element {
            tag: tag.to_string(),
            attrs,
            children,
        }
    }
}

struct Frame {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<MarkupNode>,
}

/// Parse a markup string into a list of top-level nodes
pub fn parse(markup: &str) -> Vec<MarkupNode> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut top: Vec<MarkupNode> = Vec::new();
    let mut rest = markup;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            push_text(current(&mut stack, &mut top), rest);
            break;
        };
        push_text(current(&mut stack, &mut top), &rest[..lt]);
        rest = &rest[lt..];

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = match after.find("-->") {
                Some(end) => &after[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(end) = find_tag_end(rest) else {
            push_text(current(&mut stack, &mut top), rest);
            break;
        };
        let inner = &rest[1..end];
        rest = &rest[end + 1..];

        if let Some(name) = inner.strip_prefix('/') {
            let name = name.trim().to_ascii_lowercase();
            if let Some(depth) = stack.iter().rposition(|f| f.tag == name) {
                while stack.len() > depth {
                    close_frame(&mut stack, &mut top);
                }
            }
            continue;
        }

        if inner.starts_with('!') || inner.starts_with('?') {
            continue;
        }

        let name_len = inner
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(inner.len());
        if name_len == 0 {
            // Not a tag after all ("a < b")
            push_text(current(&mut stack, &mut top), &format!("<{}>", inner));
            continue;
        }

        let tag = inner[..name_len].to_ascii_lowercase();
        let attr_src = inner[name_len..].trim();
        let self_closing = attr_src.ends_with('/');
        let attrs = parse_attrs(attr_src.trim_end_matches('/'));

        if self_closing || is_void_tag(&tag) {
            current(&mut stack, &mut top).push(MarkupNode::Element {
                tag,
                attrs,
                children: Vec::new(),
            });
        } else {
            stack.push(Frame {
                tag,
                attrs,
                children: Vec::new(),
            });
        }
    }

    while !stack.is_empty() {
        close_frame(&mut stack, &mut top);
    }
    top
}

fn current<'a>(stack: &'a mut [Frame], top: &'a mut Vec<MarkupNode>) -> &'a mut Vec<MarkupNode> {
    match stack.last_mut() {
        Some(frame) => &mut frame.children,
        None => top,
    }
}

fn close_frame(stack: &mut Vec<Frame>, top: &mut Vec<MarkupNode>) {
    if let Some(frame) = stack.pop() {
        let node = MarkupNode::Element {
            tag: frame.tag,
            attrs: frame.attrs,
            children: frame.children,
        };
        current(stack, top).push(node);
    }
}

fn push_text(siblings: &mut Vec<MarkupNode>, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = html_escape::decode_html_entities(raw);
    if let Some(MarkupNode::Text(prev)) = siblings.last_mut() {
        prev.push_str(&decoded);
    } else {
        siblings.push(MarkupNode::Text(decoded.into_owned()));
    }
}

/// Find the `>` closing a tag that starts at `s[0] == '<'`, skipping quoted
/// attribute values
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i),
            None => {}
        }
    }
    None
}

fn parse_attrs(src: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut name_end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' {
                break;
            }
            name_end = i + c.len_utf8();
            chars.next();
        }
        let name = src[start..name_end].to_ascii_lowercase();

        while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            chars.next();
        }

        let mut value = String::new();
        if chars.peek().is_some_and(|&(_, c)| c == '=') {
            chars.next();
            while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                chars.next();
            }
            match chars.peek().map(|&(_, c)| c) {
                Some(q @ ('"' | '\'')) => {
                    chars.next();
                    for (_, c) in chars.by_ref() {
                        if c == q {
                            break;
                        }
                        value.push(c);
                    }
                }
                Some(_) => {
                    while let Some(&(_, c)) = chars.peek() {
                        if c.is_whitespace() {
                            break;
                        }
                        value.push(c);
                        chars.next();
                    }
                }
                None => {}
            }
        }

        if is_attr_name(&name) {
            attrs.push((name, html_escape::decode_html_entities(&value).into_owned()));
        }
    }
    attrs
}

/// Names that survive being written back out unquoted. Anything else would
/// re-parse as a different tag, so such attributes are dropped.
fn is_attr_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| matches!(c, '"' | '\'' | '<' | '>' | '/' | '='))
}

/// Serialize a list of owned nodes back to markup
pub fn serialize(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_markup_node(&mut out, node);
    }
    out
}

fn write_markup_node(out: &mut String, node: &MarkupNode) {
    match node {
        MarkupNode::Text(text) => write_text(out, text),
        MarkupNode::Element {
            tag,
            attrs,
            children,
        } => {
            write_open_tag(out, tag, attrs);
            if !is_void_tag(tag) {
                for child in children {
                    write_markup_node(out, child);
                }
                write_close_tag(out, tag);
            }
        }
    }
}

/// Canonical form of a markup string (parse + serialize). Two values that
/// differ only in entity spelling or attribute quoting normalize equal.
pub fn normalize(markup: &str) -> String {
    serialize(&parse(markup))
}

pub(crate) fn write_text(out: &mut String, text: &str) {
    out.push_str(&html_escape::encode_text(text));
}

pub(crate) fn write_open_tag(out: &mut String, tag: &str, attrs: &[(String, String)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        let _ = write!(
            out,
            " {}=\"{}\"",
            name,
            html_escape::encode_double_quoted_attribute(value)
        );
    }
    out.push('>');
}

pub(crate) fn write_close_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
