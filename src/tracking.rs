//! Change tracking: host-styled markup around newly entered text
//!
//! The host owns the styling. The editor only decides which insertions get
//! wrapped and hands the text to the host's wrapper.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::editable::{markup, MarkupNode};

type WrapFn = dyn Fn(&str) -> String + Send + Sync;

/// Host-supplied change tracking: an on/off switch plus a pure wrapper
/// function producing a markup fragment for a piece of text
#[derive(Clone)]
pub struct ChangeTrackingConfig {
    pub enabled: bool,
    wrap: Arc<WrapFn>,
}

impl ChangeTrackingConfig {
    /// Enabled tracking with a custom wrapper
    pub fn new(wrap: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            enabled: true,
            wrap: Arc::new(wrap),
        }
    }

    /// Enabled tracking with the built-in `<span>` wrapper for a style
    pub fn from_style(style: TrackingStyle) -> Self {
        Self::new(move |text| style.wrap(text))
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Run the host wrapper
    pub fn wrap(&self, text: &str) -> String {
        (self.wrap)(text)
    }

    /// The wrapped text as an insertable fragment
    pub fn fragment(&self, text: &str) -> Vec<MarkupNode> {
        markup::parse(&self.wrap(text))
    }
}

impl fmt::Debug for ChangeTrackingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeTrackingConfig")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Visual style for tracked text, as stored in user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingStyle {
    /// CSS text color
    pub text_color: String,
    /// CSS background highlight
    pub background: Option<String>,
    pub italic: bool,
    /// Accent color drawn as an underline
    pub accent: Option<String>,
}

impl Default for TrackingStyle {
    fn default() -> Self {
        Self {
            text_color: "#1d4ed8".to_string(),
            background: Some("#dbeafe".to_string()),
            italic: false,
            accent: None,
        }
    }
}

impl TrackingStyle {
    /// Inline CSS for the wrapper span
    pub fn css(&self) -> String {
        let mut rules = vec![format!("color: {}", self.text_color)];
        if let Some(background) = &self.background {
            rules.push(format!("background-color: {}", background));
        }
        if self.italic {
            rules.push("font-style: italic".to_string());
        }
        if let Some(accent) = &self.accent {
            rules.push(format!("border-bottom: 2px solid {}", accent));
        }
        rules.join("; ")
    }

    /// `<span data-tracked="true" style="...">text</span>`
    pub fn wrap(&self, text: &str) -> String {
        let mut out = String::new();
        let attrs = vec![
            ("data-tracked".to_string(), "true".to_string()),
            ("style".to_string(), self.css()),
        ];
        markup::write_open_tag(&mut out, "span", &attrs);
        markup::write_text(&mut out, text);
        markup::write_close_tag(&mut out, "span");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_wrap() {
        let wrapped = TrackingStyle::default().wrap("a < b");
        assert_eq!(
            wrapped,
            "<span data-tracked=\"true\" style=\"color: #1d4ed8; background-color: #dbeafe\">a &lt; b</span>"
        );
    }

    #[test]
    fn test_css_options() {
        let style = TrackingStyle {
            text_color: "red".into(),
            background: None,
            italic: true,
            accent: Some("green".into()),
        };
        assert_eq!(
            style.css(),
            "color: red; font-style: italic; border-bottom: 2px solid green"
        );
    }

    #[test]
    fn test_custom_wrapper_fragment() {
        let config = ChangeTrackingConfig::new(|t| format!("[[{}]]", t.to_uppercase()));
        assert!(config.enabled);
        assert_eq!(config.wrap("edema"), "[[EDEMA]]");
        assert_eq!(config.fragment("edema"), vec![MarkupNode::text("[[EDEMA]]")]);
        assert!(!config.with_enabled(false).enabled);
    }

    #[test]
    fn test_style_deserializes_with_defaults() {
        let style: TrackingStyle = serde_yaml::from_str("italic: true").unwrap();
        assert!(style.italic);
        assert_eq!(style.text_color, TrackingStyle::default().text_color);
    }
}
