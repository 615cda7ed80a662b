//! Command-line script runner
//!
//! Replays a keystroke script into a note field the way a host surface
//! would deliver it (keydown, native input unless prevented, keyup) and
//! echoes every emitted value back, as a controlled host does.
//!
//! Script syntax: literal characters plus `<Key>` tokens in keymap notation
//! (`<Space>`, `<Tab>`, `<Esc>`, `<Down>`, `<cmd+b>`, ...), `<lt>` for a
//! literal `<`, and `<Paste:text>`.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;

use crate::commands::Cmd;
use crate::error::EditorError;
use crate::keymap::{parse_key_string, Keystroke};
use crate::messages::{ChangeEvent, InputMsg, Msg, SurfaceMsg, ValueUpdate};
use crate::model::NoteEditor;
use crate::update::update;

/// Replay keystrokes into a note field and print the resulting value
#[derive(Parser, Debug)]
#[command(name = "notefield", version, about = "Replay keystrokes into a note field")]
pub struct CliArgs {
    /// Keystroke script, e.g. "pt has sob<Space>"
    #[arg(value_name = "SCRIPT")]
    pub script: String,

    /// Shortcut list (YAML) replacing the configured one
    #[arg(long, value_name = "FILE")]
    pub autotexts: Option<PathBuf>,

    /// Enable change tracking with the configured style
    #[arg(long)]
    pub track: bool,

    /// Initial markup value
    #[arg(long, value_name = "MARKUP", default_value = "")]
    pub value: String,

    /// Print every change event as a JSON line instead of the final value
    #[arg(long)]
    pub json: bool,
}

/// One step of a keystroke script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Key(Keystroke),
    Paste(String),
}

/// Errors in a keystroke script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// `<` without a closing `>` (byte position)
    Unterminated(usize),
    UnknownKey(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Unterminated(pos) => write!(f, "unterminated <...> at byte {}", pos),
            ScriptError::UnknownKey(name) => write!(f, "unknown key: <{}>", name),
        }
    }
}

impl std::error::Error for ScriptError {}

/// Parse a keystroke script
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    let mut rest = script;
    let mut pos = 0;

    while let Some(c) = rest.chars().next() {
        if c != '<' {
            steps.push(ScriptStep::Key(Keystroke::char(c)));
            rest = &rest[c.len_utf8()..];
            pos += c.len_utf8();
            continue;
        }

        let close = rest.find('>').ok_or(ScriptError::Unterminated(pos))?;
        let token = &rest[1..close];
        steps.push(parse_token(token)?);
        rest = &rest[close + 1..];
        pos += close + 1;
    }

    Ok(steps)
}

fn parse_token(token: &str) -> Result<ScriptStep, ScriptError> {
    if let Some(text) = token.strip_prefix("Paste:") {
        return Ok(ScriptStep::Paste(text.to_string()));
    }
    if token == "lt" {
        return Ok(ScriptStep::Key(Keystroke::char('<')));
    }
    parse_key_string(token)
        .map(ScriptStep::Key)
        .map_err(|_| ScriptError::UnknownKey(token.to_string()))
}

/// Plays script steps against a focused editor, acting as its host
#[derive(Debug)]
pub struct ScriptRunner {
    editor: NoteEditor,
    events: Vec<ChangeEvent>,
    errors: Vec<EditorError>,
}

impl ScriptRunner {
    pub fn new(mut editor: NoteEditor) -> Self {
        update(&mut editor, Msg::Surface(SurfaceMsg::Focus));
        Self {
            editor,
            events: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn play(&mut self, step: &ScriptStep) {
        match step {
            ScriptStep::Key(keystroke) => self.press(*keystroke),
            ScriptStep::Paste(text) => {
                self.dispatch(Msg::paste(text.clone()));
            }
        }
    }

    fn press(&mut self, keystroke: Keystroke) {
        let prevented = self
            .dispatch(Msg::key_down(keystroke))
            .is_some_and(|cmd| cmd.prevents_default());
        if !prevented {
            if let Some(edit) = keystroke.default_edit() {
                self.dispatch(Msg::Input(InputMsg::Edit(edit)));
            }
        }
        self.dispatch(Msg::key_up(keystroke));
    }

    /// Run one message and perform its side effects
    fn dispatch(&mut self, msg: Msg) -> Option<Cmd> {
        let cmd = update(&mut self.editor, msg)?;
        for event in cmd.notifications() {
            self.events.push(event.clone());
            update(&mut self.editor, Msg::set_value(ValueUpdate::echo(event)));
        }
        self.errors.extend(cmd.errors().into_iter().cloned());
        Some(cmd)
    }

    pub fn editor(&self) -> &NoteEditor {
        &self.editor
    }

    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    pub fn errors(&self) -> &[EditorError] {
        &self.errors
    }
}
