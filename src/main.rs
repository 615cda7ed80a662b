use anyhow::{Context, Result};
use clap::Parser;

use notefield::cli::{parse_script, CliArgs, ScriptRunner};
use notefield::config::EditorConfig;
use notefield::expansion::load_shortcut_file;
use notefield::model::NoteEditor;
use notefield::tracking::ChangeTrackingConfig;

fn main() -> Result<()> {
    notefield::tracing::init();

    let args = CliArgs::parse();
    let config = EditorConfig::load();
    let steps = parse_script(&args.script).context("invalid keystroke script")?;

    let mut editor = NoteEditor::from_config(&config, &args.value);
    if let Some(path) = &args.autotexts {
        let table = load_shortcut_file(path)
            .with_context(|| format!("failed to load autotexts from {}", path.display()))?;
        editor = editor.with_shortcuts(table);
    }
    if args.track && editor.change_tracking.is_none() {
        let tracking = ChangeTrackingConfig::from_style(config.change_tracking.style.clone());
        editor = editor.with_change_tracking(Some(tracking));
    }

    let mut runner = ScriptRunner::new(editor);
    for step in &steps {
        runner.play(step);
    }

    for error in runner.errors() {
        eprintln!("{}", error.user_message());
    }

    if args.json {
        for event in runner.events() {
            println!("{}", serde_json::to_string(event)?);
        }
    } else {
        println!("{}", runner.editor().value());
    }

    Ok(())
}
