use chrono::Local;

use crate::{
    api::Note,
    state::{App, Modal},
};

pub const HELP: &str = "\
Commands:
  title <text>     set the form title
  content <text>   set the form content
  save             create the note, or save the one being edited
  edit <id>        load a note into the form
  cancel           leave edit mode
  delete <id>      delete a note (asks for confirmation)
  show <id>        fetch one note from the server
  yes | no         answer a confirmation
  ok               close an alert
  refresh          reload all notes
  help             show this text
  quit             exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Title(String),
    Content(String),
    Save,
    Edit(i64),
    Cancel,
    Delete(i64),
    Show(i64),
    Yes,
    No,
    Ok,
    Refresh,
    Help,
    Quit,
}

fn parse_id(command: &str, arg: &str) -> Result<i64, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("'{command}' expects a numeric note id"))
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (name, arg) = line.split_once(' ').unwrap_or((line, ""));

    match name {
        "title" => Ok(Command::Title(arg.to_string())),
        "content" => Ok(Command::Content(arg.to_string())),
        "save" => Ok(Command::Save),
        "edit" => parse_id(name, arg).map(Command::Edit),
        "cancel" => Ok(Command::Cancel),
        "delete" => parse_id(name, arg).map(Command::Delete),
        "show" => parse_id(name, arg).map(Command::Show),
        "yes" | "y" => Ok(Command::Yes),
        "no" | "n" => Ok(Command::No),
        "ok" => Ok(Command::Ok),
        "refresh" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("Type 'help' to list commands".to_string()),
        other => Err(format!("Unknown command '{other}', type 'help'")),
    }
}

pub fn format_note(note: &Note) -> String {
    let created = note
        .created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S");
    format!(
        "#{} {}\n    {}\n    Created: {}",
        note.id, note.title, note.content, created
    )
}

/// Draws the whole screen for the current state.
pub fn render(app: &App) -> String {
    if app.loading {
        return "Loading...".to_string();
    }

    let mut lines = vec![
        "== My Notes ==".to_string(),
        "A simple app for managing notes".to_string(),
    ];

    if let Some(error) = &app.error {
        lines.push(format!("\n[error] {error}"));
    }

    match &app.modal {
        Modal::Closed => {}
        Modal::Alert(message) => lines.push(format!("\n[!] {message}  (ok)")),
        Modal::Confirm { message, .. } => lines.push(format!("\n[?] {message}  (yes / no)")),
    }

    let heading = if app.is_editing {
        "Edit note"
    } else {
        "Create a new note"
    };
    let action = if app.is_editing { "save | cancel" } else { "save" };
    lines.push(format!("\n-- {heading} --"));
    lines.push(format!("Title:   {}", app.current_note.title));
    lines.push(format!("Content: {}", app.current_note.content));
    lines.push(format!("({action})"));

    lines.push(format!("\n-- All notes ({}) --", app.notes.len()));
    if app.notes.is_empty() {
        lines.push("No notes yet. Create the first one!".to_string());
    } else {
        lines.extend(app.notes.iter().map(format_note));
    }

    lines.join("\n")
}
