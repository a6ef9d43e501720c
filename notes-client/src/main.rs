mod api;
mod state;
mod ui;

use tokio::io::{AsyncBufReadExt, BufReader};

use api::NotesApi;
use state::{App, PendingAction, Submit};
use ui::Command;

async fn refresh(api: &NotesApi, app: &mut App) {
    app.begin_loading();
    match api.list().await {
        Ok(notes) => app.loaded(notes),
        Err(e) => {
            tracing::error!("failed to load notes: {e}");
            app.load_failed(e.banner("Failed to load notes"));
        }
    }
}

async fn save(api: &NotesApi, app: &mut App) {
    match app.submit() {
        None => {}
        Some(Submit::Create(payload)) => match api.create(&payload).await {
            Ok(note) => app.apply_created(note),
            Err(e) => {
                tracing::error!("failed to create note: {e}");
                app.fail(e.banner("Failed to create note"));
            }
        },
        Some(Submit::Update(id, payload)) => match api.update(id, &payload).await {
            Ok(note) => app.apply_updated(note),
            Err(e) => {
                tracing::error!("failed to update note {id}: {e}");
                app.fail(e.banner("Failed to update note"));
            }
        },
    }
}

async fn confirm(api: &NotesApi, app: &mut App) {
    match app.confirm() {
        Some(PendingAction::Delete(id)) => match api.delete(id).await {
            Ok(_) => app.apply_deleted(id),
            Err(e) => {
                tracing::error!("failed to delete note {id}: {e}");
                app.fail(e.banner("Failed to delete note"));
            }
        },
        None => println!("Nothing to confirm"),
    }
}

/// Prints one note fresh from the server. Returns `false` when the request
/// failed and the error banner needs redrawing.
async fn show(api: &NotesApi, app: &mut App, id: i64) -> bool {
    match api.get(id).await {
        Ok(note) => {
            println!("{}\n    Updated: {}", ui::format_note(&note), note.updated_at);
            true
        }
        Err(e) => {
            tracing::error!("failed to get note {id}: {e}");
            app.fail(e.banner("Failed to load note"));
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log setup
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let base_url =
        std::env::var("NOTES_API_URL").unwrap_or_else(|_| "http://localhost:8080/api".to_string());
    let api = NotesApi::new(base_url.clone());
    tracing::info!("Using notes API at {}", base_url);

    let mut app = App::new();
    println!("{}", ui::render(&app));
    refresh(&api, &mut app).await;
    println!("{}", ui::render(&app));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ui::parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Title(title) => app.set_title(title),
            Command::Content(content) => app.set_content(content),
            Command::Save => save(&api, &mut app).await,
            Command::Edit(id) => {
                if !app.start_edit(id) {
                    println!("No note #{id} in the list");
                    continue;
                }
            }
            Command::Cancel => app.cancel(),
            Command::Delete(id) => app.request_delete(id),
            Command::Show(id) => {
                if show(&api, &mut app, id).await {
                    continue;
                }
            }
            Command::Yes => confirm(&api, &mut app).await,
            Command::No | Command::Ok => app.dismiss(),
            Command::Refresh => refresh(&api, &mut app).await,
            Command::Help => {
                println!("{}", ui::HELP);
                continue;
            }
            Command::Quit => break,
        }

        println!("{}", ui::render(&app));
    }

    Ok(())
}
