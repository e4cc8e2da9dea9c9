use crate::app::App;
use crate::config::{Config, ConfigLocation};
use crate::dispatch::Dispatcher;
use crate::model::{
    format_timestamp, now, parse_timestamp, project_events, validate, Draft, Note, NoteId,
};
use crate::report::{read_entries, JsonlReport, Outcome};
use crate::repository::{HttpNoteRepository, NoteRepository};
use crate::ui;
use crate::worker::Worker;
use anyhow::{bail, Context, Result};

pub struct Session {
    pub config: Config,
    pub location: ConfigLocation,
}

impl Session {
    fn repository(&self) -> Result<HttpNoteRepository> {
        HttpNoteRepository::new(&self.config.server_url, self.config.request_timeout())
            .context("building HTTP client")
    }
}

pub fn list(session: &Session) -> Result<()> {
    let notes = session
        .repository()?
        .list()
        .with_context(|| format!("listing notes from {}", session.config.server_url))?;
    if notes.is_empty() {
        println!("(no notes)");
    }
    for note in &notes {
        print_note(note);
    }
    Ok(())
}

pub fn add(session: &Session, title: String, description: String, at: Option<String>) -> Result<()> {
    let timestamp = match at {
        Some(raw) => parse_timestamp(&raw)?,
        None => now(),
    };
    let draft = Draft {
        title,
        description,
        timestamp,
    };
    ensure_valid(&draft)?;
    session
        .repository()?
        .create(&draft)
        .context("creating note")?;
    tracing::info!(title = %draft.title, "note created from cli");
    println!("Added note \"{}\" at {}", draft.title, format_timestamp(&draft.timestamp));
    Ok(())
}

pub fn edit(
    session: &Session,
    id: i64,
    title: Option<String>,
    description: Option<String>,
    at: Option<String>,
) -> Result<()> {
    let repo = session.repository()?;
    let id = NoteId(id);
    let notes = repo.list().context("listing notes")?;
    let note = match notes.iter().find(|n| n.id == id) {
        Some(note) => note,
        None => bail!("note {} not found", id),
    };
    let mut draft = note.to_draft();
    if let Some(t) = title {
        draft.title = t;
    }
    if let Some(d) = description {
        draft.description = d;
    }
    if let Some(raw) = at {
        draft.timestamp = parse_timestamp(&raw)?;
    }
    ensure_valid(&draft)?;
    repo.update(id, &draft)
        .with_context(|| format!("updating note {}", id))?;
    tracing::info!(%id, "note updated from cli");
    println!("Updated note {}", id);
    Ok(())
}

pub fn delete(session: &Session, id: i64) -> Result<()> {
    let id = NoteId(id);
    session
        .repository()?
        .delete(id)
        .with_context(|| format!("deleting note {}", id))?;
    tracing::info!(%id, "note deleted from cli");
    println!("Deleted note {}", id);
    Ok(())
}

pub fn events(session: &Session) -> Result<()> {
    let notes = session.repository()?.list().context("listing notes")?;
    for event in project_events(&notes) {
        println!("{}  {}", event.start.format("%Y-%m-%d"), event.title);
    }
    Ok(())
}

pub fn activity(session: &Session) -> Result<()> {
    let path = session.location.report_path();
    let entries = read_entries(&path)?;
    if entries.is_empty() {
        println!("No activity recorded in {}", path.display());
    }
    for entry in entries {
        let subject = match (entry.note, entry.title.as_deref()) {
            (Some(id), _) => format!("#{}", id),
            (None, Some(title)) => format!("\"{}\"", title),
            (None, None) => String::new(),
        };
        let outcome = match entry.outcome {
            Outcome::Ok => "ok".to_string(),
            Outcome::Failed { reason } => format!("failed: {}", reason),
        };
        println!("{}  {:?} {}  {}", entry.at, entry.action, subject, outcome);
    }
    Ok(())
}

pub fn tui(session: &Session) -> Result<()> {
    let repo = session.repository()?;
    let mut app = App::new(session.config.notice_ttl());
    if session.config.report {
        app = app.with_report(Box::new(JsonlReport::new(session.location.report_path())));
    }
    let worker = Worker::spawn(Box::new(repo));
    let dispatcher = Dispatcher::new(session.config.shortcuts);
    ui::run(app, worker, dispatcher, &session.config.server_url)
}

fn ensure_valid(draft: &Draft) -> Result<()> {
    let errors = validate(draft);
    if errors.is_empty() {
        return Ok(());
    }
    for (field, message) in errors.iter() {
        eprintln!("  {}: {}", field.label(), message);
    }
    bail!("note is invalid: {}", errors)
}

fn print_note(note: &Note) {
    println!(
        "#{} {}  {}",
        note.id,
        format_timestamp(&note.timestamp),
        note.title
    );
    for line in note.description.lines() {
        println!("    {}", line);
    }
}
