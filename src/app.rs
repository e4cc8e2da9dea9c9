use crate::dispatch::{Command, FormField};
use crate::form::{DraftForm, Edit};
use crate::model::{now, parse_calendar_date, DateError, Note, NoteId};
use crate::report::{Action, Outcome, ReportEntry, ReportSink};
use crate::repository::RepoError;
use crate::store::NoteStore;
use crate::worker::{Completion, Request};
use chrono::{Duration as ChronoDuration, NaiveDate};
use std::time::{Duration, Instant};

pub const CREATED: &str = "Note added successfully!";
pub const UPDATED: &str = "Note updated successfully!";
pub const DELETED: &str = "Note deleted successfully!";

pub enum Mode {
    Normal,
    Updating {
        note: Note,
        form: DraftForm,
        field: FormField,
    },
    ConfirmDelete {
        note: Note,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    raised_at: Instant,
}

/// Outstanding mutations, one slot per flow. A filled slot blocks resubmission.
#[derive(Debug, Default)]
struct InFlight {
    create: Option<String>,
    update: Option<NoteId>,
    delete: Option<NoteId>,
    refreshes: usize,
}

/// Session state of the notes view and the three mutation flows. Requests are queued in
/// an outbox; their results come back through [`App::complete`].
pub struct App {
    store: NoteStore,
    create: DraftForm,
    focus: Option<FormField>,
    mode: Mode,
    notice: Option<Notice>,
    notice_ttl: Duration,
    in_flight: InFlight,
    outbox: Vec<Request>,
    report: Option<Box<dyn ReportSink>>,
    calendar_cursor: NaiveDate,
}

impl App {
    pub fn new(notice_ttl: Duration) -> Self {
        let create = DraftForm::empty_at(now());
        let calendar_cursor = create.timestamp().date();
        App {
            store: NoteStore::new(),
            create,
            focus: None,
            mode: Mode::Normal,
            notice: None,
            notice_ttl,
            in_flight: InFlight::default(),
            outbox: Vec::new(),
            report: None,
            calendar_cursor,
        }
    }

    pub fn with_report(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.report = Some(sink);
        self
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn create_form(&self) -> &DraftForm {
        &self.create
    }

    pub fn focus(&self) -> Option<FormField> {
        self.focus
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn selected_note(&self) -> Option<&Note> {
        match &self.mode {
            Mode::Updating { note, .. } | Mode::ConfirmDelete { note } => Some(note),
            Mode::Normal => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn calendar_cursor(&self) -> NaiveDate {
        self.calendar_cursor
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.refreshes > 0
    }

    pub fn is_creating(&self) -> bool {
        self.in_flight.create.is_some()
    }

    pub fn is_updating(&self) -> bool {
        self.in_flight.update.is_some()
    }

    pub fn is_deleting(&self) -> bool {
        self.in_flight.delete.is_some()
    }

    /// True when keystrokes are headed for a text input.
    pub fn editing(&self) -> bool {
        matches!(self.mode, Mode::Updating { .. }) || self.focus.is_some()
    }

    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub fn refresh(&mut self) {
        self.in_flight.refreshes += 1;
        self.outbox.push(Request::List);
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SubmitCreate => self.submit_create(),
            Command::Focus(field) => self.focus_field(field),
            Command::OpenDelete(idx) => self.open_delete(idx),
            Command::OpenUpdate(idx) => self.open_update(idx),
            Command::ClearDraft => self.clear_create_draft(),
            Command::ShiftDate(days) => {
                self.create.shift_days(days);
                self.calendar_cursor = self.create.timestamp().date();
            }
        }
    }

    /// Focus lands in the update dialog when one is open, otherwise in the create form.
    pub fn focus_field(&mut self, target: FormField) {
        match &mut self.mode {
            Mode::Updating { field, .. } => *field = target,
            _ => self.focus = Some(target),
        }
    }

    pub fn next_field(&mut self) {
        match &mut self.mode {
            Mode::Updating { field, .. } => *field = field.next(),
            _ => self.focus = Some(self.focus.map_or(FormField::Title, FormField::next)),
        }
    }

    pub fn prev_field(&mut self) {
        match &mut self.mode {
            Mode::Updating { field, .. } => *field = field.prev(),
            _ => self.focus = Some(self.focus.map_or(FormField::Timestamp, FormField::prev)),
        }
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    /// Routes a text edit to whichever input currently has focus.
    pub fn edit(&mut self, edit: Edit) {
        match &mut self.mode {
            Mode::Updating { form, field, .. } => form.edit(*field, edit),
            _ => {
                if let Some(field) = self.focus {
                    self.create.edit(field, edit);
                    if field == FormField::Timestamp {
                        self.calendar_cursor = self.create.timestamp().date();
                    }
                }
            }
        }
    }

    pub fn open_update(&mut self, idx: usize) {
        let Some(note) = self.store.get(idx).cloned() else {
            return;
        };
        tracing::debug!(id = %note.id, "opening update dialog");
        let form = DraftForm::from_draft(&note.to_draft());
        self.mode = Mode::Updating {
            note,
            form,
            field: FormField::Title,
        };
    }

    pub fn open_delete(&mut self, idx: usize) {
        let Some(note) = self.store.get(idx).cloned() else {
            return;
        };
        tracing::debug!(id = %note.id, "opening delete confirmation");
        self.mode = Mode::ConfirmDelete { note };
    }

    pub fn close_dialog(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn clear_create_draft(&mut self) {
        self.create = DraftForm::empty_at(now());
        self.calendar_cursor = self.create.timestamp().date();
    }

    pub fn select_date(&mut self, iso: &str) -> Result<(), DateError> {
        let timestamp = parse_calendar_date(iso)?;
        self.create.set_timestamp(timestamp);
        self.calendar_cursor = timestamp.date();
        Ok(())
    }

    pub fn move_calendar(&mut self, days: i64) {
        if let Some(date) = self
            .calendar_cursor
            .checked_add_signed(ChronoDuration::days(days))
        {
            self.calendar_cursor = date;
        }
    }

    /// Hands the calendar cursor to the create draft, as a date pick would.
    pub fn pick_calendar_date(&mut self) -> Result<(), DateError> {
        let iso = self.calendar_cursor.format("%Y-%m-%d").to_string();
        self.select_date(&iso)
    }

    pub fn submit_create(&mut self) {
        if self.in_flight.create.is_some() {
            tracing::debug!("create already in flight");
            return;
        }
        if !self.create.validate() {
            tracing::debug!(errors = %self.create.errors(), "create draft rejected");
            return;
        }
        let draft = self.create.draft();
        self.in_flight.create = Some(draft.title.clone());
        self.outbox.push(Request::Create(draft));
    }

    pub fn submit_update(&mut self) {
        if self.in_flight.update.is_some() {
            tracing::debug!("update already in flight");
            return;
        }
        let Mode::Updating { note, form, .. } = &mut self.mode else {
            tracing::warn!("update submitted without a selected note");
            return;
        };
        if !form.validate() {
            tracing::debug!(errors = %form.errors(), "update draft rejected");
            return;
        }
        let id = note.id;
        let draft = form.draft();
        self.in_flight.update = Some(id);
        self.outbox.push(Request::Update { id, draft });
    }

    pub fn confirm_delete(&mut self) {
        if self.in_flight.delete.is_some() {
            tracing::debug!("delete already in flight");
            return;
        }
        let Mode::ConfirmDelete { note } = &self.mode else {
            tracing::warn!("delete confirmed without a selected note");
            return;
        };
        let id = note.id;
        self.in_flight.delete = Some(id);
        self.outbox.push(Request::Delete(id));
    }

    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Listed(result) => {
                self.in_flight.refreshes = self.in_flight.refreshes.saturating_sub(1);
                match result {
                    Ok(notes) => {
                        tracing::info!(count = notes.len(), "notes loaded");
                        self.store.replace_all(notes);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "error fetching notes");
                        self.fail(format!("Could not load notes: {}", err));
                    }
                }
            }
            Completion::Created(result) => {
                let title = self.in_flight.create.take();
                match result {
                    Ok(()) => {
                        tracing::info!(title = title.as_deref().unwrap_or_default(), "note created");
                        self.clear_create_draft();
                        self.record(Action::Create, None, title, Outcome::Ok);
                        self.succeed(CREATED);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "error saving note");
                        self.record_failure(Action::Create, None, title, &err);
                        self.fail(format!("Could not save note: {}", err));
                    }
                }
            }
            Completion::Updated(result) => {
                let id = self.in_flight.update.take();
                match result {
                    Ok(()) => {
                        tracing::info!(id = ?id, "note updated");
                        if matches!(&self.mode, Mode::Updating { note, .. } if Some(note.id) == id) {
                            self.close_dialog();
                        }
                        self.record(Action::Update, id, None, Outcome::Ok);
                        self.succeed(UPDATED);
                    }
                    Err(err) => {
                        tracing::error!(id = ?id, error = %err, "error updating note");
                        self.record_failure(Action::Update, id, None, &err);
                        self.fail(format!("Could not update note: {}", err));
                    }
                }
            }
            Completion::Deleted(result) => {
                let id = self.in_flight.delete.take();
                match result {
                    Ok(()) => {
                        tracing::info!(id = ?id, "note deleted");
                        if matches!(&self.mode, Mode::ConfirmDelete { note } if Some(note.id) == id) {
                            self.close_dialog();
                        }
                        self.record(Action::Delete, id, None, Outcome::Ok);
                        self.succeed(DELETED);
                    }
                    Err(err) => {
                        tracing::error!(id = ?id, error = %err, "error deleting note");
                        self.record_failure(Action::Delete, id, None, &err);
                        self.fail(format!("Could not delete note: {}", err));
                    }
                }
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn expire_notice(&mut self, now: Instant) {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|notice| now.duration_since(notice.raised_at) >= self.notice_ttl);
        if expired {
            self.notice = None;
        }
    }

    fn succeed(&mut self, message: &str) {
        self.raise(NoticeKind::Success, message.to_string());
        self.refresh();
    }

    fn fail(&mut self, message: String) {
        self.raise(NoticeKind::Failure, message);
    }

    fn raise(&mut self, kind: NoticeKind, message: String) {
        self.notice = Some(Notice {
            kind,
            message,
            raised_at: Instant::now(),
        });
    }

    fn record_failure(
        &mut self,
        action: Action,
        note: Option<NoteId>,
        title: Option<String>,
        err: &RepoError,
    ) {
        let outcome = Outcome::Failed {
            reason: err.to_string(),
        };
        self.record(action, note, title, outcome);
    }

    fn record(&mut self, action: Action, note: Option<NoteId>, title: Option<String>, outcome: Outcome) {
        if let Some(sink) = self.report.as_mut() {
            let entry = ReportEntry::new(action, note, title, outcome);
            if let Err(err) = sink.record(&entry) {
                tracing::warn!(error = %err, "could not append activity report");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Dispatch, Dispatcher, ShortcutMode};
    use crate::model::{parse_timestamp, Field};
    use crate::report::memory::MemoryReport;
    use crate::repository::fake::{Call, FakeRepository};
    use crate::worker::execute;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use reqwest::StatusCode;

    fn note(id: i64, title: &str, at: &str) -> Note {
        Note {
            id: NoteId(id),
            title: title.into(),
            description: "d".into(),
            timestamp: parse_timestamp(at).unwrap(),
        }
    }

    fn app() -> App {
        App::new(Duration::from_secs(3))
    }

    /// Runs every queued request against the fake until the outbox is empty.
    fn drive(app: &mut App, repo: &FakeRepository) {
        loop {
            let requests = app.take_requests();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                app.complete(execute(repo, request));
            }
        }
    }

    fn loaded(notes: Vec<Note>) -> (App, FakeRepository) {
        let repo = FakeRepository::with_notes(notes);
        let mut app = app();
        app.refresh();
        drive(&mut app, &repo);
        (app, repo)
    }

    fn press(app: &mut App, ch: char) {
        let dispatcher = Dispatcher::new(ShortcutMode::Global);
        let key = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        if let Dispatch::Consumed(Some(command)) =
            dispatcher.dispatch(&key, app.store().len(), app.editing())
        {
            app.apply(command);
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.edit(Edit::Insert(ch));
        }
    }

    fn fill_create(app: &mut App, title: &str, description: &str) {
        app.focus_field(FormField::Title);
        type_text(app, title);
        app.focus_field(FormField::Description);
        type_text(app, description);
        app.blur();
    }

    #[test]
    fn invalid_create_issues_no_request() {
        let mut app = app();
        fill_create(&mut app, "", "x");
        app.submit_create();
        assert!(app.take_requests().is_empty());
        assert_eq!(
            app.create_form().errors().get(Field::Title),
            Some("Title is required")
        );
        assert_eq!(app.create_form().draft().description, "x");
    }

    #[test]
    fn create_refreshes_from_backend() {
        let (mut app, repo) = loaded(vec![note(1, "A", "2024-01-01 10:00:00")]);
        fill_create(&mut app, "B", "second");
        app.submit_create();
        drive(&mut app, &repo);

        assert_eq!(app.store().notes(), repo.notes().as_slice());
        assert_eq!(app.store().len(), 2);
        assert_eq!(app.create_form().draft().title, "");
        assert_eq!(app.create_form().draft().description, "");
        let notice = app.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.message, CREATED);
        assert!(!app.is_creating());
        assert!(!app.is_loading());
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut app = app();
        fill_create(&mut app, "A", "a");
        press(&mut app, 'p');
        press(&mut app, 'p');
        let requests = app.take_requests();
        assert_eq!(requests.len(), 1);
        assert!(app.is_creating());
        app.complete(Completion::Created(Ok(())));
        assert!(!app.is_creating());
    }

    #[test]
    fn failed_create_keeps_draft_and_store() {
        let (mut app, repo) = loaded(vec![note(1, "A", "2024-01-01 10:00:00")]);
        let revision = app.store().revision();
        fill_create(&mut app, "B", "b");
        repo.fail_next(RepoError::Network("connection refused".into()));
        app.submit_create();
        drive(&mut app, &repo);

        assert_eq!(app.store().revision(), revision);
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.create_form().draft().title, "B");
        assert_eq!(app.notice().unwrap().kind, NoticeKind::Failure);
        assert!(!app.is_creating());
        app.submit_create();
        assert_eq!(app.take_requests().len(), 1);
    }

    #[test]
    fn delete_keys_respect_collection_size() {
        let (mut app, _repo) = loaded(vec![note(1, "A", "2024-01-01 10:00:00")]);
        press(&mut app, '2');
        assert!(matches!(app.mode(), Mode::Normal));
        assert!(app.selected_note().is_none());
        press(&mut app, '1');
        assert!(matches!(app.mode(), Mode::ConfirmDelete { .. }));
        assert_eq!(app.selected_note().map(|n| n.id), Some(NoteId(1)));
    }

    #[test]
    fn shortcuts_on_empty_collection_change_nothing() {
        let mut app = app();
        for ch in ['1', '2', 'u'] {
            press(&mut app, ch);
        }
        assert!(matches!(app.mode(), Mode::Normal));
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn update_closes_dialog_and_refreshes() {
        let (mut app, repo) = loaded(vec![
            note(5, "Old", "2024-01-01 10:00:00"),
            note(6, "Other", "2024-01-02 10:00:00"),
        ]);
        press(&mut app, 'u');
        assert_eq!(app.selected_note().map(|n| n.id), Some(NoteId(5)));

        app.focus_field(FormField::Title);
        for _ in 0.."Old".len() {
            app.edit(Edit::Backspace);
        }
        type_text(&mut app, "T");
        app.submit_update();
        let requests = app.take_requests();
        assert!(matches!(&requests[..], [Request::Update { id: NoteId(5), .. }]));

        for request in requests {
            app.complete(execute(&repo, request));
        }
        assert!(matches!(app.mode(), Mode::Normal));
        assert!(app.selected_note().is_none());
        assert_eq!(app.notice().unwrap().message, UPDATED);
        assert_eq!(app.take_requests(), vec![Request::List]);
    }

    #[test]
    fn invalid_update_stays_open() {
        let (mut app, _repo) = loaded(vec![note(5, "Old", "2024-01-01 10:00:00")]);
        app.open_update(0);
        app.focus_field(FormField::Description);
        app.edit(Edit::Backspace);
        app.submit_update();
        assert!(app.take_requests().is_empty());
        match app.mode() {
            Mode::Updating { form, .. } => assert_eq!(
                form.errors().get(Field::Description),
                Some("Description is required")
            ),
            _ => panic!("dialog closed"),
        }
    }

    #[test]
    fn update_without_selection_is_refused() {
        let mut app = app();
        app.submit_update();
        app.confirm_delete();
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn delete_removes_note_after_refresh() {
        let (mut app, repo) = loaded(vec![
            note(1, "A", "2024-01-01 10:00:00"),
            note(2, "B", "2024-01-02 10:00:00"),
        ]);
        press(&mut app, '2');
        app.confirm_delete();
        app.confirm_delete();
        assert_eq!(app.take_requests(), vec![Request::Delete(NoteId(2))]);
        app.complete(execute(&repo, Request::Delete(NoteId(2))));
        drive(&mut app, &repo);

        assert!(matches!(app.mode(), Mode::Normal));
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.notice().unwrap().message, DELETED);
        assert_eq!(
            repo.calls(),
            vec![Call::List, Call::Delete(NoteId(2)), Call::List]
        );
    }

    #[test]
    fn failed_delete_keeps_confirmation_open() {
        let (mut app, repo) = loaded(vec![note(1, "A", "2024-01-01 10:00:00")]);
        app.open_delete(0);
        repo.fail_next(RepoError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        });
        app.confirm_delete();
        drive(&mut app, &repo);
        assert!(matches!(app.mode(), Mode::ConfirmDelete { .. }));
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.notice().unwrap().kind, NoticeKind::Failure);
    }

    #[test]
    fn day_keys_shift_the_create_timestamp() {
        let mut app = app();
        app.select_date("2024-03-01").unwrap();
        for _ in 0..3 {
            press(&mut app, 'n');
        }
        assert_eq!(
            app.create_form().timestamp(),
            parse_timestamp("2024-03-04 00:00:00").unwrap()
        );
        press(&mut app, 'b');
        assert_eq!(
            app.create_form().timestamp(),
            parse_timestamp("2024-03-03 00:00:00").unwrap()
        );
        assert_eq!(
            app.calendar_cursor(),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
        );
    }

    #[test]
    fn clear_resets_fields_and_errors() {
        let mut app = app();
        fill_create(&mut app, "", "half");
        app.submit_create();
        press(&mut app, 'c');
        let form = app.create_form();
        assert!(form.errors().is_empty());
        assert_eq!(form.draft().description, "");
    }

    #[test]
    fn global_shortcuts_win_over_typing() {
        let mut app = app();
        press(&mut app, '/');
        assert_eq!(app.focus(), Some(FormField::Title));
        press(&mut app, 'd');
        assert_eq!(app.focus(), Some(FormField::Description));
        assert_eq!(app.create_form().draft().title, "");
    }

    #[test]
    fn calendar_pick_sets_midnight() {
        let mut app = app();
        app.select_date("2024-06-01").unwrap();
        app.move_calendar(7);
        app.pick_calendar_date().unwrap();
        assert_eq!(
            app.create_form().timestamp(),
            parse_timestamp("2024-06-08 00:00:00").unwrap()
        );
        assert!(app.select_date("someday").is_err());
        assert_eq!(
            app.create_form().timestamp(),
            parse_timestamp("2024-06-08 00:00:00").unwrap()
        );
    }

    #[test]
    fn late_completion_after_dialog_closed_is_handled() {
        let (mut app, repo) = loaded(vec![note(1, "A", "2024-01-01 10:00:00")]);
        app.open_update(0);
        app.submit_update();
        let requests = app.take_requests();
        app.close_dialog();
        for request in requests {
            app.complete(execute(&repo, request));
        }
        assert!(matches!(app.mode(), Mode::Normal));
        assert_eq!(app.notice().unwrap().message, UPDATED);
    }

    #[test]
    fn update_completion_leaves_another_notes_dialog_open() {
        let (mut app, repo) = loaded(vec![
            note(1, "A", "2024-01-01 10:00:00"),
            note(2, "B", "2024-01-02 10:00:00"),
        ]);
        app.open_update(0);
        app.submit_update();
        let requests = app.take_requests();
        app.close_dialog();
        app.open_update(1);
        type_text(&mut app, "!");
        for request in requests {
            app.complete(execute(&repo, request));
        }
        match app.mode() {
            Mode::Updating { note, form, .. } => {
                assert_eq!(note.id, NoteId(2));
                assert_eq!(form.draft().title, "B!");
            }
            _ => panic!("dialog for the second note was closed"),
        }
        assert_eq!(app.notice().unwrap().message, UPDATED);
    }

    #[test]
    fn delete_completion_leaves_another_notes_confirmation_open() {
        let (mut app, repo) = loaded(vec![
            note(1, "A", "2024-01-01 10:00:00"),
            note(2, "B", "2024-01-02 10:00:00"),
        ]);
        app.open_delete(0);
        app.confirm_delete();
        let requests = app.take_requests();
        app.close_dialog();
        app.open_delete(1);
        for request in requests {
            app.complete(execute(&repo, request));
        }
        assert!(matches!(app.mode(), Mode::ConfirmDelete { note } if note.id == NoteId(2)));
    }

    #[test]
    fn notices_expire_after_ttl() {
        let mut app = App::new(Duration::from_secs(10));
        app.complete(Completion::Listed(Err(RepoError::Network("down".into()))));
        assert!(app.notice().is_some());
        app.expire_notice(Instant::now());
        assert!(app.notice().is_some());
        app.expire_notice(Instant::now() + Duration::from_secs(11));
        assert!(app.notice().is_none());
    }

    #[test]
    fn outcomes_are_reported() {
        let report = MemoryReport::default();
        let repo = FakeRepository::default();
        let mut app = app().with_report(Box::new(report.clone()));
        fill_create(&mut app, "A", "a");
        app.submit_create();
        drive(&mut app, &repo);
        app.open_delete(0);
        repo.fail_next(RepoError::Network("refused".into()));
        app.confirm_delete();
        drive(&mut app, &repo);

        let entries = report.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, Action::Create);
        assert_eq!(entries[0].title.as_deref(), Some("A"));
        assert_eq!(entries[0].outcome, Outcome::Ok);
        assert_eq!(entries[1].action, Action::Delete);
        assert_eq!(entries[1].note, Some(NoteId(1)));
        assert!(matches!(entries[1].outcome, Outcome::Failed { .. }));
    }
}
