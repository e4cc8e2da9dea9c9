use crate::app::{App, Mode, NoticeKind};
use crate::dispatch::{Dispatch, Dispatcher, FormField, ShortcutMode};
use crate::form::{DraftForm, Edit, FieldValue};
use crate::model::{events_per_day, Note};
use crate::worker::Worker;
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Terminal;
use std::collections::HashMap;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

pub fn run(app: App, worker: Worker, dispatcher: Dispatcher, server_url: &str) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut view = NotesView {
        app,
        worker,
        dispatcher,
        server_url: server_url.to_string(),
    };
    view.app.refresh();
    let result = view.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

/// The mounted notes view. The key listener lives exactly as long as the event loop;
/// dropping the view drops the worker's request channel.
struct NotesView {
    app: App,
    worker: Worker,
    dispatcher: Dispatcher,
    server_url: String,
}

impl NotesView {
    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            self.pump();
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Moves queued requests to the worker and folds finished ones back into the app.
    fn pump(&mut self) {
        for request in self.app.take_requests() {
            self.worker.submit(request);
        }
        for completion in self.worker.drain() {
            self.app.complete(completion);
        }
        for request in self.app.take_requests() {
            self.worker.submit(request);
        }
        self.app.expire_notice(Instant::now());
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => return true,
                KeyCode::Char('r') => {
                    self.app.refresh();
                    return false;
                }
                _ => {}
            }
        }

        match self
            .dispatcher
            .dispatch(&key, self.app.store().len(), self.app.editing())
        {
            Dispatch::Consumed(Some(command)) => {
                self.app.apply(command);
                return false;
            }
            Dispatch::Consumed(None) => return false,
            Dispatch::PassThrough => {}
        }

        match self.app.mode() {
            Mode::Updating { field, .. } => {
                let field = *field;
                self.handle_update_key(key, field);
            }
            Mode::ConfirmDelete { .. } => self.handle_confirm_key(key),
            Mode::Normal => self.handle_normal_key(key),
        }
        false
    }

    fn handle_update_key(&mut self, key: KeyEvent, field: FormField) {
        match key.code {
            KeyCode::Esc => self.app.close_dialog(),
            KeyCode::Enter => {
                let control = key.modifiers.contains(KeyModifiers::CONTROL);
                if field == FormField::Description && !control {
                    self.app.edit(Edit::Insert('\n'));
                } else {
                    self.app.submit_update();
                }
            }
            _ => self.handle_field_key(key),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => self.app.confirm_delete(),
            KeyCode::Esc => self.app.close_dialog(),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let Some(field) = self.app.focus() else {
            self.handle_calendar_key(key);
            return;
        };
        match key.code {
            KeyCode::Esc => self.app.blur(),
            KeyCode::Enter => {
                let control = key.modifiers.contains(KeyModifiers::CONTROL);
                if field == FormField::Description && !control {
                    self.app.edit(Edit::Insert('\n'));
                } else {
                    self.app.submit_create();
                }
            }
            _ => self.handle_field_key(key),
        }
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.app.dismiss_notice(),
            KeyCode::Tab => self.app.next_field(),
            KeyCode::BackTab => self.app.prev_field(),
            KeyCode::Left => self.app.move_calendar(-1),
            KeyCode::Right => self.app.move_calendar(1),
            KeyCode::Up => self.app.move_calendar(-7),
            KeyCode::Down => self.app.move_calendar(7),
            KeyCode::Enter => {
                if let Err(err) = self.app.pick_calendar_date() {
                    tracing::warn!(error = %err, "calendar pick rejected");
                }
            }
            _ => {}
        }
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.app.next_field(),
            KeyCode::BackTab => self.app.prev_field(),
            KeyCode::Left => self.app.edit(Edit::Left),
            KeyCode::Right => self.app.edit(Edit::Right),
            KeyCode::Up => self.app.edit(Edit::Up),
            KeyCode::Down => self.app.edit(Edit::Down),
            KeyCode::Backspace => self.app.edit(Edit::Backspace),
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.app.edit(Edit::Insert(c));
                }
            }
            _ => {}
        }
    }

    fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(14),
                Constraint::Min(6),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(layout[1]);
        self.draw_create_form(f, top[0]);
        self.draw_calendar(f, top[1]);
        self.draw_notes(f, layout[2]);
        self.draw_footer(f, layout[3]);

        match self.app.mode() {
            Mode::Updating { form, field, .. } => self.draw_update(f, form, *field),
            Mode::ConfirmDelete { note } => self.draw_confirm(f, note),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let mut spans = vec![
            Span::styled(
                "notecal ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::styled(self.server_url.clone(), Style::default().fg(Color::DarkGray)),
            Span::raw("  •  "),
            Span::styled(
                format!("{} note(s)", self.app.store().len()),
                Style::default().fg(Color::Green),
            ),
        ];
        if self.app.is_loading() {
            spans.push(Span::raw("  •  "));
            spans.push(Span::styled("loading…", Style::default().fg(Color::Yellow)));
        }
        if self.dispatcher.mode() == ShortcutMode::SuspendWhileEditing {
            spans.push(Span::raw("  •  "));
            spans.push(Span::styled(
                "shortcuts pause while typing",
                Style::default().fg(Color::Magenta),
            ));
        }
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_create_form(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let form = self.app.create_form();
        let focus = self.app.focus();
        let mut lines = form_lines(form, focus);
        let post = if self.app.is_creating() {
            Span::styled("posting…", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(
                "[p] Post",
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            )
        };
        lines.push(Line::from(post));
        let focused = focus.is_some();
        let block = Block::default()
            .title(Span::styled(
                "New Note",
                Style::default()
                    .fg(if focused { Color::Cyan } else { Color::Gray })
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn draw_calendar(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let counts = events_per_day(&self.app.store().events());
        let cursor = self.app.calendar_cursor();
        let draft_day = self.app.create_form().timestamp().date();
        let focused = self.app.focus().is_none() && matches!(self.app.mode(), Mode::Normal);
        let lines = calendar_lines(cursor, draft_day, Local::now().date_naive(), &counts, focused);
        let block = Block::default()
            .title(Span::styled(
                "Calendar",
                Style::default()
                    .fg(if focused { Color::Cyan } else { Color::Gray })
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_notes(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let notes = self.app.store().notes();
        let width = area.width.saturating_sub(4) as usize;
        let items = if self.app.store().is_empty() {
            vec![ListItem::new("No notes yet")]
        } else {
            notes
                .iter()
                .enumerate()
                .map(|(idx, note)| note_item(idx, note, width))
                .collect()
        };
        let block = Block::default()
            .title(Span::styled(
                format!("Notes ({})", notes.len()),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        f.render_widget(List::new(items).block(block), area);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let notice = match self.app.notice() {
            Some(notice) => {
                let color = match notice.kind {
                    NoticeKind::Success => Color::LightGreen,
                    NoticeKind::Failure => Color::LightRed,
                };
                Line::from(Span::styled(
                    notice.message.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
            }
            None => Line::from(""),
        };
        let status = Paragraph::new(notice)
            .alignment(Alignment::Right)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, rows[1]);
    }

    fn draw_update(&self, f: &mut ratatui::Frame<'_>, form: &DraftForm, field: FormField) {
        let area = centered_rect(70, 60, f.size());
        let mut lines = form_lines(form, Some(field));
        let hint = if self.app.is_updating() {
            "updating…"
        } else {
            "Ctrl+Enter to save • Esc to cancel • Tab/Shift-Tab to move • Enter adds newline in Description"
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::Gray))));
        let dialog = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(Span::styled(
                        "Update Note",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }

    fn draw_confirm(&self, f: &mut ratatui::Frame<'_>, note: &Note) {
        let area = centered_rect(50, 30, f.size());
        let prompt = if self.app.is_deleting() {
            "Deleting…"
        } else {
            "Press Enter or y to confirm, Esc to cancel"
        };
        let body = vec![
            Line::from(Span::styled(
                format!("Delete \"{}\"?", note.title),
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(prompt),
        ];
        let dialog = Paragraph::new(body).alignment(Alignment::Center).block(
            Block::default()
                .title(Span::styled(
                    "Confirm Deletion",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn help_line() -> Line<'static> {
    let key = |k: &'static str, color: Color| Span::styled(k, Style::default().fg(color));
    Line::from(vec![
        key("p", Color::LightGreen),
        Span::raw(" post  "),
        key("/ d t", Color::LightCyan),
        Span::raw(" title/desc/time  "),
        key("n b", Color::LightCyan),
        Span::raw(" next/prev day  "),
        key("u", Color::LightYellow),
        Span::raw(" edit 1st  "),
        key("1 2", Color::LightRed),
        Span::raw(" delete 1st/2nd  "),
        key("c", Color::LightMagenta),
        Span::raw(" clear  "),
        key("←↑↓→ Enter", Color::LightCyan),
        Span::raw(" pick date  "),
        key("Ctrl+R", Color::Gray),
        Span::raw(" reload  "),
        key("Ctrl+C", Color::LightRed),
        Span::raw(" quit"),
    ])
}

fn form_lines(form: &DraftForm, focus: Option<FormField>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for field in [FormField::Title, FormField::Description, FormField::Timestamp] {
        let active = focus == Some(field);
        lines.extend(field_lines(field.label(), form.field(field), active));
        let error = field.error_key().and_then(|key| form.errors().get(key));
        if let Some(message) = error {
            lines.push(Line::from(Span::styled(
                format!("  {}", message),
                Style::default().fg(Color::LightRed),
            )));
        }
    }
    lines
}

fn field_lines(label: &str, field: &FieldValue, active: bool) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::DIM);
    let value_style = Style::default().fg(if active { Color::Cyan } else { Color::White });
    let prefix = format!("{}: ", label);
    let spacer = " ".repeat(prefix.chars().count());
    let text = if active {
        field.with_caret()
    } else {
        field.value().to_string()
    };
    let segments: Vec<&str> = if text.is_empty() {
        vec![""]
    } else {
        text.split('\n').collect()
    };
    segments
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let lead = if idx == 0 {
                prefix.clone()
            } else {
                spacer.clone()
            };
            Line::from(vec![
                Span::styled(lead, label_style),
                Span::styled((*line).to_string(), value_style),
            ])
        })
        .collect()
}

fn calendar_lines(
    cursor: NaiveDate,
    draft_day: NaiveDate,
    today: NaiveDate,
    counts: &HashMap<NaiveDate, usize>,
    focused: bool,
) -> Vec<Line<'static>> {
    let month_start =
        NaiveDate::from_ymd_opt(cursor.year(), cursor.month(), 1).unwrap_or(cursor);
    let days = days_in_month(month_start.year(), month_start.month());
    let start_offset = month_start.weekday().num_days_from_monday();
    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("{} {}", month_start.format("%b"), month_start.year()),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    let headings = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    let header_spans: Vec<Span<'static>> = headings
        .iter()
        .map(|h| Span::styled(format!("{:^7}", h), Style::default().fg(Color::Gray)))
        .collect();
    lines.push(Line::from(header_spans));

    let mut day: i32 = 1 - start_offset as i32;
    while day <= days as i32 {
        let mut spans = Vec::new();
        for _ in 0..7 {
            if day < 1 || day > days as i32 {
                spans.push(Span::raw("       "));
            } else if let Some(date) =
                NaiveDate::from_ymd_opt(month_start.year(), month_start.month(), day as u32)
            {
                let count = counts.get(&date).copied().unwrap_or(0);
                let text = if count > 0 {
                    format!("{:>2} •{:<2} ", day, count)
                } else {
                    format!("{:>2}     ", day)
                };
                let mut style = Style::default().fg(if count > 0 {
                    Color::LightBlue
                } else {
                    Color::Gray
                });
                if date == today {
                    style = style.bg(Color::Rgb(80, 72, 20));
                }
                if date == draft_day {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                if date == cursor {
                    style = style
                        .bg(if focused { Color::Cyan } else { Color::Blue })
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD);
                }
                spans.push(Span::styled(text, style));
            }
            day += 1;
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn note_item(idx: usize, note: &Note, width: usize) -> ListItem<'static> {
    let shortcut = match idx {
        0 => "[1/u]",
        1 => "[2]  ",
        _ => "     ",
    };
    let header = Line::from(vec![
        Span::styled(shortcut, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(
            truncate_text(&note.title, width.saturating_sub(30)),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            note.timestamp.format("%b %-d, %Y %-I:%M %p").to_string(),
            Style::default().fg(Color::LightBlue),
        ),
        Span::styled(
            format!("  #{}", note.id),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let body = Line::from(Span::styled(
        format!(
            "      {}",
            truncate_text(&note.description.replace('\n', " "), width.saturating_sub(6))
        ),
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
    ));
    ListItem::new(vec![header, body])
}

fn truncate_text(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out = text
        .chars()
        .take(max.saturating_sub(3))
        .collect::<String>();
    out.push_str("...");
    out.chars().take(max).collect()
}
