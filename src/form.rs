use crate::dispatch::FormField;
use crate::model::{format_timestamp, parse_timestamp, validate, Draft, Field, FieldErrors};
use chrono::NaiveDateTime;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Backspace,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    pub fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: &str) {
        *self = FieldValue::new(value);
    }

    pub fn apply(&mut self, edit: Edit) {
        match edit {
            Edit::Insert(ch) => self.insert_char(ch),
            Edit::Backspace => self.backspace(),
            Edit::Left => self.move_left(),
            Edit::Right => self.move_right(),
            Edit::Up => self.move_up(),
            Edit::Down => self.move_down(),
        }
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_char(self.cursor, &self.value);
    }

    fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_char(self.cursor, &self.value);
    }

    fn move_up(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx == 0 {
            return;
        }
        let target_start = line_starts[line_idx - 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    fn move_down(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx + 1 >= line_starts.len() {
            return;
        }
        let target_start = line_starts[line_idx + 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

/// Editable state behind a draft: one buffer per input plus the last valid timestamp.
#[derive(Debug, Clone)]
pub struct DraftForm {
    title: FieldValue,
    description: FieldValue,
    timestamp_text: FieldValue,
    timestamp: NaiveDateTime,
    errors: FieldErrors,
}

impl DraftForm {
    pub fn empty_at(timestamp: NaiveDateTime) -> Self {
        DraftForm::from_draft(&Draft::empty_at(timestamp))
    }

    pub fn from_draft(draft: &Draft) -> Self {
        DraftForm {
            title: FieldValue::new(&draft.title),
            description: FieldValue::new(&draft.description),
            timestamp_text: FieldValue::new(&format_timestamp(&draft.timestamp)),
            timestamp: draft.timestamp,
            errors: FieldErrors::default(),
        }
    }

    pub fn draft(&self) -> Draft {
        Draft {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            timestamp: self.timestamp,
        }
    }

    pub fn field(&self, field: FormField) -> &FieldValue {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::Timestamp => &self.timestamp_text,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: NaiveDateTime) {
        self.timestamp = timestamp;
        self.timestamp_text.set(&format_timestamp(&timestamp));
    }

    pub fn shift_days(&mut self, days: i64) {
        let mut draft = self.draft();
        draft.shift_days(days);
        self.set_timestamp(draft.timestamp);
    }

    /// Runs validation, keeping the result for display. Returns true when valid.
    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.draft());
        self.errors.is_empty()
    }

    pub fn edit(&mut self, field: FormField, edit: Edit) {
        match field {
            FormField::Title => {
                self.title.apply(edit);
                if !self.title.value.is_empty() {
                    self.errors.clear(Field::Title);
                }
            }
            FormField::Description => {
                self.description.apply(edit);
                if !self.description.value.is_empty() {
                    self.errors.clear(Field::Description);
                }
            }
            FormField::Timestamp => {
                self.timestamp_text.apply(edit);
                // Half-typed values keep the previous timestamp.
                if let Ok(parsed) = parse_timestamp(&self.timestamp_text.value) {
                    self.timestamp = parsed;
                }
            }
        }
    }
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Timestamp,
            FormField::Timestamp => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Timestamp,
            FormField::Description => FormField::Title,
            FormField::Timestamp => FormField::Description,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Timestamp => "Date and Time",
        }
    }

    pub fn error_key(self) -> Option<Field> {
        match self {
            FormField::Title => Some(Field::Title),
            FormField::Description => Some(Field::Description),
            FormField::Timestamp => None,
        }
    }
}

fn prev_char(cursor: usize, text: &str) -> usize {
    text[..cursor]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_char(cursor: usize, text: &str) -> usize {
    text[cursor..]
        .chars()
        .next()
        .map(|ch| cursor + ch.len_utf8())
        .unwrap_or(text.len())
}

fn line_state(text: &str, cursor: usize) -> (Vec<usize>, usize, usize) {
    let mut starts = vec![0];
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(idx + 1);
        }
    }
    let line_idx = starts
        .iter()
        .rposition(|start| *start <= cursor)
        .unwrap_or(0);
    let col = text[starts[line_idx]..cursor].chars().count();
    (starts, line_idx, col)
}

fn index_at_col(text: &str, start: usize, target_col: usize) -> usize {
    let slice = &text[start..];
    let limit = slice.find('\n').unwrap_or(slice.len());
    slice[..limit]
        .char_indices()
        .nth(target_col)
        .map(|(idx, _)| start + idx)
        .unwrap_or(start + limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> NaiveDateTime {
        parse_timestamp(raw).unwrap()
    }

    fn type_into(form: &mut DraftForm, field: FormField, text: &str) {
        for ch in text.chars() {
            form.edit(field, Edit::Insert(ch));
        }
    }

    #[test]
    fn cursor_moves_over_multibyte_text() {
        let mut field = FieldValue::new("née");
        field.apply(Edit::Left);
        field.apply(Edit::Left);
        field.apply(Edit::Backspace);
        assert_eq!(field.value(), "ée");
        field.apply(Edit::Right);
        field.apply(Edit::Insert('!'));
        assert_eq!(field.value(), "é!e");
    }

    #[test]
    fn vertical_moves_keep_the_column() {
        let mut field = FieldValue::new("first\nsecond");
        field.apply(Edit::Up);
        field.apply(Edit::Insert('|'));
        assert_eq!(field.value(), "first|\nsecond");
        field.apply(Edit::Down);
        field.apply(Edit::Insert('|'));
        assert_eq!(field.value(), "first|\nsecond|");
    }

    #[test]
    fn typing_clears_that_fields_error_only() {
        let mut form = DraftForm::empty_at(ts("2024-01-01 00:00:00"));
        assert!(!form.validate());
        assert_eq!(form.errors().len(), 2);
        type_into(&mut form, FormField::Title, "Plan");
        assert_eq!(form.errors().get(Field::Title), None);
        assert_eq!(
            form.errors().get(Field::Description),
            Some("Description is required")
        );
    }

    #[test]
    fn timestamp_follows_only_parsable_text() {
        let mut form = DraftForm::empty_at(ts("2024-01-01 10:00:00"));
        for _ in 0..":00:00".len() {
            form.edit(FormField::Timestamp, Edit::Backspace);
        }
        assert_eq!(form.field(FormField::Timestamp).value(), "2024-01-01 10");
        assert_eq!(form.timestamp(), ts("2024-01-01 10:00:00"));
        type_into(&mut form, FormField::Timestamp, ":45");
        assert_eq!(form.timestamp(), ts("2024-01-01 10:45:00"));
    }

    #[test]
    fn shifting_rewrites_the_timestamp_text() {
        let mut form = DraftForm::empty_at(ts("2024-03-01 12:00:00"));
        form.shift_days(3);
        assert_eq!(form.timestamp(), ts("2024-03-04 12:00:00"));
        assert_eq!(
            form.field(FormField::Timestamp).value(),
            "2024-03-04 12:00:00"
        );
    }
}
