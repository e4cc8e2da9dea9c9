use crate::model::{project_events, DisplayEvent, Note};

/// The session's copy of the backend collection. It is only ever swapped wholesale
/// with the result of a successful `list()`.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    revision: u64,
}

impl NoteStore {
    pub fn new() -> Self {
        NoteStore::default()
    }

    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.revision += 1;
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Incremented on every replace; zero until the first successful load.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn events(&self) -> Vec<DisplayEvent> {
        project_events(&self.notes)
    }
}
