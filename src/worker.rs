use crate::model::{Draft, Note, NoteId};
use crate::repository::{NoteRepository, RepoError};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Create(Draft),
    Update { id: NoteId, draft: Draft },
    Delete(NoteId),
}

#[derive(Debug)]
pub enum Completion {
    Listed(Result<Vec<Note>, RepoError>),
    Created(Result<(), RepoError>),
    Updated(Result<(), RepoError>),
    Deleted(Result<(), RepoError>),
}

pub fn execute(repo: &dyn NoteRepository, request: Request) -> Completion {
    match request {
        Request::List => Completion::Listed(repo.list()),
        Request::Create(draft) => Completion::Created(repo.create(&draft)),
        Request::Update { id, draft } => Completion::Updated(repo.update(id, &draft)),
        Request::Delete(id) => Completion::Deleted(repo.delete(id)),
    }
}

/// Runs repository calls off the UI thread, one at a time, in submission order.
pub struct Worker {
    requests: Sender<Request>,
    completions: Receiver<Completion>,
}

impl Worker {
    pub fn spawn(repo: Box<dyn NoteRepository>) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (completion_tx, completion_rx) = mpsc::channel();
        thread::spawn(move || {
            for request in request_rx {
                let completion = execute(repo.as_ref(), request);
                if completion_tx.send(completion).is_err() {
                    tracing::debug!("view closed; dropping completion");
                }
            }
        });
        Worker {
            requests: request_tx,
            completions: completion_rx,
        }
    }

    pub fn submit(&self, request: Request) {
        if let Err(err) = self.requests.send(request) {
            tracing::warn!(request = ?err.0, "request worker is gone");
        }
    }

    /// Completions that have arrived since the last call, without blocking.
    pub fn drain(&self) -> Vec<Completion> {
        let mut done = Vec::new();
        loop {
            match self.completions.try_recv() {
                Ok(completion) => done.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        done
    }
}
