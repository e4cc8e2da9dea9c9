use crate::model::{Draft, Note, NoteId};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;

pub const NOTES_PATH: &str = "/api/v1/notes";

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with {status}: {body}")]
    Server { status: StatusCode, body: String },
    #[error("could not decode notes: {0}")]
    Decode(String),
}

/// Transport for the remote note resource. Implementations carry no business rules.
pub trait NoteRepository: Send {
    fn list(&self) -> Result<Vec<Note>, RepoError>;
    fn create(&self, draft: &Draft) -> Result<(), RepoError>;
    fn update(&self, id: NoteId, draft: &Draft) -> Result<(), RepoError>;
    fn delete(&self, id: NoteId) -> Result<(), RepoError>;
}

pub struct HttpNoteRepository {
    client: Client,
    collection_url: String,
}

impl HttpNoteRepository {
    pub fn new(server_url: &str, timeout: Option<Duration>) -> Result<Self, RepoError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| RepoError::Network(err.to_string()))?;
        Ok(HttpNoteRepository {
            client,
            collection_url: collection_url(server_url),
        })
    }

    fn note_url(&self, id: NoteId) -> String {
        format!("{}/{}", self.collection_url, id)
    }
}

impl NoteRepository for HttpNoteRepository {
    fn list(&self) -> Result<Vec<Note>, RepoError> {
        tracing::debug!(url = %self.collection_url, "GET notes");
        let response = self
            .client
            .get(&self.collection_url)
            .send()
            .map_err(network)?;
        let response = ensure_success(response)?;
        let body = response.text().map_err(network)?;
        serde_json::from_str(&body).map_err(|err| RepoError::Decode(err.to_string()))
    }

    fn create(&self, draft: &Draft) -> Result<(), RepoError> {
        tracing::debug!(url = %self.collection_url, "POST note");
        let response = self
            .client
            .post(&self.collection_url)
            .json(draft)
            .send()
            .map_err(network)?;
        ensure_success(response).map(|_| ())
    }

    fn update(&self, id: NoteId, draft: &Draft) -> Result<(), RepoError> {
        let url = self.note_url(id);
        tracing::debug!(%url, "PUT note");
        let response = self.client.put(&url).json(draft).send().map_err(network)?;
        ensure_success(response).map(|_| ())
    }

    fn delete(&self, id: NoteId) -> Result<(), RepoError> {
        let url = self.note_url(id);
        tracing::debug!(%url, "DELETE note");
        let response = self.client.delete(&url).send().map_err(network)?;
        ensure_success(response).map(|_| ())
    }
}

pub fn collection_url(server_url: &str) -> String {
    format!("{}{}", server_url.trim_end_matches('/'), NOTES_PATH)
}

fn ensure_success(response: Response) -> Result<Response, RepoError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(RepoError::Server { status, body })
}

fn network(err: reqwest::Error) -> RepoError {
    RepoError::Network(err.to_string())
}
