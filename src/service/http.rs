//! Blocking HTTP client for the correction server's JSON API.

use super::{CorrectionResponse, CorrectionService, ServiceError, Suggestion, UpsertAck};
use crate::checker::statistics::PartialStatistics;
use crate::dict::entry::DictionaryEntry;
use crate::CorrectionRecord;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub struct HttpCorrectionService {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct CorrectRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CorrectEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    corrected_text: Option<String>,
    #[serde(default)]
    corrections: Vec<CorrectionRecord>,
    #[serde(default)]
    statistics: Option<PartialStatistics>,
}

#[derive(Serialize)]
struct SuggestRequest<'a> {
    word: &'a str,
}

#[derive(Deserialize)]
struct SuggestEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    word_data: Option<WordData>,
}

#[derive(Deserialize)]
struct WordData {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

impl HttpCorrectionService {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "posting to correction service");

        let response = self.client.post(&url).json(body).send()?;
        decode(response)
    }
}

fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ServiceError> {
    let status = response.status();
    let body = response.text()?;
    decode_body(status, body)
}

// The server answers validation failures with 4xx and a JSON body carrying
// `success: false`; those are decoded so the message reaches the user.
fn decode_body<R: DeserializeOwned>(status: StatusCode, body: String) -> Result<R, ServiceError> {
    if !status.is_success() && !status.is_client_error() {
        return Err(ServiceError::Server {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        if status.is_success() {
            ServiceError::Decode(e)
        } else {
            ServiceError::Server {
                status: status.as_u16(),
                body,
            }
        }
    })
}

impl CorrectEnvelope {
    fn into_response(self, text: &str) -> Result<CorrectionResponse, ServiceError> {
        if !self.success {
            return Err(ServiceError::Rejected(self.error.unwrap_or_default()));
        }
        Ok(CorrectionResponse {
            corrected_text: self.corrected_text.unwrap_or_else(|| text.to_string()),
            corrections: self.corrections,
            statistics: self.statistics,
        })
    }
}

impl CorrectionService for HttpCorrectionService {
    fn correct(&self, text: &str) -> Result<CorrectionResponse, ServiceError> {
        let envelope: CorrectEnvelope = self.post("/api/correct", &CorrectRequest { text })?;
        let response = envelope.into_response(text)?;
        info!(corrections = response.corrections.len(), "received corrections");
        Ok(response)
    }

    fn suggest(&self, word: &str) -> Result<Vec<Suggestion>, ServiceError> {
        let envelope: SuggestEnvelope =
            self.post("/api/suggest-addition", &SuggestRequest { word })?;
        if !envelope.success {
            return Err(ServiceError::Rejected(envelope.error.unwrap_or_default()));
        }

        Ok(envelope
            .word_data
            .map(|data| data.suggestions)
            .unwrap_or_default())
    }

    fn upsert_dictionary_word(&self, entry: &DictionaryEntry) -> Result<UpsertAck, ServiceError> {
        info!(word = %entry.word, "adding word to dictionary");
        self.post("/api/words", entry)
    }
}
