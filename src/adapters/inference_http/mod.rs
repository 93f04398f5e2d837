//! Hosted inference adapter
//!
//! Talks to Hugging Face style inference endpoints: JSON `{"inputs": ...}`
//! requests for text generation and speech, raw audio bytes for
//! transcription. Every request carries the bearer token. Responses are
//! decoded defensively into [`InferenceResult`] variants.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::probe_wav::WavProbeAdapter;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Endpoint URLs for the three backends
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceEndpoints {
    pub text_generation: String,
    pub speech: String,
    pub transcription: String,
}

#[derive(Serialize)]
struct InputsRequest<'a> {
    inputs: &'a str,
}

/// HTTP inference client
pub struct HttpInferenceAdapter {
    client: reqwest::Client,
    endpoints: InferenceEndpoints,
    token: String,
}

impl HttpInferenceAdapter {
    /// Create adapter around an existing client
    pub fn new(client: reqwest::Client, endpoints: InferenceEndpoints, token: String) -> Self {
        Self {
            client,
            endpoints,
            token,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Send a request and return the body of a 2xx response
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<Vec<u8>, DomainError> {
        let response = request
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await
            .map_err(|e| DomainError::Transport(format!("{} request failed: {}", what, e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::Transport(format!("{} response unreadable: {}", what, e)))?;
        debug!("{} backend answered {} ({} bytes)", what, status, body.len());

        if !status.is_success() {
            return Err(DomainError::Transport(format!(
                "{} backend returned {}: {}",
                what,
                status,
                String::from_utf8_lossy(&body).trim()
            )));
        }

        Ok(body.to_vec())
    }

    fn parse_json(body: &[u8], what: &str) -> Option<Value> {
        match serde_json::from_slice(body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{} response is not JSON: {}", what, e);
                None
            }
        }
    }
}

/// Decode a text-generation payload.
///
/// Expects `[{"generated_text": "..."}]`; a bare object is accepted too.
/// The echoed prompt is stripped and whitespace trimmed.
pub fn decode_generation(value: &Value, prompt: &str) -> InferenceResult {
    let entry = match value {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(value),
        _ => None,
    };

    let generated = entry
        .and_then(|e| e.get("generated_text"))
        .and_then(Value::as_str);

    match generated {
        Some(text) => {
            let cleaned = text.strip_prefix(prompt).unwrap_or(text).trim();
            if cleaned.is_empty() {
                InferenceResult::NoResult
            } else {
                InferenceResult::Text(cleaned.to_string())
            }
        }
        None => InferenceResult::NoResult,
    }
}

/// Decode a transcription payload.
///
/// `segments: [{start, end, text}]` wins, then `chunks: [{timestamp: [s, e], text}]`,
/// then a flat `text`. A missing end is filled from the next entry's start, or
/// from `audio_end` for the last entry. A list holding an entry that still has
/// no usable timing is dropped whole, so its words survive through the next
/// shape. Blank entries are skipped.
pub fn decode_transcription(value: &Value, audio_end: Option<f64>) -> InferenceResult {
    let segments = timed_entries(value, "segments", fields_timing, audio_end)
        .or_else(|| timed_entries(value, "chunks", timestamp_timing, audio_end));

    if let Some(segments) = segments {
        return InferenceResult::Segments(segments);
    }

    match value.get("text").and_then(Value::as_str).map(str::trim) {
        Some(text) if !text.is_empty() => InferenceResult::PlainText(text.to_string()),
        _ => InferenceResult::NoResult,
    }
}

type Timing = (Option<f64>, Option<f64>);

fn fields_timing(item: &Value) -> Timing {
    (
        item.get("start").and_then(Value::as_f64),
        item.get("end").and_then(Value::as_f64),
    )
}

fn timestamp_timing(item: &Value) -> Timing {
    let pair = item.get("timestamp").and_then(Value::as_array);
    (
        pair.and_then(|p| p.first()).and_then(Value::as_f64),
        pair.and_then(|p| p.get(1)).and_then(Value::as_f64),
    )
}

fn timed_entries(
    value: &Value,
    key: &str,
    timing: fn(&Value) -> Timing,
    audio_end: Option<f64>,
) -> Option<Vec<Segment>> {
    let entries = value
        .get(key)?
        .as_array()?
        .iter()
        .map(|item| {
            let (start, end) = timing(item);
            Some((start?, end, item.get("text")?.as_str()?.trim()))
        })
        .collect::<Option<Vec<_>>>()?;

    let mut segments = Vec::with_capacity(entries.len());
    for (i, &(start, end, text)) in entries.iter().enumerate() {
        if text.is_empty() {
            continue;
        }
        let end = end
            .or_else(|| entries.get(i + 1).map(|next| next.0).or(audio_end))
            .filter(|end| *end >= start)?;
        segments.push(Segment {
            start,
            end,
            text: text.to_string(),
        });
    }
    Some(segments).filter(|segments| !segments.is_empty())
}

#[async_trait]
impl InferencePort for HttpInferenceAdapter {
    async fn generate_text(&self, prompt: &str) -> Result<InferenceResult, DomainError> {
        let request = self
            .client
            .post(&self.endpoints.text_generation)
            .json(&InputsRequest { inputs: prompt });
        let body = self.send(request, "Text generation").await?;

        Ok(Self::parse_json(&body, "Text generation")
            .map(|value| decode_generation(&value, prompt))
            .unwrap_or(InferenceResult::NoResult))
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, DomainError> {
        let request = self
            .client
            .post(&self.endpoints.speech)
            .json(&InputsRequest { inputs: text });
        let body = self.send(request, "Speech synthesis").await?;

        if body.is_empty() {
            return Err(DomainError::NoResult(
                "Speech backend returned no audio".to_string(),
            ));
        }
        Ok(body)
    }

    async fn transcribe(&self, audio: &[u8]) -> Result<InferenceResult, DomainError> {
        let request = self
            .client
            .post(&self.endpoints.transcription)
            .header(CONTENT_TYPE, "audio/wav")
            .body(audio.to_vec());
        let body = self.send(request, "Transcription").await?;

        // the trailing chunk may arrive without an end
        let audio_end = WavProbeAdapter::summarize_bytes(audio)
            .ok()
            .map(|summary| summary.duration.as_seconds());
        Ok(Self::parse_json(&body, "Transcription")
            .map(|value| decode_transcription(&value, audio_end))
            .unwrap_or(InferenceResult::NoResult))
    }
}
