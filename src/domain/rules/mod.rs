// Domain rules - Caption timing policies

use crate::domain::errors::*;
use crate::domain::model::*;

#[cfg(test)]
mod tests;

/// Words per caption when nothing else is configured
pub const DEFAULT_CHUNK_SIZE: usize = 5;

/// What the caption stage has to work with
#[derive(Debug, Clone, PartialEq)]
pub enum CaptionInput<'a> {
    /// Externally timed segments, used verbatim
    Segments(&'a [Segment]),
    /// Untimed text spread over the run duration
    Text(&'a str),
}

impl<'a> CaptionInput<'a> {
    /// Pick the caption input for a run.
    ///
    /// Segments win whenever a transcription produced them and every one
    /// carries words. Transcribed plain text comes next, and the script is
    /// the fallback.
    pub fn select(transcription: Option<&'a InferenceResult>, script: &'a Script) -> Self {
        match transcription {
            Some(InferenceResult::Segments(segments)) if all_worded(segments) => {
                CaptionInput::Segments(segments)
            }
            Some(InferenceResult::PlainText(text)) if !text.trim().is_empty() => {
                CaptionInput::Text(text)
            }
            _ => CaptionInput::Text(script.as_str()),
        }
    }
}

fn all_worded(segments: &[Segment]) -> bool {
    !segments.is_empty() && segments.iter().all(|s| !s.text.trim().is_empty())
}

/// Builds timed caption sets
#[derive(Debug, Clone)]
pub struct CaptionSynthesizer {
    chunk_size: usize,
}

impl Default for CaptionSynthesizer {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl CaptionSynthesizer {
    /// Create a synthesizer grouping `chunk_size` words per caption
    pub fn new(chunk_size: usize) -> Result<Self, DomainError> {
        if chunk_size == 0 {
            return Err(DomainError::BadArgs(
                "Caption chunk size must be at least 1".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Dispatch on the input kind
    pub fn synthesize(
        &self,
        input: CaptionInput<'_>,
        duration: TimeSpec,
    ) -> Result<CaptionSet, DomainError> {
        match input {
            CaptionInput::Segments(segments) => self.from_segments(segments),
            CaptionInput::Text(text) => self.proportional(text, duration),
        }
    }

    /// One entry per segment, re-indexed from 1, timing untouched
    pub fn from_segments(&self, segments: &[Segment]) -> Result<CaptionSet, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyInput(
                "No captionable segments".to_string(),
            ));
        }
        // an entry without a text line breaks the SRT block structure
        if let Some(pos) = segments.iter().position(|s| s.text.trim().is_empty()) {
            return Err(DomainError::EmptyInput(format!(
                "Segment {} has no text",
                pos + 1
            )));
        }

        let entries = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| CaptionEntry {
                index: i + 1,
                start: segment.start,
                end: segment.end,
                text: segment.text.clone(),
            })
            .collect();

        Ok(CaptionSet {
            entries,
            source: CaptionSource::Segments,
        })
    }

    /// Split `text` into word chunks and give each an equal share of `duration`.
    ///
    /// Windows are contiguous from 0; the last one ends exactly at `duration`
    /// even when it holds fewer words.
    pub fn proportional(&self, text: &str, duration: TimeSpec) -> Result<CaptionSet, DomainError> {
        let total = duration.as_seconds();
        if !total.is_finite() || total < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Caption duration must be a non-negative number of seconds, got {}",
                total
            )));
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Err(DomainError::EmptyInput("No captionable text".to_string()));
        }

        let chunk_count = words.len().div_ceil(self.chunk_size);
        let per_chunk = total / chunk_count as f64;

        let mut entries = Vec::with_capacity(chunk_count);
        let mut start = 0.0;
        for (i, chunk) in words.chunks(self.chunk_size).enumerate() {
            let end = if i + 1 == chunk_count {
                total
            } else {
                (i + 1) as f64 * per_chunk
            };
            entries.push(CaptionEntry {
                index: i + 1,
                start,
                end,
                text: chunk.join(" "),
            });
            start = end;
        }

        Ok(CaptionSet {
            entries,
            source: CaptionSource::Proportional,
        })
    }
}
