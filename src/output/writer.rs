//! SRT caption file writer

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::CaptionSet;
use crate::ports::FsPort;
use crate::utils::time::TimestampFormatter;

/// Serializes caption sets in SubRip format
pub struct SrtWriter;

impl SrtWriter {
    /// Four lines per entry: index, `start --> end`, text, blank separator
    pub fn render(captions: &CaptionSet) -> String {
        let mut out = String::new();
        for entry in captions.iter() {
            // writing into a String cannot fail
            let _ = write!(
                out,
                "{}\n{} --> {}\n{}\n\n",
                entry.index,
                TimestampFormatter::format(entry.start),
                TimestampFormatter::format(entry.end),
                single_line(&entry.text),
            );
        }
        out
    }

    /// Render and write to `path`, replacing any existing file
    pub async fn write(
        fs: &dyn FsPort,
        path: &Path,
        captions: &CaptionSet,
    ) -> Result<(), DomainError> {
        let body = Self::render(captions);
        fs.write_file(path, body.as_bytes()).await?;
        info!("Wrote {} captions to {}", captions.len(), path.display());
        Ok(())
    }
}

/// A blank line inside the text would end the entry early
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
