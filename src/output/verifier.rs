//! Caption set verification

use std::fmt;

use crate::domain::model::{CaptionSet, TimeSpec};

/// Slack allowed between the last caption and the narration end
pub const END_TOLERANCE_SECS: f64 = 1e-3;

/// One broken caption invariant
#[derive(Debug, Clone, PartialEq)]
pub enum CaptionIssue {
    /// Index is not its 1-based position
    IndexGap { position: usize, index: usize },
    /// Entry ends before it starts
    Inverted { index: usize },
    /// Entry does not start where the previous one ended
    NotContiguous { index: usize, gap: f64 },
    /// Last entry runs past the narration
    Overrun { end: f64, duration: f64 },
}

impl fmt::Display for CaptionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionIssue::IndexGap { position, index } => {
                write!(f, "entry at position {} has index {}", position, index)
            }
            CaptionIssue::Inverted { index } => write!(f, "entry {} ends before it starts", index),
            CaptionIssue::NotContiguous { index, gap } => {
                write!(f, "entry {} is off its predecessor by {:.3}s", index, gap)
            }
            CaptionIssue::Overrun { end, duration } => {
                write!(f, "captions end at {:.3}s, narration ends at {:.3}s", end, duration)
            }
        }
    }
}

/// Checks caption sets against the run duration
pub struct CaptionVerifier;

impl CaptionVerifier {
    /// Every invariant violation, in entry order
    pub fn check(captions: &CaptionSet, duration: TimeSpec) -> Vec<CaptionIssue> {
        let mut issues = Vec::new();
        let mut previous_end: Option<f64> = None;

        for (position, entry) in captions.iter().enumerate() {
            if entry.index != position + 1 {
                issues.push(CaptionIssue::IndexGap {
                    position: position + 1,
                    index: entry.index,
                });
            }
            if entry.end < entry.start {
                issues.push(CaptionIssue::Inverted { index: entry.index });
            }
            if let Some(end) = previous_end {
                if entry.start != end {
                    issues.push(CaptionIssue::NotContiguous {
                        index: entry.index,
                        gap: entry.start - end,
                    });
                }
            }
            previous_end = Some(entry.end);
        }

        let end = captions.end_time();
        if end > duration.as_seconds() + END_TOLERANCE_SECS {
            issues.push(CaptionIssue::Overrun {
                end,
                duration: duration.as_seconds(),
            });
        }

        issues
    }
}
