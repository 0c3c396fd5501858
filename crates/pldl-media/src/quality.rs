//! Picking one resolution for the whole run.
//!
//! The operator chooses once; every later video reuses that label or is
//! skipped when it does not offer it. Nothing is substituted.

use std::io;

use crate::error::SelectError;
use crate::model::{StreamDescriptor, VideoDescriptor};

/// Source of the operator's quality answer.
pub trait Prompt {
    /// Present `options`, numbered from 1, and return the raw answer.
    fn choose(&mut self, options: &[String]) -> io::Result<String>;
}

/// Resolution labels of the progressive mp4 streams, lowest first.
///
/// Labels sort by the number formed from their digits ("360p" < "1080p").
/// If any label has no digits the whole list falls back to plain string
/// order. Duplicates are kept.
pub fn available_qualities(video: &VideoDescriptor) -> Vec<String> {
    let mut labels: Vec<String> = video
        .streams
        .iter()
        .filter(|s| s.is_progressive_mp4())
        .filter_map(|s| s.resolution.clone())
        .collect();

    if labels.iter().all(|l| resolution_key(l).is_some()) {
        labels.sort_by_key(|l| resolution_key(l));
    } else {
        labels.sort();
    }

    labels
}

/// First progressive mp4 stream, in resolver order, labelled `quality`.
pub fn select_stream<'a>(video: &'a VideoDescriptor, quality: &str) -> Option<&'a StreamDescriptor> {
    video
        .streams
        .iter()
        .find(|s| s.is_progressive_mp4() && s.resolution.as_deref() == Some(quality))
}

fn resolution_key(label: &str) -> Option<u64> {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Turn an answer into a zero-based index into `len` options.
fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    match answer.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// The run-wide quality choice.
///
/// Owned by whoever drives the playlist and passed by `&mut` to each
/// selection, so "ask once" needs no global state.
#[derive(Debug, Clone, Default)]
pub struct QualitySelector {
    selected: Option<String>,
}

impl QualitySelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A selector that starts out set, so it never prompts.
    pub fn preset(label: impl Into<String>) -> Self {
        Self {
            selected: Some(label.into()),
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.selected.is_some()
    }

    /// Return the label to download for a video offering `available`.
    ///
    /// Unset: asks `prompt` and stores a valid answer. An invalid answer
    /// leaves the selector unset, so the next video asks again.
    ///
    /// Set: the stored label is returned if `available` has it, otherwise
    /// [`SelectError::QualityUnavailable`] and the selector is unchanged.
    pub fn ensure_selected<P: Prompt + ?Sized>(
        &mut self,
        available: &[String],
        prompt: &mut P,
    ) -> Result<String, SelectError> {
        if self.selected.is_none() {
            let answer = prompt.choose(available)?;
            let Some(index) = parse_choice(&answer, available.len()) else {
                tracing::debug!(answer = %answer, options = available.len(), "invalid quality choice");
                return Err(SelectError::InvalidChoice { answer });
            };

            let label = available[index].clone();
            tracing::info!(quality = %label, "quality selected");
            self.selected = Some(label);
        }

        let selected = self.selected.clone().unwrap_or_default();
        if !available.contains(&selected) {
            return Err(SelectError::QualityUnavailable {
                selected,
                available: available.to_vec(),
            });
        }

        Ok(selected)
    }
}
