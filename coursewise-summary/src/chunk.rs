//! Overlapping windows and the two-pass chunked summary.

use std::iter;

use log::debug;

use crate::error::SummaryError;

/// Window size used when callers do not choose one.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1500;

/// Characters shared by consecutive windows in [`chunked_summarize`].
pub const CHUNK_OVERLAP: usize = 200;

/// Split `text` into windows of `chunk_size` characters sharing `overlap`
/// characters.
///
/// Sizes count Unicode scalar values, never bytes, so windows always fall on
/// character boundaries. Text no longer than `chunk_size` comes back as a
/// single chunk. Windows start every `chunk_size - overlap` characters and
/// the last one may be shorter.
///
/// # Errors
/// Returns [`SummaryError::ChunkSizeTooSmall`] when the text needs splitting
/// but `chunk_size` does not exceed `overlap`.
///
/// # Examples
/// ```
/// use coursewise_summary::chunk_text;
///
/// let chunks = chunk_text("abcdefgh", 4, 1)?;
/// assert_eq!(chunks, ["abcd", "defg", "gh"]);
/// # Ok::<(), coursewise_summary::SummaryError>(())
/// ```
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<&str>, SummaryError> {
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(iter::once(text.len()))
        .collect();
    let length = offsets.len().saturating_sub(1);
    if length <= chunk_size {
        return Ok(vec![text]);
    }
    let step = chunk_size
        .checked_sub(overlap)
        .filter(|step| *step > 0)
        .ok_or(SummaryError::ChunkSizeTooSmall {
            chunk_size,
            overlap,
        })?;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < length {
        let end = start.saturating_add(chunk_size).min(length);
        let window = offsets
            .get(start)
            .zip(offsets.get(end))
            .and_then(|(&from, &to)| text.get(from..to));
        if let Some(chunk) = window {
            chunks.push(chunk);
        }
        start = start.saturating_add(step);
    }
    Ok(chunks)
}

/// Summarise `text` with `summarize`, chunking when it exceeds
/// `max_chunk_size` characters.
///
/// Short text is summarised in one call. Longer text is split by
/// [`chunk_text`] with [`CHUNK_OVERLAP`], each window is summarised, and the
/// partial summaries are joined with single spaces. If that still exceeds
/// `max_chunk_size`, it is summarised once more. There is no third pass.
///
/// # Errors
/// Returns [`SummaryError::ChunkSizeTooSmall`] when chunking is required and
/// `max_chunk_size` does not exceed [`CHUNK_OVERLAP`].
///
/// # Examples
/// ```
/// use coursewise_summary::chunked_summarize;
///
/// let summary = chunked_summarize("short text", |text| text.to_uppercase(), 1500)?;
/// assert_eq!(summary, "SHORT TEXT");
/// # Ok::<(), coursewise_summary::SummaryError>(())
/// ```
pub fn chunked_summarize<F>(
    text: &str,
    mut summarize: F,
    max_chunk_size: usize,
) -> Result<String, SummaryError>
where
    F: FnMut(&str) -> String,
{
    if text.chars().count() <= max_chunk_size {
        return Ok(summarize(text));
    }

    let chunks = chunk_text(text, max_chunk_size, CHUNK_OVERLAP)?;
    let total = chunks.len();
    debug!("summarising {total} chunks");
    let partials: Vec<String> = chunks
        .into_iter()
        .enumerate()
        .map(|(idx, chunk)| {
            debug!("summarising chunk {}/{total}", idx.saturating_add(1));
            summarize(chunk)
        })
        .collect();

    let combined = partials.join(" ");
    if combined.chars().count() > max_chunk_size {
        debug!("condensing {total} partial summaries");
        return Ok(summarize(&combined));
    }
    Ok(combined)
}
