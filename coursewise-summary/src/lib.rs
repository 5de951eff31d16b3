//! Summarisation of long course material.
//!
//! Summarisation models accept a bounded amount of text. [`chunked_summarize`]
//! splits longer documents into overlapping windows, summarises each, and
//! condenses the joined partial summaries once more when they are still too
//! long. Any `FnMut(&str) -> String` can act as the summariser;
//! [`LeadSentenceSummarizer`] is a dependency-free extractive one.

#![forbid(unsafe_code)]

mod chunk;
mod error;
mod lead;

pub use chunk::{CHUNK_OVERLAP, DEFAULT_MAX_CHUNK_SIZE, chunk_text, chunked_summarize};
pub use error::SummaryError;
pub use lead::{LEAD_SENTENCES, LeadSentenceSummarizer, MIN_WORDS_TO_SUMMARIZE, Summarizer};
