//! Extractive summarisation by leading sentences.

/// Texts with fewer words than this are returned unchanged.
pub const MIN_WORDS_TO_SUMMARIZE: usize = 50;

/// Number of sentences kept by [`LeadSentenceSummarizer::default`].
pub const LEAD_SENTENCES: usize = 3;

/// Produces a summary for a piece of text.
pub trait Summarizer {
    /// Summarise `text`.
    fn summarize(&self, text: &str) -> String;
}

/// Keeps the first few sentences of a text.
///
/// Sentences are split on `.`, trimmed, and empty fragments dropped; the
/// kept sentences are rejoined with `". "` and terminated with a full stop.
/// Short texts carry too little to condense and pass through untouched.
///
/// # Examples
/// ```
/// use coursewise_summary::{LeadSentenceSummarizer, Summarizer};
///
/// let summarizer = LeadSentenceSummarizer::new(3, 2);
/// assert_eq!(summarizer.summarize("One two. Three four. Five six."), "One two. Three four.");
/// assert_eq!(summarizer.summarize("Too short."), "Too short.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadSentenceSummarizer {
    min_words: usize,
    sentences: usize,
}

impl LeadSentenceSummarizer {
    /// Summarise texts of at least `min_words` words down to `sentences`
    /// sentences.
    #[must_use]
    pub const fn new(min_words: usize, sentences: usize) -> Self {
        Self {
            min_words,
            sentences,
        }
    }
}

impl Default for LeadSentenceSummarizer {
    fn default() -> Self {
        Self::new(MIN_WORDS_TO_SUMMARIZE, LEAD_SENTENCES)
    }
}

impl Summarizer for LeadSentenceSummarizer {
    fn summarize(&self, text: &str) -> String {
        if text.split_whitespace().count() < self.min_words {
            return text.to_owned();
        }
        let lead: Vec<&str> = text
            .split('.')
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .take(self.sentences)
            .collect();
        if lead.is_empty() {
            return text.to_owned();
        }
        format!("{}.", lead.join(". "))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn words(count: usize) -> String {
        vec!["word"; count].join(" ")
    }

    #[rstest]
    fn short_texts_pass_through() {
        let text = words(49);
        assert_eq!(LeadSentenceSummarizer::default().summarize(&text), text);
    }

    #[rstest]
    fn long_texts_keep_three_sentences() {
        let text = format!("{}. Second part. Third part. Fourth part.", words(60));
        let summary = LeadSentenceSummarizer::default().summarize(&text);
        assert_eq!(summary, format!("{}. Second part. Third part.", words(60)));
    }

    #[rstest]
    fn text_without_sentences_passes_through() {
        let text = "...".repeat(3);
        assert_eq!(LeadSentenceSummarizer::new(0, 3).summarize(&text), text);
    }

    #[rstest]
    fn fewer_sentences_than_requested_are_all_kept() {
        let summary = LeadSentenceSummarizer::new(1, 5).summarize("Only one sentence here");
        assert_eq!(summary, "Only one sentence here.");
    }
}
