//! Category label canonicalisation.
//!
//! Course categories are free text typed by instructors, so the same subject
//! arrives as "AI/ML", "ai ml" or "Artificial Intelligence". [`normalize`]
//! folds case, whitespace and a fixed table of known synonyms so the relation
//! graph and relevance checks compare like with like.

use std::collections::BTreeSet;

use coursewise_core::Course;

/// Synonym collapses applied after case and whitespace folding.
///
/// A phrase is replaced wherever it stands between word boundaries, so
/// compound labels such as "AI/ML Fundamentals" fold too.
const SYNONYMS: &[(&str, &str)] = &[
    ("ai/ml", "aiml"),
    ("ai ml", "aiml"),
    ("ai-ml", "aiml"),
    ("ai & ml", "aiml"),
    ("artificial intelligence", "aiml"),
    ("full stack", "fullstack"),
    ("full-stack", "fullstack"),
    ("web dev", "web development"),
    ("cyber security", "cybersecurity"),
    ("nodejs", "node.js"),
    ("node js", "node.js"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("react js", "react"),
];

/// Canonicalise a category label.
///
/// Lower-cases, trims, collapses inner whitespace runs and maps known
/// synonyms onto one spelling wherever they appear as whole words. Unknown
/// labels pass through folded but otherwise unchanged. The result is a
/// fixed point: normalising it again changes nothing.
///
/// # Examples
/// ```
/// use coursewise_scorer::normalize;
///
/// assert_eq!(normalize("  AI/ML "), "aiml");
/// assert_eq!(normalize("Web   Dev (Beginner)"), "web development (beginner)");
/// assert_eq!(normalize("Web Development"), "web development");
/// assert_eq!(normalize("Pottery"), "pottery");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut current = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    loop {
        let next = collapse_synonyms(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One left-to-right pass replacing the longest synonym that starts and ends
/// on a word boundary.
fn collapse_synonyms(folded: &str) -> String {
    let mut out = String::with_capacity(folded.len());
    let mut rest = folded;
    let mut at_boundary = true;
    while !rest.is_empty() {
        if at_boundary && let Some((after, to)) = longest_synonym_at(rest) {
            out.push_str(to);
            at_boundary = !to.ends_with(char::is_alphanumeric);
            rest = after;
            continue;
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
            at_boundary = !ch.is_alphanumeric();
        }
        rest = chars.as_str();
    }
    out
}

fn longest_synonym_at(text: &str) -> Option<(&str, &'static str)> {
    SYNONYMS
        .iter()
        .filter_map(|(from, to)| {
            text.strip_prefix(from)
                .filter(|after| !after.starts_with(char::is_alphanumeric))
                .map(|after| (from.len(), after, *to))
        })
        .max_by_key(|(len, _, _)| *len)
        .map(|(_, after, to)| (after, to))
}

/// Report whether either normalised label contains the other.
///
/// Identical labels always overlap; otherwise blank labels never match so an
/// empty category cannot claim relevance to everything.
pub(crate) fn overlaps(left: &str, right: &str) -> bool {
    if left == right {
        return true;
    }
    if left.is_empty() || right.is_empty() {
        return false;
    }
    left.contains(right) || right.contains(left)
}

/// Categories of a learner's enrolled courses, raw and normalised.
///
/// Raw labels drive exact, non-fuzzy checks such as the fallback's first
/// tier; normalised labels drive relation lookup and relevance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrolledCategories {
    raw: BTreeSet<String>,
    normalized: BTreeSet<String>,
}

impl EnrolledCategories {
    /// Collect categories from raw labels.
    #[must_use]
    pub fn new<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let raw: BTreeSet<String> = labels.into_iter().map(str::to_owned).collect();
        let normalized = raw.iter().map(|label| normalize(label)).collect();
        Self { raw, normalized }
    }

    /// Collect categories from enrolled courses.
    #[must_use]
    pub fn from_courses(courses: &[Course]) -> Self {
        Self::new(courses.iter().map(|course| course.category.as_str()))
    }

    /// Report whether `label` exactly equals an enrolled raw label.
    #[must_use]
    pub fn contains_raw(&self, label: &str) -> bool {
        self.raw.contains(label)
    }

    /// Report whether `normalized` equals an enrolled normalised label.
    #[must_use]
    pub fn contains_normalized(&self, normalized: &str) -> bool {
        self.normalized.contains(normalized)
    }

    /// Iterate the normalised labels in sorted order.
    pub fn normalized(&self) -> impl Iterator<Item = &str> {
        self.normalized.iter().map(String::as_str)
    }

    /// Report whether any normalised label overlaps `normalized`.
    pub(crate) fn overlaps(&self, normalized: &str) -> bool {
        self.normalized
            .iter()
            .any(|enrolled| overlaps(normalized, enrolled))
    }

    /// Report whether no categories were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
