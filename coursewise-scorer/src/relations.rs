//! Static weighted relations between course categories.
//!
//! The graph answers two questions for a learner: which categories sit next
//! to the ones they study (with how strong an affinity), and how relevant a
//! given candidate's category is. Lookups are one hop only; the graph is not
//! traversed.

use std::collections::BTreeMap;
use std::io::Read;

use log::debug;

use crate::category::{EnrolledCategories, normalize, overlaps};
use crate::error::{ConfigError, RelationGraphError};

/// Multiplier applied to relations reached through a partial (substring)
/// category match rather than an exact key.
pub const PARTIAL_MATCH_DISCOUNT: f32 = 0.7;

/// Built-in technology graph: category, then related categories with their
/// affinity. Labels are normalised when the graph is built.
const DEFAULT_RELATIONS: &[(&str, &[(&str, f32)])] = &[
    (
        "Full Stack",
        &[
            ("Web Development", 0.9),
            ("JavaScript", 0.8),
            ("Node.js", 0.8),
            ("React", 0.8),
            ("HTML", 0.7),
            ("CSS", 0.7),
            ("Express", 0.7),
            ("MongoDB", 0.7),
            ("SQL", 0.6),
            ("Python", 0.6),
            ("Django", 0.6),
            ("Flask", 0.6),
            ("PHP", 0.6),
            ("Tailwind", 0.5),
            ("Bootstrap", 0.5),
        ],
    ),
    (
        "Web Development",
        &[
            ("Full Stack", 0.9),
            ("JavaScript", 0.9),
            ("HTML", 0.8),
            ("CSS", 0.8),
            ("React", 0.8),
            ("Vue", 0.7),
            ("Angular", 0.7),
            ("Node.js", 0.7),
            ("PHP", 0.6),
            ("Tailwind", 0.6),
            ("Bootstrap", 0.6),
            ("Python", 0.5),
        ],
    ),
    (
        "Frontend",
        &[
            ("HTML", 0.9),
            ("CSS", 0.9),
            ("JavaScript", 0.9),
            ("React", 0.8),
            ("Vue", 0.8),
            ("Angular", 0.8),
            ("TypeScript", 0.8),
            ("Tailwind", 0.7),
            ("Bootstrap", 0.6),
        ],
    ),
    (
        "Backend",
        &[
            ("Node.js", 0.9),
            ("Express", 0.8),
            ("Python", 0.8),
            ("Django", 0.8),
            ("Flask", 0.8),
            ("Java", 0.8),
            ("SQL", 0.8),
            ("PHP", 0.7),
            ("Spring", 0.7),
            ("PostgreSQL", 0.7),
            ("MySQL", 0.7),
            ("MongoDB", 0.7),
        ],
    ),
    (
        "AI/ML",
        &[
            ("Machine Learning", 1.0),
            ("Python", 0.9),
            ("Deep Learning", 0.9),
            ("Data Science", 0.8),
            ("TensorFlow", 0.8),
            ("PyTorch", 0.8),
            ("Scikit-learn", 0.7),
        ],
    ),
    (
        "Data Science",
        &[
            ("Python", 0.9),
            ("Statistics", 0.8),
            ("Machine Learning", 0.8),
            ("AI/ML", 0.8),
            ("SQL", 0.7),
            ("R Programming", 0.7),
        ],
    ),
    (
        "Mobile Development",
        &[
            ("React Native", 0.9),
            ("Flutter", 0.9),
            ("iOS", 0.8),
            ("Android", 0.8),
            ("Dart", 0.7),
            ("JavaScript", 0.5),
        ],
    ),
    (
        "DevOps",
        &[
            ("Docker", 0.9),
            ("Kubernetes", 0.9),
            ("CI/CD", 0.9),
            ("AWS", 0.8),
            ("Azure", 0.8),
            ("Linux", 0.8),
            ("Jenkins", 0.7),
            ("Git Version Control", 0.6),
        ],
    ),
    (
        "Cybersecurity",
        &[
            ("Network Security", 0.9),
            ("Ethical Hacking", 0.9),
            ("Cryptography", 0.8),
            ("Linux", 0.7),
            ("Python", 0.5),
        ],
    ),
    (
        "Blockchain",
        &[
            ("Smart Contracts", 0.9),
            ("Solidity", 0.9),
            ("Ethereum", 0.9),
            ("Web3", 0.8),
            ("Cryptocurrency", 0.8),
        ],
    ),
    (
        "HTML",
        &[
            ("CSS", 0.9),
            ("JavaScript", 0.8),
            ("Frontend", 0.8),
            ("Web Development", 0.8),
            ("Full Stack", 0.6),
        ],
    ),
    (
        "CSS",
        &[
            ("HTML", 0.9),
            ("Tailwind", 0.8),
            ("Frontend", 0.8),
            ("Bootstrap", 0.7),
            ("JavaScript", 0.7),
            ("Web Development", 0.7),
            ("Full Stack", 0.6),
        ],
    ),
    (
        "JavaScript",
        &[
            ("TypeScript", 0.9),
            ("React", 0.8),
            ("Node.js", 0.8),
            ("Frontend", 0.8),
            ("Web Development", 0.8),
            ("HTML", 0.7),
            ("CSS", 0.7),
            ("Full Stack", 0.7),
        ],
    ),
    (
        "React",
        &[
            ("JavaScript", 0.9),
            ("Frontend", 0.9),
            ("TypeScript", 0.8),
            ("Web Development", 0.8),
            ("Full Stack", 0.7),
        ],
    ),
    (
        "Node.js",
        &[
            ("JavaScript", 0.9),
            ("Express", 0.9),
            ("Backend", 0.9),
            ("Full Stack", 0.8),
            ("MongoDB", 0.7),
            ("Web Development", 0.7),
        ],
    ),
    (
        "Python",
        &[
            ("Django", 0.8),
            ("Flask", 0.8),
            ("Data Science", 0.8),
            ("AI/ML", 0.8),
            ("Backend", 0.7),
            ("Web Development", 0.5),
            ("Full Stack", 0.5),
        ],
    ),
    (
        "PHP",
        &[
            ("MySQL", 0.8),
            ("Backend", 0.8),
            ("Web Development", 0.7),
            ("Full Stack", 0.6),
        ],
    ),
    (
        "SQL",
        &[
            ("MySQL", 0.9),
            ("PostgreSQL", 0.9),
            ("Database", 0.9),
            ("Backend", 0.7),
            ("Data Science", 0.7),
            ("Web Development", 0.5),
            ("Full Stack", 0.5),
        ],
    ),
    (
        "Tailwind",
        &[
            ("CSS", 0.9),
            ("Frontend", 0.8),
            ("Web Development", 0.7),
            ("Full Stack", 0.6),
        ],
    ),
    (
        "TypeScript",
        &[
            ("JavaScript", 0.9),
            ("React", 0.8),
            ("Frontend", 0.8),
            ("Web Development", 0.7),
            ("Full Stack", 0.6),
        ],
    ),
];

/// Related categories with the best affinity reaching each of them.
///
/// Keys are normalised category names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelatedCategories {
    scores: BTreeMap<String, f32>,
}

impl RelatedCategories {
    /// Return the affinity for a normalised category, if related.
    #[must_use]
    pub fn get(&self, normalized: &str) -> Option<f32> {
        self.scores.get(normalized).copied()
    }

    /// Iterate `(category, affinity)` pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.scores
            .iter()
            .map(|(category, score)| (category.as_str(), *score))
    }

    /// Number of related categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Report whether nothing is related.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Best affinity among related keys overlapping `normalized`.
    pub(crate) fn best_overlap(&self, normalized: &str) -> Option<f32> {
        self.iter()
            .filter(|(key, _)| overlaps(normalized, key))
            .map(|(_, score)| score)
            .reduce(f32::max)
    }

    /// Merge `score` for `category`, keeping the maximum.
    fn merge(&mut self, category: &str, score: f32) {
        self.scores
            .entry(category.to_owned())
            .and_modify(|existing| *existing = existing.max(score))
            .or_insert(score);
    }
}

impl FromIterator<(String, f32)> for RelatedCategories {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        let mut related = Self::default();
        for (category, score) in iter {
            related.merge(&normalize(&category), score);
        }
        related
    }
}

/// Weighted, one-hop mapping between normalised category names.
///
/// Relations are directional: an edge from "python" to "django" says nothing
/// about the reverse edge, which may carry a different affinity or be absent.
///
/// # Examples
/// ```
/// use coursewise_scorer::{CategoryRelationGraph, EnrolledCategories};
///
/// let graph = CategoryRelationGraph::default();
/// let enrolled = EnrolledCategories::new(["AI/ML"]);
/// let related = graph.related_with_scores(&enrolled);
/// assert_eq!(related.get("machine learning"), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRelationGraph {
    edges: BTreeMap<String, BTreeMap<String, f32>>,
    partial_match_discount: f32,
}

impl CategoryRelationGraph {
    /// Build a graph from `(category, related, affinity)` triples.
    ///
    /// Labels are normalised; duplicate edges keep the highest affinity.
    ///
    /// # Errors
    /// Returns [`RelationGraphError::InvalidAffinity`] when an affinity is
    /// not a finite value in `0.0..=1.0`, and
    /// [`RelationGraphError::BlankCategory`] for labels that normalise to
    /// nothing.
    pub fn from_edges<I, S, T>(edges: I) -> Result<Self, RelationGraphError>
    where
        I: IntoIterator<Item = (S, T, f32)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut graph = Self {
            edges: BTreeMap::new(),
            partial_match_discount: PARTIAL_MATCH_DISCOUNT,
        };
        for (category, related, affinity) in edges {
            graph.insert(category.as_ref(), related.as_ref(), affinity)?;
        }
        Ok(graph)
    }

    /// Decode a graph from JSON shaped as
    /// `{"category": {"related": affinity, ...}, ...}`.
    ///
    /// # Errors
    /// Returns [`RelationGraphError::Decode`] for malformed JSON and the
    /// validation errors of [`CategoryRelationGraph::from_edges`].
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, RelationGraphError> {
        let raw: BTreeMap<String, BTreeMap<String, f32>> = serde_json::from_reader(reader)
            .map_err(|source| RelationGraphError::Decode { source })?;
        Self::from_edges(raw.into_iter().flat_map(|(category, related)| {
            related
                .into_iter()
                .map(move |(target, affinity)| (category.clone(), target, affinity))
        }))
    }

    /// Override the discount applied to substring-matched relations.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidDiscount`] unless `discount` is a finite
    /// value in `0.0..=1.0`.
    pub fn with_partial_match_discount(mut self, discount: f32) -> Result<Self, ConfigError> {
        if !discount.is_finite() || !(0.0..=1.0).contains(&discount) {
            return Err(ConfigError::InvalidDiscount);
        }
        self.partial_match_discount = discount;
        Ok(self)
    }

    /// Number of categories with outgoing relations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Report whether the graph has no relations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn insert(
        &mut self,
        category: &str,
        related: &str,
        affinity: f32,
    ) -> Result<(), RelationGraphError> {
        let from = normalize(category);
        let to = normalize(related);
        if from.is_empty() || to.is_empty() {
            return Err(RelationGraphError::BlankCategory);
        }
        if !affinity.is_finite() || !(0.0..=1.0).contains(&affinity) {
            return Err(RelationGraphError::InvalidAffinity {
                category: category.to_owned(),
                related: related.to_owned(),
                value: affinity,
            });
        }
        self.edges
            .entry(from)
            .or_default()
            .entry(to)
            .and_modify(|existing| *existing = existing.max(affinity))
            .or_insert(affinity);
        Ok(())
    }

    /// Collect categories related to the enrolled ones with their best
    /// affinity.
    ///
    /// Exact key matches contribute their relations unchanged. An enrolled
    /// category with no exact key instead borrows the relations of every key
    /// it contains or is contained by, discounted by the partial-match
    /// factor. Competing sources keep the maximum, and categories the
    /// learner already studies are never reported as related.
    #[expect(
        clippy::float_arithmetic,
        reason = "partial matches scale affinities by the configured discount"
    )]
    #[must_use]
    pub fn related_with_scores(&self, enrolled: &EnrolledCategories) -> RelatedCategories {
        let mut related = RelatedCategories::default();
        for category in enrolled.normalized() {
            if let Some(relations) = self.edges.get(category) {
                for (target, affinity) in relations {
                    related.merge(target, *affinity);
                }
                continue;
            }
            if category.is_empty() {
                continue;
            }
            for (key, relations) in &self.edges {
                if !overlaps(category, key) {
                    continue;
                }
                debug!("category `{category}` partially matches `{key}`");
                for (target, affinity) in relations {
                    related.merge(target, affinity * self.partial_match_discount);
                }
            }
        }
        related
            .scores
            .retain(|category, _| !enrolled.contains_normalized(category));
        related
    }
}

impl Default for CategoryRelationGraph {
    fn default() -> Self {
        let mut graph = Self {
            edges: BTreeMap::new(),
            partial_match_discount: PARTIAL_MATCH_DISCOUNT,
        };
        for (category, relations) in DEFAULT_RELATIONS {
            let entry = graph.edges.entry(normalize(category)).or_default();
            for (related, affinity) in *relations {
                entry.insert(normalize(related), *affinity);
            }
        }
        graph
    }
}

/// Score how relevant a candidate's category is to the learner.
///
/// A direct overlap with any enrolled category yields `1.0` regardless of the
/// related table. Otherwise the best affinity among overlapping related
/// categories is returned, or `0.0` when nothing overlaps.
///
/// # Examples
/// ```
/// use coursewise_scorer::{EnrolledCategories, RelatedCategories, category_relevance};
///
/// let enrolled = EnrolledCategories::new(["Web Development"]);
/// let related = RelatedCategories::default();
/// assert_eq!(category_relevance("Web Development (Beginner)", &enrolled, &related), 1.0);
/// assert_eq!(category_relevance("Cooking", &enrolled, &related), 0.0);
/// ```
#[must_use]
pub fn category_relevance(
    course_category: &str,
    enrolled: &EnrolledCategories,
    related: &RelatedCategories,
) -> f32 {
    let normalized = normalize(course_category);
    if enrolled.overlaps(&normalized) {
        return 1.0_f32;
    }
    related.best_overlap(&normalized).unwrap_or(0.0_f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn graph() -> CategoryRelationGraph {
        CategoryRelationGraph::default()
    }

    #[rstest]
    fn exact_matches_use_raw_affinities(graph: CategoryRelationGraph) {
        let related = graph.related_with_scores(&EnrolledCategories::new(["Python"]));
        assert_eq!(related.get("django"), Some(0.8));
        assert_eq!(related.get("aiml"), Some(0.8));
    }

    #[rstest]
    fn competing_sources_keep_the_maximum(graph: CategoryRelationGraph) {
        let related = graph.related_with_scores(&EnrolledCategories::new(["Python", "AI/ML"]));
        // python -> data science 0.8, aiml -> data science 0.8, aiml -> machine learning 1.0
        assert_eq!(related.get("data science"), Some(0.8));
        assert_eq!(related.get("machine learning"), Some(1.0));
    }

    #[rstest]
    fn enrolled_categories_are_never_related(graph: CategoryRelationGraph) {
        let related = graph.related_with_scores(&EnrolledCategories::new(["Python", "AI/ML"]));
        assert!(related.get("python").is_none());
        assert!(related.get("aiml").is_none());
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn partial_matches_are_discounted(graph: CategoryRelationGraph) {
        let related = graph.related_with_scores(&EnrolledCategories::new(["Advanced Python"]));
        let django = related.get("django").expect("django via partial python match");
        assert!((django - 0.8 * PARTIAL_MATCH_DISCOUNT).abs() < 0.000_1_f32);
    }

    #[rstest]
    fn unknown_categories_relate_to_nothing(graph: CategoryRelationGraph) {
        let related = graph.related_with_scores(&EnrolledCategories::new(["Pottery"]));
        assert!(related.is_empty());
    }

    #[rstest]
    fn sizes_count_source_categories_and_related_keys() {
        let empty = CategoryRelationGraph::from_json_reader("{}".as_bytes()).expect("empty graph");
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        let json = r#"{"rust": {"systems": 0.9, "wasm": 0.6}, "go": {"systems": 0.8}}"#;
        let graph = CategoryRelationGraph::from_json_reader(json.as_bytes()).expect("graph");
        assert_eq!(graph.len(), 2);

        let related = graph.related_with_scores(&EnrolledCategories::new(["Rust"]));
        assert!(!related.is_empty());
        assert_eq!(related.len(), 2);
    }

    #[rstest]
    fn synonyms_expand_identically(graph: CategoryRelationGraph) {
        let canonical = graph.related_with_scores(&EnrolledCategories::new(["aiml"]));
        let variant = graph.related_with_scores(&EnrolledCategories::new(["ai/ml"]));
        assert_eq!(canonical, variant);
        assert!(!canonical.is_empty());
    }

    #[rstest]
    fn expansion_is_single_hop(graph: CategoryRelationGraph) {
        // html -> css -> tailwind, but html has no direct tailwind edge.
        let related = graph.related_with_scores(&EnrolledCategories::new(["HTML"]));
        assert!(related.get("css").is_some());
        assert!(related.get("tailwind").is_none());
    }

    #[rstest]
    fn direct_match_beats_related_table() {
        let enrolled = EnrolledCategories::new(["Python"]);
        let related: RelatedCategories = [("python".to_owned(), 0.2_f32)].into_iter().collect();
        assert_eq!(category_relevance("python", &enrolled, &related), 1.0);
    }

    #[rstest]
    #[case("AI/ML Fundamentals", "AI/ML")]
    #[case("Web Dev (Beginner)", "Web Development")]
    #[case("Intro to Artificial Intelligence", "aiml")]
    fn compound_labels_match_their_synonyms(#[case] course: &str, #[case] enrolled: &str) {
        let enrolled = EnrolledCategories::new([enrolled]);
        let related = RelatedCategories::default();
        assert_eq!(category_relevance(course, &enrolled, &related), 1.0);
    }

    #[rstest]
    fn compound_labels_reach_related_categories(graph: CategoryRelationGraph) {
        let enrolled = EnrolledCategories::new(["Python"]);
        let related = graph.related_with_scores(&enrolled);
        assert_eq!(
            category_relevance("AI/ML Fundamentals", &enrolled, &related),
            0.8
        );
    }

    #[rstest]
    fn related_overlap_returns_best_affinity() {
        let enrolled = EnrolledCategories::new(["Python"]);
        let related: RelatedCategories = [
            ("django".to_owned(), 0.8_f32),
            ("django rest".to_owned(), 0.4_f32),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            category_relevance("Django REST Framework", &enrolled, &related),
            0.8
        );
    }

    #[rstest]
    fn json_graph_is_normalised_and_validated() {
        let json = r#"{"Full Stack": {"ReactJS": 0.9, "Node JS": 0.4}}"#;
        let graph = CategoryRelationGraph::from_json_reader(json.as_bytes()).expect("decode graph");
        let related = graph.related_with_scores(&EnrolledCategories::new(["full-stack"]));
        assert_eq!(related.get("react"), Some(0.9));
        assert_eq!(related.get("node.js"), Some(0.4));
    }

    #[rstest]
    #[case(1.5)]
    #[case(-0.1)]
    #[case(f32::NAN)]
    fn out_of_range_affinities_are_rejected(#[case] affinity: f32) {
        let err = CategoryRelationGraph::from_edges([("a", "b", affinity)])
            .expect_err("affinity should be rejected");
        assert!(matches!(err, RelationGraphError::InvalidAffinity { .. }));
    }

    #[rstest]
    fn discount_must_be_a_fraction(graph: CategoryRelationGraph) {
        let err = graph
            .with_partial_match_discount(1.2)
            .expect_err("discount above one");
        assert_eq!(err, ConfigError::InvalidDiscount);
    }
}
