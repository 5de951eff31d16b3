//! Embedding-free ranking used when the scored path cannot run.

use std::collections::HashSet;

use coursewise_core::{Course, CourseId};
use log::debug;

use crate::category::{EnrolledCategories, normalize};
use crate::relations::CategoryRelationGraph;

/// Order courses by descending enrollment count and keep the first `top_n`.
///
/// The sort is stable, so equal counts keep their input order.
#[must_use]
pub fn most_popular<'a>(
    courses: impl IntoIterator<Item = &'a Course>,
    top_n: usize,
) -> Vec<&'a Course> {
    let mut ranked: Vec<&Course> = courses.into_iter().collect();
    ranked.sort_by(|left, right| right.enrollment_count.cmp(&left.enrollment_count));
    ranked.truncate(top_n);
    ranked
}

/// Catalog courses the learner is not enrolled in, in catalog order.
///
/// A repeated identifier keeps only its first entry, so no course can be
/// recommended twice.
pub(crate) fn distinct_candidates<'c>(
    enrolled: &[Course],
    catalog: &'c [Course],
) -> Vec<&'c Course> {
    let mut seen: HashSet<&CourseId> = enrolled.iter().map(|course| &course.id).collect();
    catalog
        .iter()
        .filter(|course| seen.insert(&course.id))
        .collect()
}

/// Degraded recommender relying only on categories and popularity.
///
/// Three tiers run in order, each only when the previous one cannot fill
/// `top_n` slots:
/// 1. candidates sharing an exact raw category with an enrolled course;
/// 2. those plus candidates whose normalised category contains a related
///    category;
/// 3. every non-enrolled candidate.
///
/// Each tier orders its pool by enrollment count. The recommender never
/// touches embeddings and cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRecommender<'g> {
    graph: &'g CategoryRelationGraph,
}

impl<'g> FallbackRecommender<'g> {
    /// Create a fallback recommender over `graph`.
    #[must_use]
    pub const fn new(graph: &'g CategoryRelationGraph) -> Self {
        Self { graph }
    }

    /// Recommend up to `top_n` catalog courses the learner is not enrolled in.
    #[must_use]
    pub fn recommend<'c>(
        &self,
        enrolled: &[Course],
        catalog: &'c [Course],
        top_n: usize,
    ) -> Vec<&'c Course> {
        let candidates = distinct_candidates(enrolled, catalog);
        let categories = EnrolledCategories::from_courses(enrolled);

        let same_category: Vec<&Course> = candidates
            .iter()
            .copied()
            .filter(|course| categories.contains_raw(&course.category))
            .collect();
        if same_category.len() >= top_n {
            debug!("fallback tier 1 filled {top_n} slots from enrolled categories");
            return most_popular(same_category, top_n);
        }

        let related = self.graph.related_with_scores(&categories);
        let mut pool = same_category;
        let mut pooled: HashSet<&CourseId> = pool.iter().map(|&course| &course.id).collect();
        for &course in &candidates {
            if pooled.contains(&course.id) {
                continue;
            }
            let normalized = normalize(&course.category);
            if related.iter().any(|(key, _)| normalized.contains(key)) {
                pooled.insert(&course.id);
                pool.push(course);
            }
        }
        if pool.len() >= top_n {
            debug!("fallback tier 2 filled {top_n} slots using related categories");
            return most_popular(pool, top_n);
        }

        debug!("fallback tier 3: ranking all candidates by popularity");
        most_popular(candidates, top_n)
    }
}
