#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for the embedding-free fallback ranking.

use std::cell::RefCell;
use std::thread;
use std::time::Duration;

use coursewise_core::{
    Course, CourseId, EmbeddingError, EmbeddingModel, EmbeddingVector, RankingSource,
    RecommendRequest, RecommendResponse, Recommender,
};
use coursewise_scorer::{DeadlineModel, HashingEmbedder, RecommendationEngine, UnavailableModel};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Model that answers only after a fixed delay.
struct SlowModel(Duration);

impl EmbeddingModel for SlowModel {
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        thread::sleep(self.0);
        HashingEmbedder::default().embed(texts)
    }
}

/// Aggregate fixtures shared across the BDD scenarios.
pub struct TestContext {
    model: RefCell<Option<Box<dyn EmbeddingModel>>>,
    enrolled: RefCell<Vec<Course>>,
    catalog: RefCell<Vec<Course>>,
    response: RefCell<Option<RecommendResponse>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        model: RefCell::new(None),
        enrolled: RefCell::new(Vec::new()),
        catalog: RefCell::new(Vec::new()),
        response: RefCell::new(None),
    }
}

fn course(id: &str, category: &str, count: u64) -> Course {
    Course::new(
        CourseId::new(id).expect("valid course id"),
        category,
        format!("{category} course {id}"),
        count,
    )
}

#[given("a learner enrolled in a Python course")]
fn enrolled_in_python(context: &TestContext) {
    *context.enrolled.borrow_mut() = vec![course("py-0", "Python", 10)];
}

#[given("a catalog mixing Python, Django and cooking courses")]
fn mixed_catalog(context: &TestContext) {
    *context.catalog.borrow_mut() = vec![
        course("py-0", "Python", 10),
        course("py-a", "Python", 80),
        course("py-b", "Python", 30),
        course("dj-a", "Django", 50),
        course("ck-a", "Cooking", 400),
    ];
}

#[given("the embedding model is unavailable")]
fn model_unavailable(context: &TestContext) {
    *context.model.borrow_mut() = Some(Box::new(UnavailableModel::new("model not loaded")));
}

#[given("the embedding model exceeds its deadline")]
fn model_too_slow(context: &TestContext) {
    let slow = SlowModel(Duration::from_millis(300));
    *context.model.borrow_mut() = Some(Box::new(DeadlineModel::new(
        slow,
        Duration::from_millis(10),
    )));
}

#[when("I request {count} recommendations")]
fn request_many(context: &TestContext, count: usize) {
    let model = context
        .model
        .borrow_mut()
        .take()
        .expect("model should be configured");
    let engine = RecommendationEngine::new(model);
    let request = RecommendRequest::new(
        context.enrolled.borrow().clone(),
        context.catalog.borrow().clone(),
    )
    .with_top_n(count);
    let response = engine.recommend(&request).expect("request should be valid");
    *context.response.borrow_mut() = Some(response);
}

#[then("the most popular Python courses are returned")]
fn python_courses(context: &TestContext) {
    assert_eq!(recommended_ids(context), ["py-a", "py-b"]);
}

#[then("the ranking comes from the fallback")]
fn ranking_is_fallback(context: &TestContext) {
    let recorded = context.response.borrow();
    let response = recorded.as_ref().expect("response should be recorded");
    assert_eq!(response.source, RankingSource::Fallback);
    assert!(response.scores.is_empty());
}

#[then("the Django course joins the Python courses")]
fn django_joins(context: &TestContext) {
    assert_eq!(recommended_ids(context), ["py-a", "dj-a", "py-b"]);
}

#[then("every other course is returned by popularity")]
fn every_course(context: &TestContext) {
    assert_eq!(recommended_ids(context), ["ck-a", "py-a", "dj-a", "py-b"]);
}

fn recommended_ids(context: &TestContext) -> Vec<String> {
    context
        .response
        .borrow()
        .as_ref()
        .expect("response should be recorded")
        .course_ids
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[scenario(path = "tests/features/fallback.feature", index = 0)]
fn outage_uses_same_category(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/fallback.feature", index = 1)]
fn outage_widens_to_related(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/fallback.feature", index = 2)]
fn outage_ignores_categories(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/fallback.feature", index = 3)]
fn timeout_counts_as_outage(context: TestContext) {
    let _ = context;
}
