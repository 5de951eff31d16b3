#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for chunked summarisation.

use std::cell::{Cell, RefCell};

use coursewise_summary::{CHUNK_OVERLAP, SummaryError, chunked_summarize};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Aggregate fixtures shared across the BDD scenarios.
pub struct TestContext {
    material: RefCell<String>,
    calls: Cell<usize>,
    outcome: RefCell<Option<Result<String, SummaryError>>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        material: RefCell::new(String::new()),
        calls: Cell::new(0),
        outcome: RefCell::new(None),
    }
}

/// Stand-in summariser recording how often it runs.
fn tag(context: &TestContext, text: &str) -> String {
    let call = context.calls.get().saturating_add(1);
    context.calls.set(call);
    format!("s{call}:{}", text.chars().count())
}

#[given("course material of {length} characters")]
fn material_of_length(context: &TestContext, length: usize) {
    *context.material.borrow_mut() = "m".repeat(length);
}

#[when("I summarise it with a chunk size of {size}")]
fn summarise(context: &TestContext, size: usize) {
    let material = context.material.borrow().clone();
    let outcome = chunked_summarize(&material, |text| tag(context, text), size);
    *context.outcome.borrow_mut() = Some(outcome);
}

#[then("the summariser ran {count} times")]
fn summariser_calls(context: &TestContext, count: usize) {
    assert_eq!(context.calls.get(), count);
}

#[then("the summary is the summariser's output for the whole text")]
fn whole_text_summary(context: &TestContext) {
    let length = context.material.borrow().chars().count();
    assert_eq!(summary(context), format!("s1:{length}"));
}

#[then("the summary joins the partial summaries with spaces")]
fn joined_summary(context: &TestContext) {
    // 4000 characters in windows of 1500 starting at 0, 1300, 2600 and 3900.
    assert_eq!(CHUNK_OVERLAP, 200);
    assert_eq!(summary(context), "s1:1500 s2:1500 s3:1400 s4:100");
}

#[then("summarisation fails because windows cannot advance")]
fn chunk_size_rejected(context: &TestContext) {
    let outcome = context.outcome.borrow();
    assert_eq!(
        outcome.as_ref().expect("outcome should be recorded"),
        &Err(SummaryError::ChunkSizeTooSmall {
            chunk_size: 150,
            overlap: CHUNK_OVERLAP,
        })
    );
    assert_eq!(context.calls.get(), 0);
}

fn summary(context: &TestContext) -> String {
    context
        .outcome
        .borrow()
        .clone()
        .expect("outcome should be recorded")
        .expect("summarisation should succeed")
}

#[scenario(path = "tests/features/summary.feature", index = 0)]
fn short_material_single_pass(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/summary.feature", index = 1)]
fn long_material_per_window(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/summary.feature", index = 2)]
fn overlapping_chunk_size_rejected(context: TestContext) {
    let _ = context;
}
