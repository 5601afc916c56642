//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::http::PageFetcher;
use crate::types::{DateBound, Page, Reference};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Helpers
// ============================================================================

/// Replays scripted responses and records the cursor of every call
#[derive(Default)]
struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<Page>>>,
    cursors: Mutex<Vec<Option<String>>>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<Result<Page>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            cursors: Mutex::default(),
        }
    }

    fn pages(pages: Vec<Page>) -> Self {
        Self::new(pages.into_iter().map(Ok).collect())
    }

    fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }

    fn calls(&self) -> usize {
        self.cursors.lock().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, entity_id: &str, cursor: Option<&str>) -> Result<Page> {
        assert_eq!(entity_id, "acme");
        self.cursors
            .lock()
            .unwrap()
            .push(cursor.map(str::to_string));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected fetch after {cursor:?}"))
    }
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn reference(id: &str, posted_on: &str) -> Reference {
    Reference {
        organization_name: "Acme".into(),
        author: Some("Jane Doe".into()),
        identifier: id.into(),
        summary: format!("Story {id}"),
        url: format!("https://news.example.com/{id}"),
        posted_on: date(posted_on),
    }
}

fn page(references: Vec<Reference>) -> Page {
    Page::new("Acme", references)
}

fn empty_page() -> Page {
    page(vec![])
}

fn bound(value: &str) -> DateBound {
    DateBound::parse(value).unwrap()
}

async fn collect<F: PageFetcher>(paginator: &mut ReferencePaginator<F>) -> Vec<String> {
    let mut ids = Vec::new();
    while let Some(reference) = paginator.next_reference().await.unwrap() {
        ids.push(reference.identifier);
    }
    ids
}

// ============================================================================
// State and Stats
// ============================================================================

#[test]
fn test_pagination_state_default() {
    let state = PaginationState::default();
    assert_eq!(state, PaginationState::Fetching);
    assert!(!state.is_terminal());
    assert!(PaginationState::Exhausted.is_terminal());
    assert!(PaginationState::Bounded.is_terminal());
    assert!(PaginationState::Failed.is_terminal());
    assert_eq!(PaginationState::Bounded.to_string(), "bounded");
}

#[test]
fn test_pagination_stats_mutations() {
    let mut stats = PaginationStats::default();
    stats.add_page();
    stats.add_record("a");
    stats.add_record("b");
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.records_emitted, 2);
    assert_eq!(stats.last_cursor.as_deref(), Some("b"));
}

// ============================================================================
// Termination
// ============================================================================

#[tokio::test]
async fn test_empty_first_page_exhausts_without_records() {
    let fetcher = ScriptedFetcher::pages(vec![empty_page()]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, DateBound::default());

    assert!(collect(&mut paginator).await.is_empty());
    assert_eq!(paginator.state(), PaginationState::Exhausted);

    // Terminal: pulling again must not hit the network
    assert!(paginator.next_reference().await.unwrap().is_none());
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_two_records_then_empty_page() {
    let fetcher = ScriptedFetcher::pages(vec![
        page(vec![
            reference("r1", "2021-05-02"),
            reference("r2", "2021-05-01"),
        ]),
        empty_page(),
    ]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, DateBound::default());

    assert_eq!(collect(&mut paginator).await, ["r1", "r2"]);
    assert_eq!(paginator.state(), PaginationState::Exhausted);
    assert_eq!(fetcher.cursors(), [None, Some("r2".to_string())]);
    assert_eq!(paginator.stats().pages_fetched, 2);
    assert_eq!(paginator.stats().records_emitted, 2);
}

#[tokio::test]
async fn test_record_before_bound_stops_run() {
    let fetcher = ScriptedFetcher::pages(vec![page(vec![
        reference("new", "2020-06-01"),
        reference("old", "2019-12-31"),
    ])]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, bound("2020-01-01"));

    assert_eq!(collect(&mut paginator).await, ["new"]);
    assert_eq!(paginator.state(), PaginationState::Bounded);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_bound_is_inclusive() {
    let fetcher = ScriptedFetcher::pages(vec![
        page(vec![reference("on-bound", "2020-01-01")]),
        empty_page(),
    ]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, bound("2020-01-01"));

    assert_eq!(collect(&mut paginator).await, ["on-bound"]);
    assert_eq!(paginator.state(), PaginationState::Exhausted);
}

#[tokio::test]
async fn test_out_of_bound_record_skips_rest_of_page_and_later_pages() {
    // A later in-bound entry on the same page is never reached
    let fetcher = ScriptedFetcher::pages(vec![
        page(vec![
            reference("a", "2020-03-01"),
            reference("b", "2020-02-01"),
        ]),
        page(vec![
            reference("c", "2020-01-15"),
            reference("d", "2019-06-01"),
            reference("e", "2019-05-01"),
        ]),
    ]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, bound("2020-01-01"));

    assert_eq!(collect(&mut paginator).await, ["a", "b", "c"]);
    assert_eq!(paginator.state(), PaginationState::Bounded);
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(paginator.stats().last_cursor.as_deref(), Some("c"));
}

#[tokio::test]
async fn test_first_record_out_of_bound_emits_nothing() {
    let fetcher = ScriptedFetcher::pages(vec![page(vec![reference("old", "2010-01-01")])]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, bound("2020-01-01"));

    assert!(collect(&mut paginator).await.is_empty());
    assert_eq!(paginator.state(), PaginationState::Bounded);
    assert_eq!(paginator.stats().records_emitted, 0);
}

// ============================================================================
// Cursor Handling
// ============================================================================

#[tokio::test]
async fn test_cursor_is_last_emitted_identifier() {
    let fetcher = ScriptedFetcher::pages(vec![
        page(vec![reference("p1a", "2022-03-03"), reference("p1b", "2022-03-02")]),
        page(vec![reference("p2a", "2022-02-02")]),
        page(vec![reference("p3a", "2022-01-01"), reference("p3b", "2021-12-31")]),
        empty_page(),
    ]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, DateBound::default());

    collect(&mut paginator).await;

    assert_eq!(
        fetcher.cursors(),
        [
            None,
            Some("p1b".to_string()),
            Some("p2a".to_string()),
            Some("p3b".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_start_cursor_is_used_for_first_fetch() {
    let fetcher = ScriptedFetcher::pages(vec![empty_page()]);
    let mut paginator = ReferencePaginator::new(
        &fetcher,
        "acme",
        Some("resume-here".to_string()),
        DateBound::default(),
    );

    collect(&mut paginator).await;

    assert_eq!(fetcher.cursors(), [Some("resume-here".to_string())]);
}

#[tokio::test]
async fn test_identical_responses_give_identical_output() {
    let script = || {
        ScriptedFetcher::pages(vec![
            page(vec![reference("x", "2020-05-05"), reference("y", "2020-04-04")]),
            page(vec![reference("z", "2019-01-01")]),
        ])
    };

    let first = script();
    let second = script();
    let mut run1 = ReferencePaginator::new(&first, "acme", None, bound("2019-06-01"));
    let mut run2 = ReferencePaginator::new(&second, "acme", None, bound("2019-06-01"));

    let out1 = collect(&mut run1).await;
    let out2 = collect(&mut run2).await;

    assert_eq!(out1, out2);
    assert_eq!(run1.state(), run2.state());
    assert_eq!(first.cursors(), second.cursors());
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_fetch_error_carries_context_and_fails_run() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page(vec![reference("r1", "2021-01-01")])),
        Err(Error::http_status(503, "unavailable")),
    ]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, DateBound::default());

    let first = paginator.next_reference().await.unwrap().unwrap();
    assert_eq!(first.identifier, "r1");

    let err = paginator.next_reference().await.unwrap_err();
    match &err {
        Error::Fetch {
            entity_id,
            cursor,
            source,
        } => {
            assert_eq!(entity_id, "acme");
            assert_eq!(cursor.as_deref(), Some("r1"));
            assert!(matches!(**source, Error::HttpStatus { status: 503, .. }));
        }
        other => panic!("Expected Fetch, got {other:?}"),
    }
    assert!(err.is_retryable());
    assert_eq!(paginator.state(), PaginationState::Failed);

    // Non-restartable
    assert!(paginator.next_reference().await.unwrap().is_none());
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_malformed_error_propagates() {
    let fetcher = ScriptedFetcher::new(vec![Err(Error::malformed("missing posted_on"))]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, DateBound::default());

    let err = paginator.next_reference().await.unwrap_err();
    assert!(err.is_malformed());
}

// ============================================================================
// Stream View
// ============================================================================

#[tokio::test]
async fn test_stream_yields_references_in_order() {
    let fetcher = ScriptedFetcher::pages(vec![
        page(vec![reference("a", "2020-02-02"), reference("b", "2020-02-01")]),
        empty_page(),
    ]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, DateBound::default());

    let items: Vec<Reference> = paginator
        .references()
        .map(|item| item.unwrap())
        .collect()
        .await;

    assert_eq!(items, vec![reference("a", "2020-02-02"), reference("b", "2020-02-01")]);
    assert_eq!(paginator.state(), PaginationState::Exhausted);
}

#[tokio::test]
async fn test_stream_stops_after_error() {
    let fetcher = ScriptedFetcher::new(vec![Err(Error::Timeout { timeout_ms: 10 })]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, DateBound::default());

    let items: Vec<Result<Reference>> = paginator.references().collect().await;

    assert_eq!(items.len(), 1);
    assert!(items[0].is_err());
}

#[tokio::test]
async fn test_dropping_stream_early_has_no_side_effects() {
    let fetcher = ScriptedFetcher::pages(vec![page(vec![
        reference("a", "2020-02-03"),
        reference("b", "2020-02-02"),
        reference("c", "2020-02-01"),
    ])]);
    let mut paginator = ReferencePaginator::new(&fetcher, "acme", None, DateBound::default());

    let first_two: Vec<_> = paginator.references().take(2).collect().await;
    assert_eq!(first_two.len(), 2);

    assert_eq!(paginator.state(), PaginationState::Fetching);
    assert_eq!(paginator.cursor(), Some("b"));
    assert_eq!(fetcher.calls(), 1);
}
