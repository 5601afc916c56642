//! Press reference paginator

use super::types::{PaginationState, PaginationStats};
use crate::error::{Error, Result};
use crate::http::PageFetcher;
use crate::types::{DateBound, Reference};
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use tracing::debug;

/// Lazily pulls press references for one organization, newest first.
///
/// The sequence is finite and non-restartable: once a terminal state is
/// reached every further pull yields `None`.
pub struct ReferencePaginator<F> {
    fetcher: F,
    entity_id: String,
    bound: DateBound,
    cursor: Option<String>,
    pending: VecDeque<Reference>,
    state: PaginationState,
    stats: PaginationStats,
}

impl<F: PageFetcher> ReferencePaginator<F> {
    /// Create a paginator starting at `start_cursor` (`None` = newest record)
    pub fn new(
        fetcher: F,
        entity_id: impl Into<String>,
        start_cursor: Option<String>,
        bound: DateBound,
    ) -> Self {
        Self {
            fetcher,
            entity_id: entity_id.into(),
            bound,
            cursor: start_cursor,
            pending: VecDeque::new(),
            state: PaginationState::Fetching,
            stats: PaginationStats::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// Counters for this run
    pub fn stats(&self) -> &PaginationStats {
        &self.stats
    }

    /// Cursor the next fetch would use
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Pull the next reference within the bound.
    ///
    /// Returns `Ok(None)` once the run has ended. A fetch error moves the
    /// paginator to [`PaginationState::Failed`] and is returned with the
    /// entity id and cursor attached.
    pub async fn next_reference(&mut self) -> Result<Option<Reference>> {
        loop {
            if self.state.is_terminal() {
                return Ok(None);
            }

            if let Some(reference) = self.pending.pop_front() {
                if !self.bound.admits(reference.posted_on) {
                    debug!(
                        "Reference {} posted on {} is before {}, stopping",
                        reference.identifier, reference.posted_on, self.bound
                    );
                    self.pending.clear();
                    self.state = PaginationState::Bounded;
                    return Ok(None);
                }

                self.cursor = Some(reference.identifier.clone());
                self.stats.add_record(&reference.identifier);
                return Ok(Some(reference));
            }

            self.fetch_next_page().await?;
        }
    }

    /// Borrowing stream over the remaining references.
    ///
    /// Dropping the stream early leaves the paginator in `Fetching` with
    /// nothing in flight.
    pub fn references(&mut self) -> impl Stream<Item = Result<Reference>> + '_ {
        stream::try_unfold(self, |paginator| async move {
            let next = paginator.next_reference().await?;
            Ok::<_, Error>(next.map(|reference| (reference, paginator)))
        })
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        debug!(
            "Fetching press references for '{}' after {:?}",
            self.entity_id, self.cursor
        );

        let page = match self
            .fetcher
            .fetch(&self.entity_id, self.cursor.as_deref())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.state = PaginationState::Failed;
                return Err(Error::fetch(&self.entity_id, self.cursor.clone(), e));
            }
        };

        self.stats.add_page();

        if page.is_empty() {
            debug!("Empty page for '{}', no more references", self.entity_id);
            self.state = PaginationState::Exhausted;
            return Ok(());
        }

        debug!(
            "Page {} for '{}' has {} references",
            self.stats.pages_fetched,
            self.entity_id,
            page.len()
        );
        self.pending.extend(page);
        Ok(())
    }
}

impl<F> std::fmt::Debug for ReferencePaginator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferencePaginator")
            .field("entity_id", &self.entity_id)
            .field("bound", &self.bound)
            .field("cursor", &self.cursor)
            .field("pending", &self.pending.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
