//! Bounded-concurrency batch mapping: applies the extractor across a large
//! collection of titles, batch by batch.
//!
//! Each batch's items run concurrently; the next batch is not dispatched
//! until the current one is fully acknowledged, so peak concurrency is
//! capped at the batch size. The cancellation flag is checked between
//! batches only: cancelling stops dispatch but lets in-flight items finish,
//! so no partial results are ever emitted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::extractor::TitleExtractor;
use crate::types::{MappingResult, RawTitleItem};

/// Run-level cancellation signal shared with the caller.
pub type CancelFlag = Arc<AtomicBool>;

pub fn cancel_flag() -> CancelFlag {
    Arc::new(AtomicBool::new(false))
}

#[derive(Debug, Clone)]
pub struct BatchMapper {
    extractor: TitleExtractor,
    batch_size: usize,
}

impl BatchMapper {
    /// `batch_size` is validated by `MapperSettings`; a zero here is a
    /// caller bug and is coerced to 1 rather than hanging the pipeline.
    pub fn new(extractor: TitleExtractor, batch_size: usize) -> Self {
        Self {
            extractor,
            batch_size: batch_size.max(1),
        }
    }

    /// Map every item, yielding results as they complete. Exactly one
    /// result per input item, matched by source_id; no ordering guarantee
    /// across a batch. The receiver ends when all dispatched batches have
    /// drained or the flag cancelled further dispatch.
    pub fn map_all(
        &self,
        items: Vec<RawTitleItem>,
        cancel: CancelFlag,
    ) -> mpsc::Receiver<MappingResult> {
        let (tx, rx) = mpsc::channel(self.batch_size.max(16));
        let extractor = self.extractor.clone();
        let batch_size = self.batch_size;

        tokio::spawn(async move {
            let total = items.len();
            let mut dispatched = 0usize;
            let mut batches = items.into_iter().peekable();

            while batches.peek().is_some() {
                if cancel.load(Ordering::SeqCst) {
                    log::info!(
                        "batch mapping cancelled after {dispatched}/{total} items dispatched"
                    );
                    break;
                }

                let batch: Vec<RawTitleItem> = batches.by_ref().take(batch_size).collect();
                dispatched += batch.len();

                let mut handles = Vec::with_capacity(batch.len());
                for item in batch {
                    let extractor = extractor.clone();
                    let source_id = item.source_id.clone();
                    let handle = tokio::spawn(async move { extractor.extract(&item) });
                    handles.push((source_id, handle));
                }

                for (source_id, handle) in handles {
                    let result = match handle.await {
                        Ok(result) => result,
                        // A panicked worker degrades to an error-marked
                        // result; one bad title must not poison the run.
                        Err(error) => {
                            log::error!("extraction worker for {source_id} failed: {error}");
                            MappingResult::errored(source_id, error.to_string())
                        }
                    };
                    if tx.send(result).await.is_err() {
                        // Receiver dropped: nothing left to report to.
                        return;
                    }
                }
            }
        });

        rx
    }

    /// Convenience wrapper: run to completion and collect every result.
    pub async fn map_all_collect(&self, items: Vec<RawTitleItem>) -> Vec<MappingResult> {
        let mut rx = self.map_all(items, cancel_flag());
        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
#[path = "tests/batch_tests.rs"]
mod tests;
