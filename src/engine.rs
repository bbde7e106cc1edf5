use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use crate::domain::{GeneRecord, ResourceRequest};
use crate::error::{FetchError, GeneCacheError};
use crate::events::{EventSink, FetchEvent};
use crate::fetch::Fetcher;
use crate::page::first_page;
use crate::urls::UrlBuilder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneOutcome {
    /// Every step ran; `panels` counts the panel fetches that succeeded.
    Completed { panels: usize },
    Aborted(AbortReason),
    /// Another worker aborted the run while this gene was being walked.
    Cancelled,
}

/// The references fetch that stopped the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbortReason {
    pub request: ResourceRequest,
    pub error: FetchError,
}

impl From<AbortReason> for GeneCacheError {
    fn from(reason: AbortReason) -> Self {
        GeneCacheError::ReferencesUnavailable {
            gene_id: reason.request.gene_id,
            url: reason.request.url,
            source: reason.error,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub genes: usize,
    pub panels: usize,
}

/// Walks the gene page, protein page, their panels and the references page
/// for each record.
///
/// Failures below the references page are reported and skipped. A failed
/// references fetch aborts the whole run.
pub struct Warmer<F: Fetcher> {
    fetcher: F,
    urls: UrlBuilder,
}

impl<F: Fetcher> Warmer<F> {
    pub fn new(fetcher: F, urls: UrlBuilder) -> Self {
        Self { fetcher, urls }
    }

    pub fn process_gene(&self, record: &GeneRecord, sink: &dyn EventSink) -> GeneOutcome {
        self.walk(record, sink, &AtomicBool::new(false))
    }

    /// `cancelled` is checked before every fetch and raised before a
    /// references failure is reported.
    fn walk(
        &self,
        record: &GeneRecord,
        sink: &dyn EventSink,
        cancelled: &AtomicBool,
    ) -> GeneOutcome {
        let mut panels = 0;
        for request in self.urls.top_level(record) {
            match self.warm_page(&request, sink, cancelled) {
                Some(fetched) => panels += fetched,
                None => return GeneOutcome::Cancelled,
            }
        }

        if cancelled.load(Ordering::SeqCst) {
            return GeneOutcome::Cancelled;
        }
        let references = self.urls.references(&record.gene_id);
        if let Err(error) = self.fetcher.get(&references.url) {
            cancelled.store(true, Ordering::SeqCst);
            sink.event(FetchEvent::failed(&references, &error));
            return GeneOutcome::Aborted(AbortReason {
                request: references,
                error,
            });
        }
        sink.event(FetchEvent::fetched(&references));
        sink.event(FetchEvent::gene_completed(&record.gene_id));
        GeneOutcome::Completed { panels }
    }

    /// Fetches a detail page and then every panel it lists, returning the
    /// number of panels fetched, or `None` once the run is cancelled.
    fn warm_page(
        &self,
        request: &ResourceRequest,
        sink: &dyn EventSink,
        cancelled: &AtomicBool,
    ) -> Option<usize> {
        if cancelled.load(Ordering::SeqCst) {
            return None;
        }
        let Some(body) = self.fetch(request, sink) else {
            return Some(0);
        };
        let page = match first_page(&body) {
            Ok(page) => page,
            Err(error) => {
                sink.event(FetchEvent::failed(request, &error));
                return Some(0);
            }
        };
        drop(body);

        let mut fetched = 0;
        for item in &page.items {
            if cancelled.load(Ordering::SeqCst) {
                return None;
            }
            let panel = self.urls.panel_source(&request.gene_id, &item.source);
            if self.fetch(&panel, sink).is_some() {
                fetched += 1;
            }
        }
        Some(fetched)
    }

    fn fetch(&self, request: &ResourceRequest, sink: &dyn EventSink) -> Option<Vec<u8>> {
        match self.fetcher.get(&request.url) {
            Ok(body) => {
                sink.event(FetchEvent::fetched(request));
                Some(body)
            }
            Err(error) => {
                sink.event(FetchEvent::failed(request, &error));
                None
            }
        }
    }

    /// Processes records one at a time in source order. The first record
    /// error or references failure ends the run; later records are never read.
    pub fn run<I>(&self, records: I, sink: &dyn EventSink) -> Result<RunSummary, GeneCacheError>
    where
        I: IntoIterator<Item = Result<GeneRecord, GeneCacheError>>,
    {
        let mut summary = RunSummary::default();
        for record in records {
            let record = record?;
            match self.process_gene(&record, sink) {
                GeneOutcome::Completed { panels } => {
                    summary.genes += 1;
                    summary.panels += panels;
                }
                GeneOutcome::Aborted(reason) => return Err(reason.into()),
                GeneOutcome::Cancelled => break,
            }
        }
        Ok(summary)
    }

    /// Shares the record source between `workers` threads. A fatal error on
    /// any worker stops every worker before its next fetch.
    pub fn run_concurrent<I>(
        &self,
        records: I,
        workers: usize,
        sink: &dyn EventSink,
    ) -> Result<RunSummary, GeneCacheError>
    where
        I: IntoIterator<Item = Result<GeneRecord, GeneCacheError>>,
        I::IntoIter: Send,
    {
        if workers <= 1 {
            return self.run(records, sink);
        }

        let source = Mutex::new(records.into_iter());
        let cancelled = AtomicBool::new(false);
        let failure: Mutex<Option<GeneCacheError>> = Mutex::new(None);
        let genes = AtomicUsize::new(0);
        let panels = AtomicUsize::new(0);

        let abort = |error: GeneCacheError| {
            cancelled.store(true, Ordering::SeqCst);
            let mut slot = failure.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if slot.is_none() {
                *slot = Some(error);
            }
        };

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    loop {
                        if cancelled.load(Ordering::SeqCst) {
                            break;
                        }
                        let next = source
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .next();
                        let record = match next {
                            None => break,
                            Some(Err(error)) => {
                                abort(error);
                                break;
                            }
                            Some(Ok(record)) => record,
                        };
                        if cancelled.load(Ordering::SeqCst) {
                            break;
                        }
                        match self.walk(&record, sink, &cancelled) {
                            GeneOutcome::Completed { panels: fetched } => {
                                genes.fetch_add(1, Ordering::SeqCst);
                                panels.fetch_add(fetched, Ordering::SeqCst);
                            }
                            GeneOutcome::Aborted(reason) => {
                                abort(reason.into());
                                break;
                            }
                            GeneOutcome::Cancelled => break,
                        }
                    }
                });
            }
        });

        let failure = failure
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(error) = failure {
            return Err(error);
        }
        Ok(RunSummary {
            genes: genes.into_inner(),
            panels: panels.into_inner(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;
    use crate::events::{EventKind, EventLevel};

    struct StaticFetcher {
        pages: HashMap<String, Result<Vec<u8>, FetchError>>,
    }

    impl Fetcher for StaticFetcher {
        fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .unwrap_or(Err(FetchError::Status(404)))
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<FetchEvent>>);

    impl EventSink for Recorder {
        fn event(&self, event: FetchEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    fn page(sources: &[&str]) -> Vec<u8> {
        let items: Vec<_> = sources
            .iter()
            .map(|source| serde_json::json!({"key": "k", "label": [], "source": source}))
            .collect();
        serde_json::to_vec(&serde_json::json!([{"items": items, "layout": "accordion"}])).unwrap()
    }

    #[test]
    fn decode_failure_skips_panels_but_not_references() {
        let mut pages = HashMap::new();
        pages.insert("http://t/gene/G/gene.json".to_string(), Ok(b"not json".to_vec()));
        pages.insert("http://t/gene/G/protein/T.json".to_string(), Ok(page(&["/p1"])));
        pages.insert("http://t/p1".to_string(), Ok(Vec::new()));
        pages.insert("http://t/gene/G/references.json".to_string(), Ok(Vec::new()));
        let warmer = Warmer::new(StaticFetcher { pages }, UrlBuilder::new("http://t").unwrap());
        let sink = Recorder::default();

        let outcome = warmer.process_gene(&GeneRecord::new("G", "T"), &sink);
        assert_eq!(outcome, GeneOutcome::Completed { panels: 1 });

        let events = sink.0.into_inner().unwrap();
        let decoding: Vec<_> = events
            .iter()
            .filter(|event| event.kind == EventKind::Decoding)
            .collect();
        assert_eq!(decoding.len(), 1);
        assert_eq!(decoding[0].level, EventLevel::Error);
        assert_eq!(events.last().unwrap().level, EventLevel::Info);
    }

    struct CancellingFetcher<'a> {
        cancelled: &'a AtomicBool,
        calls: AtomicUsize,
    }

    impl Fetcher for CancellingFetcher<'_> {
        fn get(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.cancelled.store(true, Ordering::SeqCst);
            Ok(page(&["/p1", "/p2"]))
        }
    }

    #[test]
    fn cancellation_stops_walk_before_next_fetch() {
        let cancelled = AtomicBool::new(false);
        let fetcher = CancellingFetcher {
            cancelled: &cancelled,
            calls: AtomicUsize::new(0),
        };
        let warmer = Warmer::new(fetcher, UrlBuilder::new("http://t").unwrap());
        let sink = Recorder::default();

        let outcome = warmer.walk(&GeneRecord::new("G", "T"), &sink, &cancelled);
        assert_eq!(outcome, GeneOutcome::Cancelled);
        assert_eq!(warmer.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.0.into_inner().unwrap().len(), 1);
    }

    #[test]
    fn references_failure_raises_cancellation() {
        let warmer = Warmer::new(
            StaticFetcher {
                pages: HashMap::new(),
            },
            UrlBuilder::new("http://t").unwrap(),
        );
        let cancelled = AtomicBool::new(false);
        let outcome = warmer.walk(&GeneRecord::new("G", "T"), &Recorder::default(), &cancelled);
        assert_matches!(outcome, GeneOutcome::Aborted(_));
        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn references_failure_aborts() {
        let warmer = Warmer::new(
            StaticFetcher {
                pages: HashMap::new(),
            },
            UrlBuilder::new("http://t").unwrap(),
        );
        let sink = Recorder::default();
        let outcome = warmer.process_gene(&GeneRecord::new("G", "T"), &sink);
        assert_matches!(
            outcome,
            GeneOutcome::Aborted(AbortReason { error: FetchError::Status(404), .. })
        );
        let events = sink.0.into_inner().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|event| event.level == EventLevel::Error));
    }
}
