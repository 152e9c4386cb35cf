//! Dataset load lifecycle and selection handling.
//!
//! ```text
//! Uninitialized ──begin_load──▶ Loading ──complete_load(ok)──▶ Ready
//!                                  │
//!                                  └────complete_load(err)───▶ Failed
//! ```
//!
//! Every `begin_load` hands out a new [`LoadTicket`]. Only the completion
//! carrying the latest ticket is applied; older in-flight loads are
//! discarded when they finish (last load wins).

use std::sync::Arc;

use limitrofe_dataset::Dataset;
use limitrofe_shared::{ColumnNames, DisplayConfig, FailureKind, LoadConfig, Result, SelectOption};
use limitrofe_source::{FetchOptions, Source};
use tracing::{debug, error, info, instrument};

use crate::display::{ResultView, SelectableListSink, selector_options};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Why the current load failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Pipeline state.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Ready(Arc<Dataset>),
    Failed(LoadFailure),
}

impl LoadState {
    /// Short name for logs and status bars.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// Identifies one load; higher tickets are newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

/// What happened to a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The dataset is ready.
    Ready { records: usize, entities: usize },
    /// The load failed; the selector shows the error entry.
    Failed(LoadFailure),
    /// A newer load had started; this result was dropped.
    Stale,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting load status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the load completes (successfully or not).
    fn done(&self, status: &LoadStatus);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _status: &LoadStatus) {}
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The single owner of the loaded dataset.
#[derive(Debug)]
pub struct Session {
    state: LoadState,
    latest: u64,
    columns: ColumnNames,
    messages: DisplayConfig,
}

impl Session {
    pub fn new(columns: ColumnNames, messages: DisplayConfig) -> Self {
        Self {
            state: LoadState::Uninitialized,
            latest: 0,
            columns,
            messages,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The ready dataset, if any.
    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        match &self.state {
            LoadState::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn messages(&self) -> &DisplayConfig {
        &self.messages
    }

    /// Start a new load.
    ///
    /// The previous dataset is dropped right away and the selector shows a
    /// single disabled loading entry until the load completes.
    pub fn begin_load(&mut self, sink: &mut dyn SelectableListSink) -> LoadTicket {
        self.latest += 1;
        self.state = LoadState::Loading;
        sink.set_options(&[SelectOption::notice(&self.messages.loading)]);
        debug!(ticket = self.latest, "load started");
        LoadTicket(self.latest)
    }

    /// Apply the fetched text of the load identified by `ticket`.
    ///
    /// Stale tickets are ignored. Otherwise the text is parsed and indexed
    /// and the selector is repopulated, or replaced by a single disabled
    /// error entry when fetching or parsing failed.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<String>,
        sink: &mut dyn SelectableListSink,
    ) -> LoadStatus {
        if ticket.0 != self.latest {
            debug!(ticket = ticket.0, latest = self.latest, "discarding stale load");
            return LoadStatus::Stale;
        }

        match fetched.and_then(|text| Dataset::from_text(&text, &self.columns)) {
            Ok(dataset) => {
                let status = LoadStatus::Ready {
                    records: dataset.records().len(),
                    entities: dataset.entities().len(),
                };
                sink.set_options(&selector_options(&dataset, &self.messages));
                self.state = LoadState::Ready(Arc::new(dataset));
                info!(ticket = ticket.0, ?status, "dataset ready");
                status
            }
            Err(e) => {
                let failure = LoadFailure {
                    kind: e.kind(),
                    message: e.to_string(),
                };
                error!(ticket = ticket.0, kind = %failure.kind, error = %e, "failed to load dataset");
                sink.set_options(&[SelectOption::notice(&self.messages.load_error)]);
                self.state = LoadState::Failed(failure.clone());
                LoadStatus::Failed(failure)
            }
        }
    }

    /// Fetch `source` and apply it: `begin_load`, fetch, `complete_load`.
    #[instrument(skip_all, fields(source = %source))]
    pub async fn load(
        &mut self,
        source: &Source,
        opts: &FetchOptions,
        sink: &mut dyn SelectableListSink,
        progress: &dyn ProgressReporter,
    ) -> LoadStatus {
        let ticket = self.begin_load(sink);

        progress.phase("Fetching dataset");
        let fetched = limitrofe_source::fetch(source, opts).await;

        progress.phase("Indexing municipalities");
        let status = self.complete_load(ticket, fetched, sink);

        progress.done(&status);
        status
    }

    /// Result for the value the selector reported.
    ///
    /// Outside `Ready` there is nothing to list: an empty value still gets
    /// the "nothing selected" message, anything else "no data".
    pub fn select(&self, value: &str) -> ResultView {
        let query = match &self.state {
            LoadState::Ready(dataset) => dataset.neighbors_of(value),
            _ if value.trim().is_empty() => limitrofe_dataset::NeighborQuery::NoSelection,
            _ => limitrofe_dataset::NeighborQuery::NotFound,
        };
        ResultView::from_query(query, &self.messages)
    }
}

/// Build a session and its source from merged runtime settings.
pub fn session_from_config(
    config: &LoadConfig,
    messages: DisplayConfig,
) -> Result<(Session, Source, FetchOptions)> {
    config.validate()?;
    let source = Source::parse(&config.location)?;
    let opts = FetchOptions::from(config);
    Ok((Session::new(config.columns.clone(), messages), source, opts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::OptionBuffer;
    use limitrofe_shared::LimitrofeError;

    const SCENARIO: &str =
        "NM_MUN,NM_LIM\nPelotas,Capão do Leão\nPelotas,Arroio Grande\nCapão do Leão,Pelotas\n";

    fn session() -> Session {
        Session::new(ColumnNames::default(), DisplayConfig::default())
    }

    fn labels(sink: &OptionBuffer) -> Vec<&str> {
        sink.options.iter().map(|o| o.label.as_str()).collect()
    }

    #[test]
    fn starts_uninitialized() {
        let session = session();
        assert!(matches!(session.state(), LoadState::Uninitialized));
        assert!(session.dataset().is_none());
    }

    #[test]
    fn begin_load_shows_loading_entry() {
        let mut session = session();
        let mut sink = OptionBuffer::default();
        session.begin_load(&mut sink);

        assert!(matches!(session.state(), LoadState::Loading));
        assert_eq!(labels(&sink), vec!["Carregando..."]);
        assert!(sink.options[0].disabled);
    }

    #[test]
    fn successful_load_populates_selector() {
        let mut session = session();
        let mut sink = OptionBuffer::default();
        let ticket = session.begin_load(&mut sink);
        let status = session.complete_load(ticket, Ok(SCENARIO.into()), &mut sink);

        assert_eq!(
            status,
            LoadStatus::Ready {
                records: 3,
                entities: 2
            }
        );
        assert_eq!(labels(&sink), vec!["Selecione...", "Capão do Leão", "Pelotas"]);
        assert_eq!(session.state().name(), "ready");
    }

    #[test]
    fn fetch_failure_shows_error_entry() {
        let mut session = session();
        let mut sink = OptionBuffer::default();
        let ticket = session.begin_load(&mut sink);
        let status =
            session.complete_load(ticket, Err(LimitrofeError::fetch("HTTP 500")), &mut sink);

        match status {
            LoadStatus::Failed(failure) => assert_eq!(failure.kind, FailureKind::Fetch),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(labels(&sink), vec!["Erro ao carregar dados"]);
        assert!(sink.options[0].disabled);
    }

    #[test]
    fn missing_column_fails_the_load() {
        let mut session = session();
        let mut sink = OptionBuffer::default();
        let ticket = session.begin_load(&mut sink);
        let text = "NM_MUN,OUTRO\nPelotas,Cerrito\nPelotas,Turuçu\n";
        let status = session.complete_load(ticket, Ok(text.into()), &mut sink);

        match status {
            LoadStatus::Failed(failure) => assert_eq!(failure.kind, FailureKind::MissingColumn),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(session.dataset().is_none());
        assert_eq!(sink.options.len(), 1);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut session = session();
        let mut sink = OptionBuffer::default();
        let first = session.begin_load(&mut sink);
        let second = session.begin_load(&mut sink);

        let late = session.complete_load(first, Ok(SCENARIO.into()), &mut sink);
        assert_eq!(late, LoadStatus::Stale);
        assert!(matches!(session.state(), LoadState::Loading));
        assert_eq!(labels(&sink), vec!["Carregando..."]);

        let current = session.complete_load(second, Ok("NM_MUN,NM_LIM\nA,B\n".into()), &mut sink);
        assert!(matches!(current, LoadStatus::Ready { entities: 1, .. }));

        // A completion for the first ticket arriving even later changes nothing.
        let later = session.complete_load(first, Err(LimitrofeError::fetch("x")), &mut sink);
        assert_eq!(later, LoadStatus::Stale);
        assert_eq!(session.state().name(), "ready");
    }

    #[test]
    fn reload_hides_old_dataset() {
        let mut session = session();
        let mut sink = OptionBuffer::default();
        let ticket = session.begin_load(&mut sink);
        session.complete_load(ticket, Ok(SCENARIO.into()), &mut sink);
        assert!(session.dataset().is_some());

        session.begin_load(&mut sink);
        assert!(session.dataset().is_none());
        assert!(matches!(
            session.select("Pelotas"),
            ResultView::NoData { .. }
        ));
    }

    #[test]
    fn select_maps_query_outcomes() {
        let mut session = session();
        let mut sink = OptionBuffer::default();
        let ticket = session.begin_load(&mut sink);
        session.complete_load(ticket, Ok(SCENARIO.into()), &mut sink);

        assert_eq!(
            session.select("Pelotas").lines(),
            vec!["Arroio Grande", "Capão do Leão"]
        );
        assert!(matches!(
            session.select(""),
            ResultView::NothingSelected { .. }
        ));
        assert!(matches!(
            session.select("Arroio Grande"),
            ResultView::NoData { .. }
        ));
        assert_eq!(session.select("Pelotas"), session.select("Pelotas"));
    }

    #[tokio::test]
    async fn load_from_fixture_file() {
        let mut session = session();
        let mut sink = OptionBuffer::default();
        let source = Source::parse("../../../fixtures/csv/rs_excerpt.csv").unwrap();
        let status = session
            .load(&source, &FetchOptions::default(), &mut sink, &SilentProgress)
            .await;

        assert_eq!(
            status,
            LoadStatus::Ready {
                records: 15,
                entities: 6
            }
        );
        assert_eq!(sink.options.len(), 7);
    }

    #[tokio::test]
    async fn load_missing_file_fails() {
        let mut session = session();
        let mut sink = OptionBuffer::default();
        let source = Source::File("../../../fixtures/csv/nope.csv".into());
        let status = session
            .load(&source, &FetchOptions::default(), &mut sink, &SilentProgress)
            .await;

        assert!(matches!(status, LoadStatus::Failed(LoadFailure { kind: FailureKind::Fetch, .. })));
        assert_eq!(session.state().name(), "failed");
    }

    #[test]
    fn session_from_config_rejects_bad_settings() {
        let mut config = LoadConfig::from(&limitrofe_shared::AppConfig::default());
        config.location = String::new();
        assert!(session_from_config(&config, DisplayConfig::default()).is_err());
    }
}
