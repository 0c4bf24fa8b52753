use crate::actors::analysis_api::HttpAnalysisApi;
use crate::actors::messages::{Key, StorefrontMessage};
use crate::actors::storefront_api::HttpStorefrontApi;
use crate::actors::traits::{AnalysisBackend, InputControl, SearchBackend};
use crate::analysis::AnalysisModal;
use crate::config::SearchConfig;
use crate::error::AppError;
use crate::models::{Destination, DestinationsResponse, ItineraryRequest, ALL_CATEGORY};
use crate::query::{sanitize, QueryClass, QueryClassifier};
use crate::search::{
    AutocompleteController, DispatchState, InactivityPrompter, QueryChange, StorefrontView,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};
use uuid::Uuid;

const MAILBOX_CAPACITY: usize = 64;
const CONTACT_REPLY_TIMEOUT: Duration = Duration::from_secs(60);

/// A handle to the storefront dispatcher.
///
/// This is the entry point for every user action on the storefront. Each
/// method enqueues a message for the dispatcher task, which owns all state
/// and timers; the resulting view is published on a `watch` channel.
#[derive(Clone)]
pub struct StorefrontHandle {
    sender: mpsc::Sender<StorefrontMessage>,
    view: watch::Receiver<StorefrontView>,
    session: Uuid,
}

impl StorefrontHandle {
    /// Creates a dispatcher talking to the HTTP services named in `config`.
    pub fn from_config(config: &SearchConfig, input: Arc<dyn InputControl>) -> Result<Self, AppError> {
        let search = Arc::new(HttpStorefrontApi::new(config)?);
        let analysis = Arc::new(HttpAnalysisApi::new(config)?);
        Ok(Self::new(config, search, analysis, input))
    }

    /// Creates a dispatcher over the given backends and spawns it on the
    /// current Tokio runtime. The full destination list is requested at once.
    pub fn new<S, A>(
        config: &SearchConfig,
        search: Arc<S>,
        analysis: Arc<A>,
        input: Arc<dyn InputControl>,
    ) -> Self
    where
        S: SearchBackend,
        A: AnalysisBackend,
    {
        let (sender, receiver) = mpsc::channel(MAILBOX_CAPACITY);
        let (view_tx, view_rx) = watch::channel(StorefrontView::default());
        let session = Uuid::new_v4();

        let runner = DispatcherRunner {
            receiver,
            mailbox: sender.downgrade(),
            view_tx,
            search,
            analysis,
            classifier: QueryClassifier::new(),
            autocomplete: AutocompleteController::new(config.debounce, config.autocomplete_min_chars),
            prompter: InactivityPrompter::new(config.prompt_delay, config.prompt_min_chars, input),
            query: String::new(),
            focused: false,
            state: DispatchState::Idle,
            loading: false,
            destinations: Vec::new(),
            selected_category: ALL_CATEGORY.to_string(),
            modal: None,
            search_seq: 0,
            destinations_seq: 0,
            analysis_seq: 0,
        };
        let span = info_span!("storefront", session = %session);
        tokio::spawn(runner.run().instrument(span));

        Self {
            sender,
            view: view_rx,
            session,
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    async fn send(&self, msg: StorefrontMessage) -> Result<(), AppError> {
        self.sender.send(msg).await?;
        Ok(())
    }

    /// The search box text changed. The value is sanitized before it is stored.
    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn edit_query(&self, raw: &str) -> Result<(), AppError> {
        self.send(StorefrontMessage::QueryEdited {
            raw: raw.to_string(),
        })
        .await
    }

    /// Explicit submit (search button).
    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn submit(&self) -> Result<(), AppError> {
        self.send(StorefrontMessage::Submit).await
    }

    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn key_pressed(&self, key: Key) -> Result<(), AppError> {
        self.send(StorefrontMessage::KeyPressed(key)).await
    }

    /// Click on the `index`-th entry of the suggestion dropdown.
    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn select_suggestion(&self, index: usize) -> Result<(), AppError> {
        self.send(StorefrontMessage::SuggestionSelected { index }).await
    }

    pub async fn focus(&self) -> Result<(), AppError> {
        self.send(StorefrontMessage::InputFocused).await
    }

    pub async fn blur(&self) -> Result<(), AppError> {
        self.send(StorefrontMessage::InputBlurred).await
    }

    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn select_category(&self, category: &str) -> Result<(), AppError> {
        self.send(StorefrontMessage::CategorySelected {
            category: category.to_string(),
        })
        .await
    }

    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn prompt_search_now(&self) -> Result<(), AppError> {
        self.send(StorefrontMessage::PromptSearchNow).await
    }

    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn prompt_add_more(&self) -> Result<(), AppError> {
        self.send(StorefrontMessage::PromptAddMore).await
    }

    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn close_analysis(&self) -> Result<(), AppError> {
        self.send(StorefrontMessage::CloseAnalysis).await
    }

    /// Selects an option (or free text for "other") for an ambiguous
    /// component; the itinerary is regenerated from the full selection map.
    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn choose_option(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.send(StorefrontMessage::OptionChosen {
            key: key.to_string(),
            value: value.to_string(),
        })
        .await
    }

    /// Submits the contact form of a zero-result analysis.
    ///
    /// # Returns
    ///
    /// The reference id once the service accepted the details. A missing or
    /// malformed email fails with `AppError::Validation` before any request is
    /// made; a rejected submission fails with `AppError::Api` carrying the
    /// service's message, and the form stays open.
    #[instrument(skip(self, phone), fields(session = %self.session))]
    pub async fn submit_contact(&self, email: &str, phone: Option<&str>) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        self.send(StorefrontMessage::SubmitContact {
            email: email.to_string(),
            phone: phone.map(str::to_string),
            responder: send,
        })
        .await?;
        timeout(CONTACT_REPLY_TIMEOUT, recv).await??
    }

    /// The current view, after every previously sent action has been applied.
    pub async fn snapshot(&self) -> Result<StorefrontView, AppError> {
        let (send, recv) = oneshot::channel();
        self.send(StorefrontMessage::Snapshot { responder: send })
            .await?;
        Ok(recv.await?)
    }

    /// A receiver notified on every view change.
    pub fn subscribe(&self) -> watch::Receiver<StorefrontView> {
        self.view.clone()
    }

    /// Stops the dispatcher; pending timers are released with it.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.send(StorefrontMessage::Shutdown).await
    }
}

// --- Actor Runner ---
struct DispatcherRunner<S, A>
where
    S: SearchBackend,
    A: AnalysisBackend,
{
    receiver: mpsc::Receiver<StorefrontMessage>,
    /// Weak, so the runner stops once every handle is gone.
    mailbox: mpsc::WeakSender<StorefrontMessage>,
    view_tx: watch::Sender<StorefrontView>,
    search: Arc<S>,
    analysis: Arc<A>,
    classifier: QueryClassifier,
    autocomplete: AutocompleteController,
    prompter: InactivityPrompter,
    query: String,
    focused: bool,
    state: DispatchState,
    loading: bool,
    destinations: Vec<Destination>,
    selected_category: String,
    modal: Option<AnalysisModal>,
    search_seq: u64,
    destinations_seq: u64,
    analysis_seq: u64,
}

impl<S, A> DispatcherRunner<S, A>
where
    S: SearchBackend,
    A: AnalysisBackend,
{
    async fn run(mut self) {
        info!("Storefront dispatcher started");
        self.reload_destinations();
        self.publish();

        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, StorefrontMessage::Shutdown) {
                break;
            }
            self.handle_message(msg);
            self.publish();
        }
        info!("Storefront dispatcher stopped");
    }

    fn handle_message(&mut self, msg: StorefrontMessage) {
        match msg {
            StorefrontMessage::QueryEdited { raw } => self.edit_query(&raw),
            StorefrontMessage::Submit => self.submit(),
            StorefrontMessage::KeyPressed(Key::Enter) => self.submit(),
            StorefrontMessage::KeyPressed(Key::Escape) => {
                self.autocomplete.hide();
                self.refresh_browse_state();
            }
            StorefrontMessage::KeyPressed(Key::Other) => {}
            StorefrontMessage::SuggestionSelected { index } => self.select_suggestion(index),
            StorefrontMessage::InputFocused => self.focused = true,
            StorefrontMessage::InputBlurred => {
                self.focused = false;
                self.autocomplete.discard();
                self.refresh_browse_state();
            }
            StorefrontMessage::CategorySelected { category } => self.select_category(category),
            StorefrontMessage::PromptSearchNow => {
                if self.prompter.search_now() {
                    self.submit();
                }
            }
            StorefrontMessage::PromptAddMore => {
                self.prompter.add_more(&self.query);
            }
            StorefrontMessage::CloseAnalysis => self.close_analysis(),
            StorefrontMessage::OptionChosen { key, value } => self.choose_option(&key, &value),
            StorefrontMessage::SubmitContact {
                email,
                phone,
                responder,
            } => self.submit_contact(&email, phone.as_deref(), responder),
            StorefrontMessage::Snapshot { responder } => {
                let _ = responder.send(self.view());
            }
            StorefrontMessage::Shutdown => {}

            StorefrontMessage::DebounceElapsed { generation, query } => {
                if let Some(seq) = self.autocomplete.on_debounce_elapsed(generation) {
                    let search = Arc::clone(&self.search);
                    self.spawn_fetch(async move {
                        StorefrontMessage::SuggestionsLoaded {
                            seq,
                            result: search.autocomplete(query).await,
                        }
                    });
                }
            }
            StorefrontMessage::PromptElapsed { generation } => {
                self.prompter.on_elapsed(generation);
            }
            StorefrontMessage::SuggestionsLoaded { seq, result } => {
                if self.autocomplete.apply(seq, result) {
                    self.refresh_browse_state();
                }
            }
            StorefrontMessage::SearchCompleted { seq, result } => {
                if seq == self.search_seq {
                    self.finish_search(result);
                } else {
                    debug!(seq, latest = self.search_seq, "stale search response dropped");
                }
            }
            StorefrontMessage::DestinationsLoaded { seq, result } => {
                if seq == self.destinations_seq {
                    self.destinations = destinations_or_empty(result, "Error fetching destinations");
                } else {
                    debug!(seq, latest = self.destinations_seq, "stale destination list dropped");
                }
            }
            StorefrontMessage::AnalysisLoaded { seq, result } => {
                if seq != self.analysis_seq {
                    debug!(seq, latest = self.analysis_seq, "stale analysis dropped");
                    return;
                }
                let request = self
                    .modal
                    .as_mut()
                    .and_then(|modal| modal.apply_analysis(result));
                if let Some((itinerary_seq, request)) = request {
                    self.generate_itinerary(itinerary_seq, request);
                }
            }
            StorefrontMessage::ItineraryLoaded {
                analysis_seq,
                seq,
                result,
            } => {
                if analysis_seq != self.analysis_seq {
                    debug!(analysis_seq, "itinerary for a closed analysis dropped");
                    return;
                }
                if let Some(modal) = self.modal.as_mut() {
                    modal.apply_itinerary(seq, result);
                }
            }
            StorefrontMessage::ContactCompleted {
                analysis_seq,
                result,
                responder,
            } => {
                let reply = match self.modal.as_mut() {
                    Some(modal) if analysis_seq == self.analysis_seq => modal.apply_contact(result),
                    _ => Err(AppError::State("the analysis was closed".to_string())),
                };
                let _ = responder.send(reply);
            }
        }
    }

    fn edit_query(&mut self, raw: &str) {
        let query = sanitize(raw);
        if query.len() != raw.len() {
            debug!(removed = raw.len() - query.len(), "disallowed characters stripped from query");
        }
        self.query = query;

        let Some(mailbox) = self.mailbox.upgrade() else {
            return;
        };
        let change = self.autocomplete.on_query_change(&self.query, mailbox.clone(), |generation, query| {
            StorefrontMessage::DebounceElapsed { generation, query }
        });
        if change == QueryChange::Cleared && self.state == DispatchState::ShowingSimpleResults {
            self.state = DispatchState::Idle;
        }
        self.prompter
            .on_query_change(&self.query, mailbox, |generation| StorefrontMessage::PromptElapsed {
                generation,
            });
        self.refresh_browse_state();
    }

    /// Enter, the search button, and "search now" all land here.
    fn submit(&mut self) {
        self.autocomplete.discard();
        self.prompter.reset();
        self.refresh_browse_state();

        if self.query.trim().is_empty() {
            debug!("empty query, nothing to search");
            return;
        }
        let query = self.query.clone();
        self.dispatch(query);
    }

    fn select_suggestion(&mut self, index: usize) {
        if !self.autocomplete.is_visible() {
            debug!(index, "suggestion click ignored, dropdown hidden");
            return;
        }
        let Some(suggestion) = self.autocomplete.suggestion(index).cloned() else {
            warn!(index, "suggestion index out of range");
            return;
        };
        info!(text = %suggestion.text, "Suggestion selected");
        self.query = sanitize(&suggestion.text);
        self.submit();
    }

    /// Classifies the query afresh and routes it.
    fn dispatch(&mut self, query: String) {
        self.state = DispatchState::Searching;
        self.loading = true;
        // Whatever simple search was in flight is superseded either way.
        self.search_seq += 1;

        let class = self.classifier.classify(&query);
        info!(
            %query,
            %class,
            rules = ?self.classifier.matched_rules(&query),
            "Dispatching search"
        );

        match class {
            QueryClass::Complex => {
                self.loading = false;
                self.state = DispatchState::ShowingAnalysis;
                self.open_analysis(query);
            }
            QueryClass::Simple => {
                let seq = self.search_seq;
                let search = Arc::clone(&self.search);
                self.spawn_fetch(async move {
                    StorefrontMessage::SearchCompleted {
                        seq,
                        result: search.search_destinations(query).await,
                    }
                });
            }
        }
    }

    /// Any outcome of a simple search ends in the results panel; failures
    /// show as an empty list.
    fn finish_search(&mut self, result: Result<DestinationsResponse, AppError>) {
        self.loading = false;
        // A listing still in flight must not replace the results.
        self.destinations_seq += 1;
        self.destinations = destinations_or_empty(result, "Search error");
        if self.modal.take().is_some() {
            self.analysis_seq += 1;
        }
        self.state = DispatchState::ShowingSimpleResults;
        info!(results = self.destinations.len(), "Showing simple results");
    }

    fn select_category(&mut self, category: String) {
        info!(%category, "Category selected");
        if category == ALL_CATEGORY {
            self.reload_destinations();
        } else {
            // A pending full reload would overwrite the filter.
            self.destinations_seq += 1;
            let needle = category.to_lowercase();
            self.destinations
                .retain(|d| d.kind.to_lowercase().contains(&needle));
        }
        self.selected_category = category;
    }

    fn reload_destinations(&mut self) {
        self.destinations_seq += 1;
        let seq = self.destinations_seq;
        let search = Arc::clone(&self.search);
        self.spawn_fetch(async move {
            StorefrontMessage::DestinationsLoaded {
                seq,
                result: search.destinations().await,
            }
        });
    }

    fn open_analysis(&mut self, query: String) {
        self.analysis_seq += 1;
        let seq = self.analysis_seq;
        self.modal = Some(AnalysisModal::open(query.clone()));

        let analysis = Arc::clone(&self.analysis);
        self.spawn_fetch(async move {
            StorefrontMessage::AnalysisLoaded {
                seq,
                result: analysis.analyze(query).await,
            }
        });
    }

    fn close_analysis(&mut self) {
        if self.modal.take().is_none() {
            return;
        }
        self.analysis_seq += 1;
        if self.state == DispatchState::ShowingAnalysis {
            self.state = DispatchState::Idle;
        }
        self.refresh_browse_state();
        info!("Analysis closed");
    }

    fn choose_option(&mut self, key: &str, value: &str) {
        let Some(modal) = self.modal.as_mut() else {
            warn!(key, "option chosen with no analysis open");
            return;
        };
        match modal.choose(key, value) {
            Ok((seq, request)) => self.generate_itinerary(seq, request),
            Err(e) => warn!("Selection rejected: {}", e),
        }
    }

    fn generate_itinerary(&self, seq: u64, request: ItineraryRequest) {
        let analysis_seq = self.analysis_seq;
        let analysis = Arc::clone(&self.analysis);
        self.spawn_fetch(async move {
            StorefrontMessage::ItineraryLoaded {
                analysis_seq,
                seq,
                result: analysis.generate_itinerary(request).await,
            }
        });
    }

    fn submit_contact(
        &mut self,
        email: &str,
        phone: Option<&str>,
        responder: oneshot::Sender<Result<String, AppError>>,
    ) {
        let request = match self.modal.as_ref() {
            Some(modal) => modal.contact_request(email, phone),
            None => Err(AppError::State("no analysis is open".to_string())),
        };
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                let _ = responder.send(Err(e));
                return;
            }
        };

        let analysis_seq = self.analysis_seq;
        let analysis = Arc::clone(&self.analysis);
        self.spawn_fetch(async move {
            StorefrontMessage::ContactCompleted {
                analysis_seq,
                result: analysis.submit_contact(request).await,
                responder,
            }
        });
    }

    /// Runs `fetch` in its own task and posts its completion back to the
    /// mailbox. In-flight fetches are never aborted; stale completions are
    /// recognised by their sequence number.
    fn spawn_fetch<F>(&self, fetch: F)
    where
        F: Future<Output = StorefrontMessage> + Send + 'static,
    {
        let Some(mailbox) = self.mailbox.upgrade() else {
            debug!("no handle left, fetch skipped");
            return;
        };
        tokio::spawn(
            async move {
                let msg = fetch.await;
                let _ = mailbox.send(msg).await;
            }
            .in_current_span(),
        );
    }

    /// Idle and Suggesting follow the dropdown; other states are left alone.
    fn refresh_browse_state(&mut self) {
        if self.state.is_browsing() {
            self.state = if self.autocomplete.is_visible() {
                DispatchState::Suggesting
            } else {
                DispatchState::Idle
            };
        }
    }

    fn view(&self) -> StorefrontView {
        StorefrontView {
            query: self.query.clone(),
            focused: self.focused,
            state: self.state,
            loading: self.loading,
            suggestions: self.autocomplete.suggestions().to_vec(),
            show_suggestions: self.autocomplete.is_visible(),
            destinations: self.destinations.clone(),
            selected_category: self.selected_category.clone(),
            show_prompt: self.prompter.is_visible(),
            analysis: self.modal.clone(),
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.view());
    }
}

fn destinations_or_empty(result: Result<DestinationsResponse, AppError>, context: &str) -> Vec<Destination> {
    match result {
        Ok(response) if response.success => response.data,
        Ok(_) => {
            warn!("{}: service reported failure", context);
            Vec::new()
        }
        Err(e) => {
            error!("{}: {}", context, e);
            Vec::new()
        }
    }
}
