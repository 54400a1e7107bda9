use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::{
    domain::{format_vector, SortAlgorithm},
    protocol::DisplayResult,
};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    dispatcher::SortDispatcher,
    error::{ClientError, InputError, Operation},
    vector_source::VectorSource,
    SortingService, VectorFile,
};

pub const DEFAULT_RANDOM_COUNT: i64 = 10;
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading(Operation),
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationState {
    pub vector_text: String,
    pub algorithm: SortAlgorithm,
    pub random_count: i64,
    pub selected_file: Option<PathBuf>,
    pub result: Option<DisplayResult>,
    pub in_flight: Option<Operation>,
    pub error: Option<ClientError>,
}

impl Default for OrchestrationState {
    fn default() -> Self {
        Self {
            vector_text: String::new(),
            algorithm: SortAlgorithm::default(),
            random_count: DEFAULT_RANDOM_COUNT,
            selected_file: None,
            result: None,
            in_flight: None,
            error: None,
        }
    }
}

impl OrchestrationState {
    pub fn phase(&self) -> Phase {
        if let Some(operation) = self.in_flight {
            Phase::Loading(operation)
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.result.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// User-facing error text; empty when the last action succeeded.
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub enum WorkbenchEvent {
    LoadingStarted(Operation),
    ResultReady(DisplayResult),
    StateChanged(OrchestrationState),
}

/// Single owner of the orchestration state. Remote transitions take an
/// in-flight lock; a second trigger is rejected until the first settles.
///
/// The state lock is never held across an await, so it is a plain std mutex.
pub struct SortWorkbench {
    vector_source: VectorSource,
    dispatcher: SortDispatcher,
    state: Arc<Mutex<OrchestrationState>>,
    events: broadcast::Sender<WorkbenchEvent>,
}

/// Releases the in-flight slot if a transition is dropped before it settles,
/// e.g. when the caller times out or aborts the task awaiting it.
struct InFlight {
    state: Arc<Mutex<OrchestrationState>>,
    events: broadcast::Sender<WorkbenchEvent>,
    operation: Operation,
    settled: bool,
}

impl InFlight {
    fn settle(mut self, state: &mut OrchestrationState) {
        state.in_flight = None;
        self.settled = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = lock_state(&self.state);
        if state.in_flight == Some(self.operation) {
            state.in_flight = None;
            warn!(operation = %self.operation, "operation abandoned before the service replied");
            let _ = self.events.send(WorkbenchEvent::StateChanged(state.clone()));
        }
    }
}

fn lock_state(state: &Mutex<OrchestrationState>) -> MutexGuard<'_, OrchestrationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SortWorkbench {
    pub fn new(service: Arc<dyn SortingService>) -> Arc<Self> {
        Self::with_state(service, OrchestrationState::default())
    }

    pub fn with_state(
        service: Arc<dyn SortingService>,
        initial: OrchestrationState,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            vector_source: VectorSource::new(Arc::clone(&service)),
            dispatcher: SortDispatcher::new(service),
            state: Arc::new(Mutex::new(OrchestrationState {
                in_flight: None,
                ..initial
            })),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WorkbenchEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> OrchestrationState {
        self.lock().clone()
    }

    pub async fn select_algorithm(&self, algorithm: SortAlgorithm) {
        self.update(|state| state.algorithm = algorithm).await;
    }

    pub async fn set_random_count(&self, count: i64) {
        self.update(|state| state.random_count = count).await;
    }

    pub async fn set_vector_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|state| state.vector_text = text).await;
    }

    pub async fn select_file(&self, path: Option<PathBuf>) {
        self.update(|state| state.selected_file = path).await;
    }

    pub async fn load_from_file(&self) -> Result<(), ClientError> {
        let operation = Operation::LoadFile;
        let (in_flight, path) = {
            let mut guard = self.lock();
            self.begin(&mut guard, operation)?;
            let Some(path) = guard.selected_file.clone() else {
                return Err(self.fail_locally(&mut guard, InputError::NoFileSelected.into()));
            };
            (self.enter_loading(&mut guard, operation), path)
        };

        let outcome = match VectorFile::read(&path).await {
            Ok(file) => self.vector_source.load_from_file(file).await,
            Err(err) => Err(err.into()),
        };
        self.finish_vector_load(in_flight, outcome)
    }

    pub async fn generate_random(&self) -> Result<(), ClientError> {
        let operation = Operation::GenerateRandom;
        let (in_flight, count) = {
            let mut guard = self.lock();
            self.begin(&mut guard, operation)?;
            (self.enter_loading(&mut guard, operation), guard.random_count)
        };

        let outcome = self.vector_source.generate_random(count).await;
        self.finish_vector_load(in_flight, outcome)
    }

    pub async fn sort(&self) -> Result<DisplayResult, ClientError> {
        let (in_flight, prepared) = {
            let mut guard = self.lock();
            let operation = Operation::Sort(guard.algorithm);
            self.begin(&mut guard, operation)?;
            let prepared = match SortDispatcher::prepare(&guard.vector_text, guard.algorithm) {
                Ok(prepared) => prepared,
                Err(err) => return Err(self.fail_locally(&mut guard, err.into())),
            };
            (self.enter_loading(&mut guard, operation), prepared)
        };

        let outcome = self.dispatcher.dispatch(prepared).await;

        let mut guard = self.lock();
        in_flight.settle(&mut guard);
        match outcome {
            Ok(result) => {
                guard.vector_text = format_vector(result.sorted_vector());
                guard.result = Some(result.clone());
                self.emit(WorkbenchEvent::ResultReady(result.clone()));
                self.emit(WorkbenchEvent::StateChanged(guard.clone()));
                Ok(result)
            }
            Err(err) => Err(self.record_failure(&mut guard, err)),
        }
    }

    /// Test-and-set entry shared by every remote transition.
    fn begin(
        &self,
        state: &mut OrchestrationState,
        requested: Operation,
    ) -> Result<(), ClientError> {
        if let Some(in_flight) = state.in_flight {
            warn!(%requested, %in_flight, "rejecting overlapping operation");
            return Err(ClientError::Busy {
                requested,
                in_flight,
            });
        }
        state.error = None;
        Ok(())
    }

    fn enter_loading(&self, state: &mut OrchestrationState, operation: Operation) -> InFlight {
        state.in_flight = Some(operation);
        debug!(%operation, "workbench loading");
        self.emit(WorkbenchEvent::LoadingStarted(operation));
        self.emit(WorkbenchEvent::StateChanged(state.clone()));
        InFlight {
            state: Arc::clone(&self.state),
            events: self.events.clone(),
            operation,
            settled: false,
        }
    }

    fn fail_locally(&self, state: &mut OrchestrationState, err: ClientError) -> ClientError {
        debug!("rejected before request: {err}");
        self.record_failure(state, err)
    }

    fn record_failure(&self, state: &mut OrchestrationState, err: ClientError) -> ClientError {
        state.error = Some(err.clone());
        self.emit(WorkbenchEvent::StateChanged(state.clone()));
        err
    }

    fn finish_vector_load(
        &self,
        in_flight: InFlight,
        outcome: Result<Vec<i64>, ClientError>,
    ) -> Result<(), ClientError> {
        let operation = in_flight.operation;
        let mut guard = self.lock();
        in_flight.settle(&mut guard);
        match outcome {
            Ok(values) => {
                debug!(%operation, len = values.len(), "replacing working vector");
                guard.vector_text = format_vector(&values);
                guard.result = None;
                self.emit(WorkbenchEvent::StateChanged(guard.clone()));
                Ok(())
            }
            Err(err) => Err(self.record_failure(&mut guard, err)),
        }
    }

    async fn update(&self, apply: impl FnOnce(&mut OrchestrationState)) {
        let mut guard = self.lock();
        apply(&mut guard);
        self.emit(WorkbenchEvent::StateChanged(guard.clone()));
    }

    fn lock(&self) -> MutexGuard<'_, OrchestrationState> {
        lock_state(&self.state)
    }

    fn emit(&self, event: WorkbenchEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/workbench_tests.rs"]
mod tests;
