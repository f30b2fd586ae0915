use std::sync::{Arc, Mutex, MutexGuard};

use segment_nn::train::train_digits;
use segment_nn::{Model, ModelFactory, Parameters, Result, TrainOptions, TrainingReport};

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-shot message shown at the top of the next rendered page.
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Success, text: text.into() }
    }
    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

/// The architecture, options and weights currently on display.
pub struct StudioState {
    /// Hidden-layer widths the model was built from.
    pub hidden: Vec<i64>,
    pub options: TrainOptions,
    pub model: Model,
    pub params: Parameters,
    pub report: TrainingReport,
    pub flash: Option<FlashMessage>,
}

impl StudioState {
    /// Builds the model and trains it once.
    pub fn trained(hidden: Vec<i64>, options: TrainOptions) -> Result<StudioState> {
        let model = ModelFactory::build(&hidden)?;
        let (params, report) = train_digits(&model, &options)?;
        Ok(StudioState {
            hidden,
            options,
            model,
            params,
            report,
            flash: None,
        })
    }

    /// Takes and returns the current flash message, clearing it.
    pub fn take_flash(&mut self) -> Option<FlashMessage> {
        self.flash.take()
    }
}

/// Shared handle to the studio state, passed to every handler.
pub type SharedState = Arc<Mutex<StudioState>>;

/// Locks the state, recovering it if a handler thread panicked while holding it.
pub fn lock(state: &SharedState) -> MutexGuard<'_, StudioState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
