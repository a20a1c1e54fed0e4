//! Checkout step orchestration.
//!
//! A checkout is an ordered list of steps (address, shipping method, payment,
//! …). Each step is an injected [`CheckoutStep`] that knows how to persist
//! its own form. [`CheckoutOrchestrator`] owns the step states, serializes
//! saves and publishes [`CheckoutEvent`]s to subscribers.

mod orchestrator;

pub use orchestrator::CheckoutOrchestrator;
pub use sf_api_types::{CheckoutLayout, StepState};

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// One checkout step's data source.
#[async_trait]
pub trait CheckoutStep: Send + Sync {
    fn key(&self) -> &str;
    async fn save(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub layout: CheckoutLayout,
    /// Upper bound on save calls per proceed, counting retries caused by edits
    /// made while a save was in flight.
    pub max_save_attempts: u32,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            layout: CheckoutLayout::Accordion,
            max_save_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSnapshot {
    pub key: String,
    pub state: StepState,
    pub ready: bool,
    pub dirty: bool,
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    StepStateChanged {
        key: String,
        from: StepState,
        to: StepState,
    },
    SaveStarted {
        key: String,
    },
    SaveSucceeded {
        key: String,
    },
    SaveFailed {
        key: String,
        message: String,
    },
    /// Every step is saved; the order can be placed.
    CheckoutReady,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("checkout needs at least one step")]
    NoSteps,
    #[error("duplicate checkout step: {0}")]
    DuplicateStep(String),
    #[error("unknown checkout step: {0}")]
    UnknownStep(String),
    #[error("checkout step {key} is {state:?} and cannot be changed")]
    StepNotEditable { key: String, state: StepState },
    #[error("checkout step {0} is not ready")]
    StepNotReady(String),
    #[error("saving checkout step {key} failed")]
    SaveFailed {
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("checkout step {key} kept changing during {attempts} save attempts")]
    StaleSave { key: String, attempts: u32 },
}
