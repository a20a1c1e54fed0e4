//! Step state machine and save queue.
//!
//! Accordion: one step is in `Edit` at a time, later steps wait in `Future`,
//! finished steps show `Summary`. A step is `Disabled` while it saves.
//!
//! One-page: every step stays in `Edit`; a step saves as soon as it reports
//! ready, and the checkout is complete once every step is saved.
//!
//! Saves go through `save_queue`, a fair async mutex, so they run one at a
//! time in the order they were requested. A request that reaches the front of
//! the queue for a step that is already saved and unchanged is a no-op, so
//! repeated proceed signals coalesce into one save. The step table lives
//! behind a sync mutex that is never held across an await.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, broadcast};
use tracing::{debug, info, warn};

use crate::{
    CheckoutConfig, CheckoutError, CheckoutEvent, CheckoutLayout, CheckoutStep, StepSnapshot,
    StepState,
};

const EVENT_CAPACITY: usize = 64;

struct StepSlot {
    step: Arc<dyn CheckoutStep>,
    key: String,
    state: StepState,
    ready: bool,
    dirty: bool,
    saved: bool,
    /// Bumped on every edit; a save is stale if this moved while it ran.
    edits: u64,
}

struct Steps {
    slots: Vec<StepSlot>,
    ready_announced: bool,
}

impl Steps {
    fn index_of(&self, key: &str) -> Result<usize, CheckoutError> {
        self.slots
            .iter()
            .position(|slot| slot.key == key)
            .ok_or_else(|| CheckoutError::UnknownStep(key.to_owned()))
    }

    fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.saved && !slot.dirty)
    }
}

pub struct CheckoutOrchestrator {
    config: CheckoutConfig,
    steps: Mutex<Steps>,
    save_queue: AsyncMutex<()>,
    events: broadcast::Sender<CheckoutEvent>,
}

impl CheckoutOrchestrator {
    pub fn new(
        config: CheckoutConfig,
        steps: Vec<Arc<dyn CheckoutStep>>,
    ) -> Result<Self, CheckoutError> {
        if steps.is_empty() {
            return Err(CheckoutError::NoSteps);
        }

        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(steps.len());
        for (index, step) in steps.into_iter().enumerate() {
            let key = step.key().to_owned();
            if !seen.insert(key.clone()) {
                return Err(CheckoutError::DuplicateStep(key));
            }

            let state = match config.layout {
                CheckoutLayout::Accordion if index == 0 => StepState::Edit,
                CheckoutLayout::Accordion => StepState::Future,
                CheckoutLayout::OnePage => StepState::Edit,
            };

            slots.push(StepSlot {
                step,
                key,
                state,
                ready: false,
                dirty: false,
                saved: false,
                edits: 0,
            });
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            config: CheckoutConfig {
                max_save_attempts: config.max_save_attempts.max(1),
                ..config
            },
            steps: Mutex::new(Steps {
                slots,
                ready_announced: false,
            }),
            save_queue: AsyncMutex::new(()),
            events,
        })
    }

    pub fn layout(&self) -> CheckoutLayout {
        self.config.layout
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CheckoutEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> Vec<StepSnapshot> {
        self.lock().slots.iter().map(snapshot_of).collect()
    }

    pub fn step(&self, key: &str) -> Option<StepSnapshot> {
        self.lock()
            .slots
            .iter()
            .find(|slot| slot.key == key)
            .map(snapshot_of)
    }

    pub fn is_complete(&self) -> bool {
        self.lock().is_complete()
    }

    /// Record that a step's form changed since its last save.
    ///
    /// In accordion layout a step already in `Summary` re-opens and every
    /// later step goes back to `Future`. An edit that lands while the step is
    /// saving makes that save run again.
    pub fn mark_dirty(&self, key: &str) -> Result<(), CheckoutError> {
        let mut steps = self.lock();
        let index = steps.index_of(key)?;

        let slot = &mut steps.slots[index];
        slot.dirty = true;
        slot.saved = false;
        slot.edits += 1;
        let reopen =
            self.config.layout == CheckoutLayout::Accordion && slot.state == StepState::Summary;

        steps.ready_announced = false;
        if reopen {
            self.reopen(&mut steps, index);
        }

        debug!(step = key, "checkout step marked dirty");
        Ok(())
    }

    /// Re-open a summarized step for editing (the accordion "Change" action).
    pub fn edit(&self, key: &str) -> Result<(), CheckoutError> {
        let mut steps = self.lock();
        let index = steps.index_of(key)?;

        match steps.slots[index].state {
            StepState::Summary => {
                self.reopen(&mut steps, index);
                Ok(())
            }
            StepState::Edit => Ok(()),
            state => Err(CheckoutError::StepNotEditable {
                key: key.to_owned(),
                state,
            }),
        }
    }

    /// Update a step's readiness. In one-page layout a step that becomes ready
    /// with unsaved changes is proceeded immediately.
    pub async fn set_ready(&self, key: &str, ready: bool) -> Result<(), CheckoutError> {
        let should_proceed = {
            let mut steps = self.lock();
            let index = steps.index_of(key)?;
            let slot = &mut steps.slots[index];
            slot.ready = ready;
            ready && self.config.layout == CheckoutLayout::OnePage && !slot.saved
        };

        if should_proceed {
            self.proceed(key).await
        } else {
            Ok(())
        }
    }

    /// Save a step and advance the checkout.
    ///
    /// Waits for earlier requests to finish first. A step that is already
    /// saved with no edit since is left alone. On failure the step goes back
    /// to `Edit` (and, in accordion layout, the next step to `Future`).
    pub async fn proceed(&self, key: &str) -> Result<(), CheckoutError> {
        let _turn = self.save_queue.lock().await;
        let Some((index, step)) = self.begin_save(key)? else {
            return Ok(());
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            let edits = self.edits_of(index);

            if let Err(source) = step.save().await {
                self.fail_save(index, &format!("{source:#}"));
                return Err(CheckoutError::SaveFailed {
                    key: key.to_owned(),
                    source,
                });
            }

            if self.edits_of(index) == edits {
                self.finish_save(index);
                return Ok(());
            }

            if attempts >= self.config.max_save_attempts {
                self.fail_save(index, "step changed while saving");
                return Err(CheckoutError::StaleSave {
                    key: key.to_owned(),
                    attempts,
                });
            }

            debug!(step = key, attempts, "checkout step changed during save; saving again");
        }
    }

    /// `None` when an earlier request already saved the step.
    fn begin_save(
        &self,
        key: &str,
    ) -> Result<Option<(usize, Arc<dyn CheckoutStep>)>, CheckoutError> {
        let mut steps = self.lock();
        let index = steps.index_of(key)?;

        let slot = &mut steps.slots[index];
        // Accordion keeps a saved step in `Summary` until it is re-opened,
        // which clears `saved`.
        if slot.saved && !slot.dirty {
            debug!(step = key, "checkout step already saved; request coalesced");
            return Ok(None);
        }
        if slot.state != StepState::Edit {
            return Err(CheckoutError::StepNotEditable {
                key: key.to_owned(),
                state: slot.state,
            });
        }
        if !slot.ready {
            return Err(CheckoutError::StepNotReady(key.to_owned()));
        }

        let step = Arc::clone(&slot.step);
        if self.config.layout == CheckoutLayout::Accordion {
            self.transition(slot, StepState::Disabled);
        }

        info!(step = key, "saving checkout step");
        self.emit(CheckoutEvent::SaveStarted {
            key: key.to_owned(),
        });
        Ok(Some((index, step)))
    }

    fn finish_save(&self, index: usize) {
        let mut steps = self.lock();
        let accordion = self.config.layout == CheckoutLayout::Accordion;

        let slot = &mut steps.slots[index];
        let key = slot.key.clone();
        // A step re-opened by an earlier step's edit while it saved stays where
        // the re-open put it.
        let superseded = accordion && slot.state != StepState::Disabled;
        slot.dirty = false;
        slot.saved = !superseded;
        if accordion && !superseded {
            self.transition(slot, StepState::Summary);
            if let Some(next) = steps.slots.get_mut(index + 1) {
                if next.state == StepState::Future {
                    self.transition(next, StepState::Edit);
                }
            }
        }

        info!(step = %key, superseded, "checkout step saved");
        self.emit(CheckoutEvent::SaveSucceeded { key });

        if steps.is_complete() && !steps.ready_announced {
            steps.ready_announced = true;
            info!("checkout ready");
            self.emit(CheckoutEvent::CheckoutReady);
        }
    }

    fn fail_save(&self, index: usize, message: &str) {
        let mut steps = self.lock();
        let accordion = self.config.layout == CheckoutLayout::Accordion;

        let slot = &mut steps.slots[index];
        let key = slot.key.clone();
        let was_saving = slot.state == StepState::Disabled;
        slot.saved = false;
        if was_saving {
            self.transition(slot, StepState::Edit);
            if let Some(next) = steps.slots.get_mut(index + 1) {
                self.transition(next, StepState::Future);
            }
        }

        warn!(step = %key, accordion, "checkout step save failed: {}", message);
        self.emit(CheckoutEvent::SaveFailed {
            key,
            message: message.to_owned(),
        });
    }

    fn reopen(&self, steps: &mut Steps, index: usize) {
        let slot = &mut steps.slots[index];
        slot.saved = false;
        self.transition(slot, StepState::Edit);

        for later in steps.slots.iter_mut().skip(index + 1) {
            later.saved = false;
            self.transition(later, StepState::Future);
        }
        steps.ready_announced = false;
    }

    fn transition(&self, slot: &mut StepSlot, to: StepState) {
        if slot.state == to {
            return;
        }
        let from = slot.state;
        slot.state = to;
        debug!(step = %slot.key, ?from, ?to, "checkout step state changed");
        self.emit(CheckoutEvent::StepStateChanged {
            key: slot.key.clone(),
            from,
            to,
        });
    }

    fn edits_of(&self, index: usize) -> u64 {
        self.lock().slots[index].edits
    }

    fn emit(&self, event: CheckoutEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    fn lock(&self) -> MutexGuard<'_, Steps> {
        self.steps.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn snapshot_of(slot: &StepSlot) -> StepSnapshot {
    StepSnapshot {
        key: slot.key.clone(),
        state: slot.state,
        ready: slot.ready,
        dirty: slot.dirty,
        saved: slot.saved,
    }
}
