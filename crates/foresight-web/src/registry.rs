//! The process-wide model registry: three named slots and the operations
//! the workflow performs on them. The registry itself is lock-free plain
//! data; [`crate::state::AppState`] owns it behind a single `RwLock`, and
//! nothing long-running (training, prediction) runs under that lock.
use foresight_models::{Model, ModelInterface, ModelKind, Report};

#[derive(Debug)]
pub struct ModelRegistry {
    /// The model serving predictions; its report is the "previous" side of
    /// the training comparison. Never empty after bootstrap.
    active: Model,
    /// The most recent training result, awaiting accept or discard.
    candidate: Option<Model>,
    /// The model displaced by the most recent swap, kept so a second swap
    /// restores the prior assignment.
    standby: Option<Model>,
}

impl ModelRegistry {
    pub fn new(active: Model) -> Self {
        ModelRegistry {
            active,
            candidate: None,
            standby: None,
        }
    }

    pub fn active_kind(&self) -> ModelKind {
        self.active.kind()
    }

    pub fn active_report(&self) -> Option<&Report> {
        self.active.report()
    }

    /// Clone of the active model, taken under the lock so predictions can
    /// run on it without holding the lock.
    pub fn clone_active(&self) -> Model {
        self.active.clone()
    }

    /// Start a training attempt: any unpromoted previous candidate is
    /// silently discarded.
    pub fn begin_attempt(&mut self) {
        if self.candidate.take().is_some() {
            log::info!("discarding unpromoted candidate from a previous attempt");
        }
    }

    /// Store the freshly trained candidate for review.
    pub fn install_candidate(&mut self, model: Model) {
        self.candidate = Some(model);
    }

    pub fn has_candidate(&self) -> bool {
        self.candidate.is_some()
    }

    pub fn candidate_report(&self) -> Option<&Report> {
        self.candidate.as_ref().and_then(|m| m.report())
    }

    /// Remove the candidate for promotion. The caller persists it and then
    /// either commits with [`ModelRegistry::promote`] or puts it back with
    /// [`ModelRegistry::restore_candidate`] when persistence fails.
    pub fn take_candidate(&mut self) -> Option<Model> {
        self.candidate.take()
    }

    pub fn restore_candidate(&mut self, model: Model) {
        self.candidate = Some(model);
    }

    /// Commit a promotion: the (persisted) candidate becomes active.
    pub fn promote(&mut self, candidate: Model) {
        self.active = candidate;
    }

    /// Drop the candidate; the active model is untouched.
    pub fn discard(&mut self) {
        self.candidate = None;
    }

    /// Make `kind` the active variant. A matching standby is reinstated;
    /// otherwise a fresh, untrained instance is constructed from the kind
    /// table. The displaced model becomes the standby, so activating the
    /// other kind twice restores the prior assignment. Never touches the
    /// candidate or durable storage.
    pub fn activate(&mut self, kind: ModelKind) {
        if self.active.kind() == kind {
            return;
        }
        let incoming = match self.standby.take() {
            Some(model) if model.kind() == kind => model,
            // First swap to this kind: bootstrap an untrained instance.
            // The displaced standby (if any) is dropped with it.
            _ => kind.construct(),
        };
        let outgoing = std::mem::replace(&mut self.active, incoming);
        log::info!(
            "model swapped: {} is now active, {} on standby",
            self.active.kind(),
            outgoing.kind()
        );
        self.standby = Some(outgoing);
    }

    /// Exchange the active and standby variants.
    pub fn swap(&mut self) {
        self.activate(self.active_kind().other());
    }
}
