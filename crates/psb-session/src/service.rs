//! Session Service - the state machine behind every host event
//!
//! ## Transitions
//!
//! ```text
//!                 open gesture + preconditions
//!   [NO SESSION] ─────────────────────────────→ [OPEN]
//!        ↑                                        │
//!        │  view closed (persist)                 │ click / drag (content-changing)
//!        │  integrity fault (no persist)          ├──→ schedule deferred persist
//!        │  shutdown (persist if reachable)       │ interact / held slot / swap / container move
//!        └────────────────────────────────────────┤──→ veto
//!                                                 │ drop of a container item
//!                                                 └──→ veto + forced close
//! ```
//!
//! Integrity faults are resolved inside the handler that detects them: the
//! session is removed, the view is closed and an error is logged. They never
//! escape as errors. Until the faulted view is actually gone the holder is
//! fenced and every event touching it is vetoed.

use crate::config::SessionConfig;
use crate::domain::{
    classify_click, classify_drag, click_moves_container, drag_moves_container, ActiveSession,
    ChangeClass, HolderId, IntegrityViolation, ItemStack, OpenOutcome, PersistOutcome,
    SessionId, SessionRegistry, SessionStatus, ShutdownReport, SourceSlot,
};
use crate::events::{
    ClickEvent, ClickType, DeferredTask, DragEvent, DropItemEvent, HeldSlotChangeEvent,
    InteractAction, InteractEvent, SwapHandsEvent, Verdict, ViewClosedEvent,
};
use crate::ports::{
    DeferredScheduler, HolderGateway, ItemTaxonomy, PortableContainerApi, ViewPresenter,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Portable container session service.
///
/// Owns the session registry. All methods take `&mut self`; the host drives
/// the service from a single event loop, which is what makes the persistence
/// steps atomic.
pub struct PortableContainerService<T, H, V, S>
where
    T: ItemTaxonomy,
    H: HolderGateway,
    V: ViewPresenter,
    S: DeferredScheduler,
{
    config: SessionConfig,
    registry: SessionRegistry,
    taxonomy: Arc<T>,
    holders: Arc<H>,
    presenter: Arc<V>,
    scheduler: Arc<S>,
}

impl<T, H, V, S> PortableContainerService<T, H, V, S>
where
    T: ItemTaxonomy,
    H: HolderGateway,
    V: ViewPresenter,
    S: DeferredScheduler,
{
    pub fn new(
        config: SessionConfig,
        taxonomy: Arc<T>,
        holders: Arc<H>,
        presenter: Arc<V>,
        scheduler: Arc<S>,
    ) -> Self {
        Self {
            config,
            registry: SessionRegistry::new(),
            taxonomy,
            holders,
            presenter,
            scheduler,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Runs the open protocol.
    ///
    /// Preconditions are checked in order and the first failure is returned
    /// without touching any state.
    pub fn try_open(&mut self, event: &InteractEvent) -> OpenOutcome {
        let holder = event.holder;

        if self.registry.contains(&holder) || self.registry.is_fenced(&holder) {
            return OpenOutcome::AlreadyActive;
        }
        if event.action != InteractAction::RightClickAir {
            return OpenOutcome::NotOpenGesture;
        }
        if !self
            .holders
            .has_permission(&holder, &self.config.open_permission)
        {
            return OpenOutcome::NotPermitted;
        }
        let Some(slot) = SourceSlot::from_equipment(event.hand) else {
            return OpenOutcome::NoHand;
        };
        let Some(item) = self
            .holders
            .hand_item(&holder, slot)
            .filter(|item| self.taxonomy.is_container(item))
        else {
            return OpenOutcome::NotContainer;
        };
        // Freshly crafted boxes carry no block state yet.
        let Some(state) = item.block_state() else {
            return OpenOutcome::NoMetadata;
        };
        let Some(contents) = state.contents() else {
            return OpenOutcome::NotContentCapable;
        };
        if !contents.fits(self.config.container_capacity) {
            return OpenOutcome::Overfilled;
        }

        let seed = contents.clone().normalized(self.config.container_capacity);
        let title = item
            .display_name()
            .unwrap_or(self.config.default_title.as_str());

        let Some(view) = self.presenter.open_view(&holder, seed, title) else {
            warn!("[psb] Could not present view to {}, closing", holder);
            self.presenter.close_view(&holder);
            return OpenOutcome::PresentationFailed;
        };

        match self.registry.begin(holder, slot, view) {
            Ok(session) => {
                info!(
                    "[psb] Opened session {} for {} from {} (title: {:?})",
                    session, holder, slot, title
                );
                OpenOutcome::Opened {
                    session,
                    slot,
                    view,
                }
            }
            Err(e) => {
                error!("[psb] {}; closing the view just opened", e);
                self.presenter.close_view(&holder);
                OpenOutcome::AlreadyActive
            }
        }
    }

    /// Re-reads the source slot and checks it still holds a content-capable
    /// container item.
    fn check_source_item(
        &self,
        holder: &HolderId,
        slot: SourceSlot,
    ) -> Result<ItemStack, IntegrityViolation> {
        let item = self
            .holders
            .hand_item(holder, slot)
            .filter(|item| self.taxonomy.is_container(item))
            .ok_or(IntegrityViolation::MissingContainerItem { slot })?;
        let state = item
            .block_state()
            .ok_or(IntegrityViolation::MissingMetadata { slot })?;
        if state.contents().is_none() {
            return Err(IntegrityViolation::NotContentCapable { slot });
        }
        Ok(item)
    }

    /// Terminates the holder's session after a broken invariant.
    ///
    /// Only the first detection acts; later ones find no session.
    fn raise_integrity_fault(&mut self, holder: &HolderId, violation: &IntegrityViolation) {
        let Some(session) = self.registry.fault(holder) else {
            return;
        };
        error!(
            "[psb] Integrity fault for {} (session {}): {}. Possible dupe bug! Session dropped without saving.",
            holder,
            session.id(),
            violation
        );
        self.presenter.close_view(holder);
    }

    /// Persistence protocol. `expected` restricts the pass to one session.
    fn persist_session(&mut self, holder: &HolderId, expected: Option<SessionId>) -> PersistOutcome {
        let Some(session) = self.registry.lookup(holder) else {
            return PersistOutcome::NoSession;
        };
        if expected.is_some_and(|id| id != session.id()) {
            debug!("[psb] Skipping persist for ended session of {}", holder);
            return PersistOutcome::NoSession;
        }
        let (slot, view) = (session.slot(), session.view());

        let mut item = match self.check_source_item(holder, slot) {
            Ok(item) => item,
            Err(violation) => {
                self.raise_integrity_fault(holder, &violation);
                return PersistOutcome::Faulted(violation);
            }
        };

        let Some(contents) = self.presenter.view_contents(view) else {
            let violation = IntegrityViolation::ViewUnavailable;
            self.raise_integrity_fault(holder, &violation);
            return PersistOutcome::Faulted(violation);
        };
        let contents = contents.normalized(self.config.container_capacity);
        let occupied = contents.occupied();

        match item.container_contents_mut() {
            Some(embedded) => *embedded = contents,
            None => {
                let violation = IntegrityViolation::NotContentCapable { slot };
                self.raise_integrity_fault(holder, &violation);
                return PersistOutcome::Faulted(violation);
            }
        }
        self.holders.set_hand_item(holder, slot, Some(item));

        debug!(
            "[psb] Persisted {} entries into {} of {}",
            occupied, slot, holder
        );
        PersistOutcome::Persisted { slot, occupied }
    }

    /// Re-validates the source item after a permitted click or drag and
    /// schedules the deferred write-back for content-changing ones.
    fn guard_change(
        &mut self,
        holder: HolderId,
        session: SessionId,
        slot: SourceSlot,
        class: ChangeClass,
    ) -> Verdict {
        if let Err(violation) = self.check_source_item(&holder, slot) {
            self.raise_integrity_fault(&holder, &violation);
            return Verdict::Veto;
        }
        if class.is_content_changing() {
            debug!("[psb] Scheduling persist for {}", holder);
            self.scheduler
                .schedule_after_current_tick(DeferredTask::Persist { holder, session });
        }
        Verdict::Allow
    }

    /// Whether `holder` is fenced after a fault. The fence is lifted here once
    /// the presenter no longer knows the faulted view.
    fn fenced(&mut self, holder: &HolderId) -> bool {
        let Some(view) = self.registry.fenced_view(holder) else {
            return false;
        };
        if self.presenter.view_contents(view).is_some() {
            debug!("[psb] Vetoed event from faulted holder {}", holder);
            return true;
        }
        self.registry.unfence(holder);
        false
    }

    fn open_session(&self, holder: &HolderId) -> Option<(SessionId, SourceSlot)> {
        self.registry
            .lookup(holder)
            .map(|session| (session.id(), session.slot()))
    }
}

impl<T, H, V, S> PortableContainerApi for PortableContainerService<T, H, V, S>
where
    T: ItemTaxonomy,
    H: HolderGateway,
    V: ViewPresenter,
    S: DeferredScheduler,
{
    fn on_interact(&mut self, event: &InteractEvent) -> Verdict {
        if self.registry.contains(&event.holder) || self.fenced(&event.holder) {
            debug!("[psb] Blocked interaction by {} inside a session", event.holder);
            return Verdict::Veto;
        }
        let outcome = self.try_open(event);
        if !matches!(outcome, OpenOutcome::Opened { .. }) {
            debug!("[psb] No session for {}: {:?}", event.holder, outcome);
        }
        Verdict::Allow
    }

    fn on_drop_item(&mut self, event: &DropItemEvent) -> Verdict {
        if event.cancelled {
            return Verdict::Allow;
        }
        if self.fenced(&event.holder) {
            return Verdict::Veto;
        }
        if !self.registry.contains(&event.holder) || !self.taxonomy.is_container(&event.item) {
            return Verdict::Allow;
        }
        // Drop pressed before the view finished opening.
        warn!(
            "[psb] {} dropped a container item inside a session; closing the view",
            event.holder
        );
        self.presenter.close_view(&event.holder);
        Verdict::Veto
    }

    fn on_view_closed(&mut self, event: &ViewClosedEvent) -> PersistOutcome {
        if self.registry.unfence(&event.holder) {
            info!("[psb] Faulted view of {} closed", event.holder);
        }
        let outcome = self.persist_session(&event.holder, None);
        if let Some(session) = self.registry.end(&event.holder) {
            info!(
                "[psb] Closed session {} for {} ({:?})",
                session.id(),
                event.holder,
                outcome
            );
        }
        outcome
    }

    fn on_held_slot_change(&mut self, event: &HeldSlotChangeEvent) -> Verdict {
        if event.cancelled
            || !(self.registry.contains(&event.holder) || self.fenced(&event.holder))
        {
            return Verdict::Allow;
        }
        debug!(
            "[psb] Vetoed held slot change {} -> {} for {}",
            event.previous, event.new, event.holder
        );
        Verdict::Veto
    }

    fn on_swap_hands(&mut self, event: &SwapHandsEvent) -> Verdict {
        if event.cancelled
            || !(self.registry.contains(&event.holder) || self.fenced(&event.holder))
        {
            return Verdict::Allow;
        }
        debug!("[psb] Vetoed hand swap for {}", event.holder);
        Verdict::Veto
    }

    fn on_click(&mut self, event: &ClickEvent) -> Verdict {
        if event.cancelled {
            return Verdict::Allow;
        }
        let holder = event.holder;
        if self.fenced(&holder) {
            return Verdict::Veto;
        }
        let Some((session, slot)) = self.open_session(&holder) else {
            return Verdict::Allow;
        };

        let addressed = match event.click {
            ClickType::NumberKey => event
                .hotbar_button
                .and_then(|button| self.holders.inventory_item(&holder, usize::from(button))),
            ClickType::SwapOffhand => self.holders.hand_item(&holder, SourceSlot::Secondary),
            _ => None,
        };
        if click_moves_container(event, addressed.as_ref(), |item| {
            self.taxonomy.is_container(item)
        }) {
            debug!("[psb] Vetoed container item move by {}", holder);
            return Verdict::Veto;
        }

        self.guard_change(holder, session, slot, classify_click(event))
    }

    fn on_drag(&mut self, event: &DragEvent) -> Verdict {
        if event.cancelled {
            return Verdict::Allow;
        }
        let holder = event.holder;
        if self.fenced(&holder) {
            return Verdict::Veto;
        }
        let Some((session, slot)) = self.open_session(&holder) else {
            return Verdict::Allow;
        };

        if drag_moves_container(event, |item| self.taxonomy.is_container(item)) {
            debug!("[psb] Vetoed container item drag by {}", holder);
            return Verdict::Veto;
        }

        self.guard_change(holder, session, slot, classify_drag(event))
    }

    fn run_deferred(&mut self, task: DeferredTask) -> PersistOutcome {
        match task {
            DeferredTask::Persist { holder, session } => {
                self.persist_session(&holder, Some(session))
            }
        }
    }

    fn persist(&mut self, holder: &HolderId) -> PersistOutcome {
        self.persist_session(holder, None)
    }

    fn shutdown(&mut self) -> ShutdownReport {
        let mut report = ShutdownReport::default();
        let mut open = Vec::with_capacity(self.registry.len());
        self.registry
            .for_each(|holder, session| open.push((*holder, session.id())));

        for (holder, session) in open {
            if !self.holders.is_reachable(&holder) {
                error!(
                    "[psb] View not closed for unreachable holder {}! Contents not saved, possible dupe bug!",
                    holder
                );
                report.abandoned.push(holder);
                continue;
            }
            match self.persist_session(&holder, Some(session)) {
                PersistOutcome::Persisted { .. } => {
                    self.presenter.close_view(&holder);
                    report.persisted.push(holder);
                }
                PersistOutcome::Faulted(_) => report.faulted.push(holder),
                PersistOutcome::NoSession => {}
            }
        }

        self.registry.drain();
        info!(
            "[psb] Shutdown: {} persisted, {} faulted, {} abandoned",
            report.persisted.len(),
            report.faulted.len(),
            report.abandoned.len()
        );
        report
    }

    fn session(&self, holder: &HolderId) -> Option<&ActiveSession> {
        self.registry.lookup(holder)
    }

    fn status(&self) -> SessionStatus {
        SessionStatus {
            active_sessions: self.registry.len(),
            holders: self.registry.holders(),
        }
    }
}
