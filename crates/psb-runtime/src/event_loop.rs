//! # Session Event Loop
//!
//! One consumer, one queue. Host events and deferred tasks share the same
//! channel so a deferred persist runs after the effects of the event that
//! scheduled it, and nothing else runs while a message is processed.
//!
//! ```text
//! host / journal ──HostEvent──┐
//!                             ├──→ [mpsc queue] ──→ service.handle_event ──Allow──→ host.apply
//! ChannelScheduler ──Deferred─┘                 └─→ service.run_deferred
//! ```

use crate::host::{HostWorld, InMemoryHost, ShulkerTaxonomy};
use psb_session::events::{DeferredTask, HostEvent};
use psb_session::ports::{
    DeferredScheduler, HolderGateway, ItemTaxonomy, PortableContainerApi, ViewPresenter,
};
use psb_session::{
    PersistOutcome, PortableContainerService, SessionConfig, SessionStatus, ShutdownReport,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// A unit of work on the loop.
#[derive(Clone, Debug, PartialEq)]
pub enum LoopMessage {
    Host(HostEvent),
    Deferred(DeferredTask),
}

/// Sending half of the loop queue.
#[derive(Clone, Debug)]
pub struct LoopSender {
    inner: mpsc::UnboundedSender<LoopMessage>,
}

impl LoopSender {
    pub fn send(&self, message: LoopMessage) {
        if self.inner.send(message).is_err() {
            warn!("[psb] Event loop is gone, message dropped");
        }
    }

    pub fn host_event(&self, event: HostEvent) {
        self.send(LoopMessage::Host(event));
    }
}

pub fn loop_channel() -> (LoopSender, mpsc::UnboundedReceiver<LoopMessage>) {
    let (inner, receiver) = mpsc::unbounded_channel();
    (LoopSender { inner }, receiver)
}

/// Scheduler that re-enqueues deferred work on the loop.
#[derive(Clone, Debug)]
pub struct ChannelScheduler {
    sender: LoopSender,
}

impl ChannelScheduler {
    pub fn new(sender: LoopSender) -> Self {
        Self { sender }
    }
}

impl DeferredScheduler for ChannelScheduler {
    fn schedule_after_current_tick(&self, task: DeferredTask) {
        self.sender.send(LoopMessage::Deferred(task));
    }
}

/// Counters over everything the loop processed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub events: u64,
    pub vetoed: u64,
    pub deferred: u64,
    pub persisted: u64,
    pub faulted: u64,
}

impl LoopStats {
    fn record_persist(&mut self, outcome: &PersistOutcome) {
        match outcome {
            PersistOutcome::Persisted { .. } => self.persisted += 1,
            PersistOutcome::Faulted(_) => self.faulted += 1,
            PersistOutcome::NoSession => {}
        }
    }
}

/// The single-threaded session loop.
pub struct SessionEventLoop<T, H>
where
    T: ItemTaxonomy,
    H: HolderGateway + ViewPresenter + HostWorld,
{
    service: PortableContainerService<T, H, H, ChannelScheduler>,
    host: Arc<H>,
    sender: LoopSender,
    receiver: mpsc::UnboundedReceiver<LoopMessage>,
    stats: LoopStats,
}

impl SessionEventLoop<ShulkerTaxonomy, InMemoryHost> {
    /// Loop over a fresh in-memory host.
    pub fn in_memory(config: SessionConfig) -> (Self, Arc<InMemoryHost>) {
        let (sender, receiver) = loop_channel();
        let host = Arc::new(InMemoryHost::new(sender.clone()));
        let event_loop = Self::new(
            config,
            Arc::new(ShulkerTaxonomy),
            Arc::clone(&host),
            sender,
            receiver,
        );
        (event_loop, host)
    }
}

impl<T, H> SessionEventLoop<T, H>
where
    T: ItemTaxonomy,
    H: HolderGateway + ViewPresenter + HostWorld,
{
    pub fn new(
        config: SessionConfig,
        taxonomy: Arc<T>,
        host: Arc<H>,
        sender: LoopSender,
        receiver: mpsc::UnboundedReceiver<LoopMessage>,
    ) -> Self {
        let scheduler = Arc::new(ChannelScheduler::new(sender.clone()));
        let service = PortableContainerService::new(
            config,
            taxonomy,
            Arc::clone(&host),
            Arc::clone(&host),
            scheduler,
        );
        Self {
            service,
            host,
            sender,
            receiver,
            stats: LoopStats::default(),
        }
    }

    pub fn sender(&self) -> LoopSender {
        self.sender.clone()
    }

    /// Enqueues a host event.
    pub fn submit(&self, event: HostEvent) {
        self.sender.host_event(event);
    }

    pub fn service(&self) -> &PortableContainerService<T, H, H, ChannelScheduler> {
        &self.service
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn status(&self) -> SessionStatus {
        self.service.status()
    }

    /// Processes one message to completion.
    pub fn process(&mut self, message: LoopMessage) {
        match message {
            LoopMessage::Host(HostEvent::ViewClosed(event)) => {
                self.stats.events += 1;
                let outcome = self.service.on_view_closed(&event);
                self.stats.record_persist(&outcome);
                self.host.apply(&HostEvent::ViewClosed(event));
            }
            LoopMessage::Host(event) => {
                self.stats.events += 1;
                if self.service.handle_event(&event).is_veto() {
                    self.stats.vetoed += 1;
                    debug!("[psb] Vetoed event from {}", event.holder());
                } else {
                    self.host.apply(&event);
                }
            }
            LoopMessage::Deferred(task) => {
                self.stats.deferred += 1;
                debug!("[psb] Running deferred persist for {}", task.holder());
                let outcome = self.service.run_deferred(task);
                self.stats.record_persist(&outcome);
            }
        }
    }

    /// Drains the queue, including anything enqueued while draining.
    /// Returns the number of messages processed.
    pub fn run_until_idle(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(message) = self.receiver.try_recv() {
            self.process(message);
            processed += 1;
        }
        processed
    }

    /// Runs until `shutdown` flips to `true`, then shuts down.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> ShutdownReport {
        info!("[psb] Event loop started");
        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[psb] Shutdown signal received");
                        break;
                    }
                }
                message = self.receiver.recv() => match message {
                    Some(message) => self.process(message),
                    None => break,
                },
            }
        }
        self.shutdown()
    }

    /// Ends every session, then delivers the resulting view closes.
    pub fn shutdown(&mut self) -> ShutdownReport {
        self.run_until_idle();
        let report = self.service.shutdown();
        self.stats.persisted += report.persisted.len() as u64;
        self.stats.faulted += report.faulted.len() as u64;
        self.run_until_idle();
        report
    }
}
