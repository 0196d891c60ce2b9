//! `AirportModel`: the airport state machine driven by the scheduler.

use ap_core::{AirportConfig, CoreResult, EntityId, Priority, ServerId, SimTime, SlotId, VariateGenerator};
use ap_engine::{
    Context, EngineError, EngineResult, Event, EventKind, Notification, SimObserver, SimulationModel,
    WaitingSpot,
};
use ap_stats::{Report, StatisticsCollector};
use tracing::{debug, info, trace, warn};

use crate::{
    ArrivalManifest, DecisionError, DecisionMaker, Entity, EntityState, Observation, Server,
    ServerStatus, WaitingArea,
};

#[cfg(feature = "fx-hash")]
type EntityMap = rustc_hash::FxHashMap<EntityId, Entity>;
#[cfg(not(feature = "fx-hash"))]
type EntityMap = std::collections::HashMap<EntityId, Entity>;

/// Where arrivals come from.
enum ArrivalSource {
    /// Gaps, service durations and priorities drawn from the generator.
    Stochastic,
    /// Pre-planned arrivals, replayed in order.
    Manifest(ArrivalManifest),
}

/// Gates, waiting area and in-system entities of one run.
///
/// Owns every piece of mutable simulation state; observers only see
/// [`Notification`]s.  Handlers are plain methods dispatched from
/// [`SimulationModel::handle_event`]:
///
/// | Event             | Handler                                              |
/// |-------------------|------------------------------------------------------|
/// | `Start`           | schedule the first arrival and the horizon           |
/// | `Arrival`         | create entity, serve / wait / divert, next arrival   |
/// | `ServiceComplete` | free gate, record stats, pull next waiting entity    |
/// | `HoldRelease`     | retry a held entity, or reschedule the retry         |
/// | `End`             | stop the run                                         |
pub struct AirportModel<D = crate::NoDecision> {
    config:  AirportConfig,
    rng:     VariateGenerator,
    source:  ArrivalSource,

    servers:  Vec<Server>,
    waiting:  WaitingArea,
    entities: EntityMap,

    total_arrivals: u32,
    generated:      u32,
    departed:       u64,
    diverted:       u64,

    stats:    StatisticsCollector,
    decision: D,
    rejected_decisions: u64,
    ended:    bool,
}

impl<D: DecisionMaker> AirportModel<D> {
    /// Set up gates and the waiting area for `config`.  Rejects invalid
    /// configurations before any state is built.
    pub fn new(config: AirportConfig, rng: VariateGenerator, decision: D) -> CoreResult<Self> {
        config.validate()?;
        let servers = (0..config.servers).map(|i| Server::new(ServerId(i as u32))).collect();
        Ok(Self {
            rng,
            source: ArrivalSource::Stochastic,
            servers,
            waiting: WaitingArea::from_config(&config.waiting),
            entities: EntityMap::default(),
            total_arrivals: config.total_arrivals,
            generated: 0,
            departed: 0,
            diverted: 0,
            stats: StatisticsCollector::new(config.servers, SimTime::ZERO),
            decision,
            rejected_decisions: 0,
            ended: false,
            config,
        })
    }

    /// Replay `manifest` instead of drawing arrivals.  The arrival budget
    /// becomes the manifest length; manifest times are absolute, so
    /// `warm_up` does not apply.
    pub fn with_arrivals(mut self, manifest: ArrivalManifest) -> Self {
        self.total_arrivals = u32::try_from(manifest.len()).unwrap_or(u32::MAX);
        self.source = ArrivalSource::Manifest(manifest);
        self
    }

    // ── Read-only views ───────────────────────────────────────────────────

    pub fn config(&self) -> &AirportConfig {
        &self.config
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn waiting(&self) -> &WaitingArea {
        &self.waiting
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Entities queued, held or in service.
    pub fn in_system(&self) -> usize {
        self.entities.len()
    }

    /// Gates currently serving.
    pub fn busy_servers(&self) -> usize {
        self.servers.iter().filter(|s| !s.is_idle()).count()
    }

    pub fn arrivals_generated(&self) -> u32 {
        self.generated
    }

    pub fn total_arrivals(&self) -> u32 {
        self.total_arrivals
    }

    pub fn departed(&self) -> u64 {
        self.departed
    }

    pub fn diverted(&self) -> u64 {
        self.diverted
    }

    /// External answers that were rejected and replaced by the default
    /// policy.  A "no choice" answer is not counted.
    pub fn rejected_decisions(&self) -> u64 {
        self.rejected_decisions
    }

    pub fn stats(&self) -> &StatisticsCollector {
        &self.stats
    }

    pub fn decision_maker(&self) -> &D {
        &self.decision
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    // ── Handlers ──────────────────────────────────────────────────────────

    fn on_start(&mut self, ctx: &mut Context<'_>) {
        let first = match &self.source {
            ArrivalSource::Stochastic => SimTime(self.config.warm_up),
            ArrivalSource::Manifest(m) => SimTime(m.get(0).map_or(0.0, |a| a.time)),
        };
        ctx.schedule_at(first.max(ctx.now()), EventKind::Arrival);
        if let Some(limit) = self.config.time_limit {
            ctx.schedule_at(SimTime(limit).max(ctx.now()), EventKind::End);
        }
        debug!(first_arrival = %first, time_limit = ?self.config.time_limit, "started");
    }

    fn on_arrival<O: SimObserver>(&mut self, ctx: &mut Context<'_>, observer: &mut O) -> EngineResult<()> {
        let now = ctx.now();
        if self.generated >= self.total_arrivals {
            return Err(invalid(now, "arrival after the arrival budget was exhausted"));
        }
        let id = EntityId(self.generated);
        let index = self.generated as usize;
        self.generated += 1;

        // Draw order is fixed: service duration, priority, next gap.
        let (service, priority) = match &self.source {
            ArrivalSource::Stochastic => {
                let service = self.rng.exponential(self.config.mean_service_time);
                let priority = if self.rng.bernoulli(self.config.high_priority_fraction) {
                    Priority::High
                } else {
                    Priority::Normal
                };
                if self.generated < self.total_arrivals {
                    let gap = self.rng.exponential(self.config.mean_arrival_time);
                    ctx.schedule_in(gap, EventKind::Arrival);
                }
                (service, priority)
            }
            ArrivalSource::Manifest(manifest) => {
                let planned = manifest
                    .get(index)
                    .ok_or_else(|| invalid(now, format!("no planned arrival #{index}")))?;
                if let Some(next) = manifest.get(index + 1) {
                    ctx.schedule_at(SimTime(next.time).max(now), EventKind::Arrival);
                }
                (planned.service_time, planned.priority)
            }
        };

        self.stats.record_arrival(priority);
        self.entities.insert(id, Entity::new(id, now, priority, service));
        trace!(entity = %id, %priority, service, "arrived");

        match self.find_idle_server() {
            Some(server) => self.start_service(id, server, ctx, observer)?,
            None => self.wait_or_divert(id, priority, ctx, observer),
        }
        self.stats.record_waiting(now, self.waiting.len());
        Ok(())
    }

    fn on_service_complete<O: SimObserver>(
        &mut self,
        id:       EntityId,
        server:   ServerId,
        ctx:      &mut Context<'_>,
        observer: &mut O,
    ) -> EngineResult<()> {
        let now = ctx.now();
        let gate = self
            .servers
            .get_mut(server.index())
            .ok_or_else(|| invalid(now, format!("{server} does not exist")))?;
        if gate.occupant() != Some(id) {
            return Err(invalid(now, format!("{server} is not serving {id}")));
        }
        let start = gate
            .release(now)
            .ok_or_else(|| invalid(now, format!("{server} was idle")))?;
        let entity = self
            .entities
            .remove(&id)
            .ok_or_else(|| invalid(now, format!("{id} is not in the system")))?;

        self.stats.record_server_busy(server, now.since(start));
        self.stats.record_service_end(entity.priority, start, now);
        self.departed += 1;
        debug!(entity = %id, %server, service = now.since(start), "departed");
        observer.on_notification(now, &Notification::Departed { entity: id, server });

        if let Some((spot, next)) = self.choose_waiting() {
            self.waiting.remove(next, spot);
            self.start_service(next, server, ctx, observer)?;
        }
        self.stats.record_waiting(now, self.waiting.len());
        Ok(())
    }

    fn on_hold_release<O: SimObserver>(
        &mut self,
        id:       EntityId,
        slot:     SlotId,
        ctx:      &mut Context<'_>,
        observer: &mut O,
    ) -> EngineResult<()> {
        let now = ctx.now();
        if self.entities.get(&id).map(|e| e.state) != Some(EntityState::Held(slot)) {
            trace!(entity = %id, %slot, "stale hold release");
            return Ok(());
        }
        match self.find_idle_server() {
            Some(server) => {
                self.waiting.remove(id, WaitingSpot::Hold(slot));
                self.start_service(id, server, ctx, observer)?;
                self.stats.record_waiting(now, self.waiting.len());
            }
            None => {
                let retry = self.waiting.retry_interval().unwrap_or(self.config.mean_service_time);
                ctx.schedule_in(retry, EventKind::HoldRelease { entity: id, slot });
                trace!(entity = %id, %slot, retry, "still held");
            }
        }
        Ok(())
    }

    // ── Allocation policy ─────────────────────────────────────────────────

    /// First idle gate by index.
    fn find_idle_server(&self) -> Option<ServerId> {
        self.servers.iter().find(|s| s.is_idle()).map(Server::id)
    }

    fn start_service<O: SimObserver>(
        &mut self,
        id:       EntityId,
        server:   ServerId,
        ctx:      &mut Context<'_>,
        observer: &mut O,
    ) -> EngineResult<()> {
        let now = ctx.now();
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or_else(|| invalid(now, format!("{id} is not in the system")))?;
        let gate = self
            .servers
            .get_mut(server.index())
            .ok_or_else(|| invalid(now, format!("{server} does not exist")))?;
        if !gate.bind(id, now) {
            return Err(invalid(now, format!("{server} is already occupied")));
        }
        entity.state = EntityState::Serving(server);
        entity.service_start = Some(now);
        self.stats.record_service_start(entity.arrival, now);
        ctx.schedule_in(entity.service_duration, EventKind::ServiceComplete { entity: id, server });

        debug!(entity = %id, %server, delay = now.since(entity.arrival), "entered service");
        observer.on_notification(now, &Notification::EnteredService { entity: id, server });
        Ok(())
    }

    /// Put `id` in the waiting area, or divert it when there is no room.
    fn wait_or_divert<O: SimObserver>(
        &mut self,
        id:       EntityId,
        priority: Priority,
        ctx:      &mut Context<'_>,
        observer: &mut O,
    ) {
        let now = ctx.now();
        let Some((spot, position)) = self.waiting.admit(id) else {
            self.entities.remove(&id);
            self.stats.record_diversion(priority);
            self.diverted += 1;
            debug!(entity = %id, %priority, "diverted: no gate or waiting room");
            observer.on_notification(now, &Notification::Diverted { entity: id });
            return;
        };

        let state = match spot {
            WaitingSpot::Queue(q) => EntityState::Queued(q),
            WaitingSpot::Hold(slot) => {
                let retry = self.waiting.retry_interval().unwrap_or(self.config.mean_service_time);
                ctx.schedule_in(retry, EventKind::HoldRelease { entity: id, slot });
                EntityState::Held(slot)
            }
        };
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.state = state;
        }
        debug!(entity = %id, ?spot, position, "waiting");
        observer.on_notification(now, &Notification::Enqueued { entity: id, spot, position });
    }

    /// Pick the waiting entity to serve at a freed gate.
    ///
    /// With two or more candidates the decision maker is asked first; a
    /// rejected answer falls back to the default policy.
    fn choose_waiting(&mut self) -> Option<(WaitingSpot, EntityId)> {
        let entries = self.waiting.entries();
        if entries.len() >= 2 {
            let observation = Observation::build(
                entries
                    .iter()
                    .filter_map(|&(_, e)| self.entities.get(&e).map(|x| (e, x.priority))),
                self.config.observation_slots,
            );
            let choice = self.decision.decide(&observation);
            match observation.resolve(choice) {
                Ok(chosen) => {
                    if let Some(&entry) = entries.iter().find(|(_, e)| *e == chosen) {
                        debug!(entity = %chosen, choice, "external decision applied");
                        return Some(entry);
                    }
                }
                Err(DecisionError::NoChoice) => {
                    trace!("no external choice; applying default policy");
                }
                Err(err) => {
                    self.rejected_decisions += 1;
                    warn!(%err, choice, "external decision rejected; applying default policy");
                }
            }
        }
        self.default_choice(&entries)
    }

    /// Earliest-arrived high-priority entity; otherwise the head of the
    /// longest queue, or the earliest-arrived held entity.
    fn default_choice(&self, entries: &[(WaitingSpot, EntityId)]) -> Option<(WaitingSpot, EntityId)> {
        let high = entries
            .iter()
            .filter(|(_, e)| self.entities.get(e).is_some_and(|x| x.priority.is_high()))
            .min_by_key(|(_, e)| *e);
        if let Some(&entry) = high {
            return Some(entry);
        }
        match self.waiting {
            WaitingArea::Queues { .. } => self.waiting.longest_queue_head(),
            WaitingArea::Holds { .. } => entries.iter().min_by_key(|(_, e)| *e).copied(),
        }
    }
}

impl<D: DecisionMaker> SimulationModel for AirportModel<D> {
    type Report = Report;

    fn handle_event<O: SimObserver>(
        &mut self,
        event:    &Event,
        ctx:      &mut Context<'_>,
        observer: &mut O,
    ) -> EngineResult<()> {
        match event.kind() {
            EventKind::Start => self.on_start(ctx),
            EventKind::Arrival => self.on_arrival(ctx, observer)?,
            EventKind::ServiceComplete { entity, server } => {
                self.on_service_complete(entity, server, ctx, observer)?
            }
            EventKind::HoldRelease { entity, slot } => self.on_hold_release(entity, slot, ctx, observer)?,
            EventKind::End => {
                self.ended = true;
                info!(now = %ctx.now(), in_system = self.entities.len(), "time limit reached");
            }
        }
        if self.is_complete() && !self.ended {
            info!(
                now      = %ctx.now(),
                departed = self.departed,
                diverted = self.diverted,
                "all arrivals handled"
            );
        }
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.ended
            || (self.generated >= self.total_arrivals
                && self.servers.iter().all(Server::is_idle)
                && self.waiting.is_empty())
    }

    fn finalize(&mut self, end: SimTime) -> Report {
        for server in &self.servers {
            if let ServerStatus::Serving { since, .. } = server.status() {
                self.stats.record_partial_busy(server.id(), end.since(since));
            }
        }
        self.stats.finalize(end, self.entities.len() as u64, self.rng.seed())
    }
}

fn invalid(at: SimTime, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidEvent { at, reason: reason.into() }
}
