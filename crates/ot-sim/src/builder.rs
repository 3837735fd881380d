//! Fluent builder for constructing a [`Sim`].

use std::collections::{BTreeSet, VecDeque};

use ot_behavior::{Manager, Needs, Tuning, Worker, WorkerKind};
use ot_core::{AgentId, AgentRngs, ManagerId, Point, SimConfig, Tick, VisitorId, WorkerId};
use ot_facility::{Facilities, FloorPlan, Layout};
use ot_mobility::{MobilityEngine, MobilityError, engine::DEFAULT_SPEED};
use ot_schedule::TimerQueue;

use crate::sim::{Floor, PendingVisitor, Role};
use crate::{Sim, SimError, SimResult};

// ── Entity specs ──────────────────────────────────────────────────────────────

/// How to set up one worker.
#[derive(Clone, Debug)]
pub struct WorkerSpec {
    pub kind:  WorkerKind,
    /// Where the body stands at tick 0.
    pub start: Point,
    /// Required for [`WorkerKind::Desk`], ignored otherwise.
    pub desk:  Option<Point>,
    pub needs: Needs,
}

impl WorkerSpec {
    /// A desk worker who starts seated at `desk`.
    pub fn desk(desk: Point) -> Self {
        Self { kind: WorkerKind::Desk, start: desk, desk: Some(desk), needs: Needs::default() }
    }

    pub fn patrol(start: Point) -> Self {
        Self { kind: WorkerKind::Patrol, start, desk: None, needs: Needs::default() }
    }

    pub fn transport(start: Point) -> Self {
        Self { kind: WorkerKind::Transport, start, desk: None, needs: Needs::default() }
    }

    pub fn starting_at(mut self, start: Point) -> Self {
        self.start = start;
        self
    }

    pub fn with_needs(mut self, needs: Needs) -> Self {
        self.needs = needs;
        self
    }
}

/// How to set up one manager.
#[derive(Clone, Debug)]
pub struct ManagerSpec {
    pub start:        Point,
    pub office:       Point,
    pub subordinates: Vec<WorkerId>,
}

impl ManagerSpec {
    /// A manager who starts in its office.
    pub fn in_office(office: Point, subordinates: Vec<WorkerId>) -> Self {
        Self { start: office, office, subordinates }
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — tick length, total ticks, seed, snapshot interval
/// - [`FloorPlan`] — named points and areas of the office
/// - [`Facilities`] — the seating areas, lines and meeting rooms the plan
///   refers to
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default              |
/// |-----------------------|----------------------|
/// | `.tuning(t)`          | `Tuning::default()`  |
/// | `.walking_speed(s)`   | 3.5 units/s          |
///
/// Entities are added with [`add_worker`](Self::add_worker),
/// [`add_manager`](Self::add_manager) and [`add_visitor`](Self::add_visitor).
/// Bodies are numbered workers first, then managers, then visitors in order
/// of arrival.
///
/// # Example
///
/// ```rust,ignore
/// let mut builder = SimBuilder::new(config, plan, facilities);
/// let alice = builder.add_worker(WorkerSpec::desk(Point::new(2.0, 0.0)));
/// builder.add_manager(ManagerSpec::in_office(Point::new(0.0, -20.0), vec![alice]));
/// builder.add_visitor(Tick(50));
/// let mut sim = builder.build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:     SimConfig,
    plan:       FloorPlan,
    facilities: Facilities,
    tuning:     Tuning,
    speed:      f32,
    workers:    Vec<WorkerSpec>,
    managers:   Vec<ManagerSpec>,
    visitors:   Vec<Tick>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, plan: FloorPlan, facilities: Facilities) -> Self {
        Self {
            config,
            plan,
            facilities,
            tuning:   Tuning::default(),
            speed:    DEFAULT_SPEED,
            workers:  Vec::new(),
            managers: Vec::new(),
            visitors: Vec::new(),
        }
    }

    pub fn tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Walking speed shared by every body, in units per second.
    pub fn walking_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn add_worker(&mut self, spec: WorkerSpec) -> WorkerId {
        self.workers.push(spec);
        WorkerId((self.workers.len() - 1) as u32)
    }

    pub fn add_manager(&mut self, spec: ManagerSpec) -> ManagerId {
        self.managers.push(spec);
        ManagerId((self.managers.len() - 1) as u32)
    }

    /// A visitor walks into the cafeteria at tick `at`.
    pub fn add_visitor(&mut self, at: Tick) {
        self.visitors.push(at);
    }

    /// Validate inputs, place every body and send everyone off to work.
    pub fn build(self) -> SimResult<Sim> {
        // ── Validate configuration ────────────────────────────────────────
        self.config.validate()?;
        self.tuning.validate()?;
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(MobilityError::InvalidSpeed(self.speed).into());
        }
        let layout = Layout::new(self.plan, &self.facilities)?;

        // ── Validate workers ──────────────────────────────────────────────
        for (i, spec) in self.workers.iter().enumerate() {
            let worker = WorkerId(i as u32);
            let has_route = match spec.kind {
                WorkerKind::Desk => {
                    if spec.desk.is_none() {
                        return Err(SimError::MissingDesk(worker));
                    }
                    true
                }
                WorkerKind::Patrol    => layout.has_patrol_route(),
                WorkerKind::Transport => layout.has_transport_route(),
            };
            if !has_route {
                return Err(SimError::MissingRoute { worker, kind: spec.kind.as_str() });
            }
        }

        // ── Validate rosters ──────────────────────────────────────────────
        //
        // Every worker answers to at most one manager.
        let mut boss: Vec<Option<ManagerId>> = vec![None; self.workers.len()];
        for (i, spec) in self.managers.iter().enumerate() {
            let manager = ManagerId(i as u32);
            for &worker in &spec.subordinates {
                let Some(entry) = boss.get_mut(worker.index()) else {
                    return Err(SimError::UnknownSubordinate { manager, worker });
                };
                if let Some(first) = *entry {
                    return Err(SimError::OverlappingRosters { worker, first, second: manager });
                }
                *entry = Some(manager);
            }
        }

        // ── Place bodies ──────────────────────────────────────────────────
        let body_count = self.workers.len() + self.managers.len() + self.visitors.len();
        let mut mobility = MobilityEngine::with_speed(body_count, self.speed);
        let mut roles = Vec::with_capacity(body_count);

        let mut workers = Vec::with_capacity(self.workers.len());
        for (i, spec) in self.workers.into_iter().enumerate() {
            let id = WorkerId(i as u32);
            let body = AgentId(roles.len() as u32);
            mobility.store.place(body, spec.start)?;
            roles.push(Role::Worker(id));
            workers.push(Worker::new(id, body, spec.kind, spec.desk).with_needs(spec.needs));
        }

        let mut managers = Vec::with_capacity(self.managers.len());
        for (i, spec) in self.managers.into_iter().enumerate() {
            let id = ManagerId(i as u32);
            let body = AgentId(roles.len() as u32);
            mobility.store.place(body, spec.start)?;
            roles.push(Role::Manager(id));
            managers.push(Manager::new(id, body, spec.office, spec.subordinates));
        }

        // Visitor bodies stay off the floor until their arrival tick.
        let mut arrivals = self.visitors;
        arrivals.sort();
        let mut pending = VecDeque::with_capacity(arrivals.len());
        for (i, at) in arrivals.into_iter().enumerate() {
            let id = VisitorId(i as u32);
            let body = AgentId(roles.len() as u32);
            mobility.store.despawn(body)?;
            roles.push(Role::Visitor(id));
            pending.push_back(PendingVisitor { id, body, at });
        }

        let floor = Floor {
            clock:      self.config.make_clock(),
            tuning:     self.tuning,
            layout,
            facilities: self.facilities,
            timers:     TimerQueue::new(),
            mobility,
            rngs:       AgentRngs::new(body_count, self.config.seed),
        };

        let mut sim = Sim {
            config:   self.config,
            floor,
            workers,
            managers,
            visitors: Vec::new(),
            roles,
            pending,
            contacts: BTreeSet::new(),
        };
        sim.start();
        Ok(sim)
    }
}
