//! UpdateManager - the frame dispatcher
//!
//! Owns the [`Registry`] and exposes the three pass entry points the host
//! loop calls every frame, in order: [`update`](UpdateManager::update),
//! [`fixed_update`](UpdateManager::fixed_update) (zero or more times, at the
//! host's fixed rate) and [`late_update`](UpdateManager::late_update).
//!
//! Each pass iterates a snapshot of its list taken on entry. Registry changes
//! made by hooks during a pass take effect from the next dispatch of that
//! pass, and entries whose behaviour has been dropped are skipped in place.

use crate::behaviour::{BehaviourHandle, BehaviourRef};
use crate::bootstrap::{self, BootstrapScan, SceneSource};
use crate::clock::GameClock;
use crate::pass::Pass;
use crate::registry::Registry;
use cadence_core::ObjectId;

/// Timing information visible to hooks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Frames begun so far, starting at 1 for the first frame
    pub frame: u64,
    /// Variable frame delta in seconds
    pub delta_time: f64,
    /// Fixed timestep in seconds
    pub fixed_timestep: f64,
    /// Total elapsed game time in seconds
    pub total_time: f64,
}

/// Outcome of one pass dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Hooks called
    pub invoked: usize,
    /// Entries skipped because their behaviour was dropped or already borrowed
    pub skipped: usize,
}

impl PassReport {
    fn absorb(&mut self, other: PassReport) {
        self.invoked += other.invoked;
        self.skipped += other.skipped;
    }
}

/// Outcome of one host frame driven by [`UpdateManager::run_frame`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub update: PassReport,
    /// Summed over every fixed step this frame
    pub fixed_update: PassReport,
    pub fixed_steps: u32,
    pub late_update: PassReport,
    pub destroyed: usize,
}

/// Handed to every hook: access to the registry and frame timing.
pub struct FrameContext<'a> {
    registry: &'a mut Registry,
    this: &'a BehaviourRef,
    pass: Pass,
    time: FrameTime,
}

impl<'a> FrameContext<'a> {
    /// The behaviour whose hook is running
    pub fn this(&self) -> &BehaviourRef {
        self.this
    }

    /// The object owning the running behaviour
    pub fn owner(&self) -> ObjectId {
        self.this.owner()
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.time.frame
    }

    /// Delta for the running pass: the fixed timestep during fixed update,
    /// the frame delta otherwise
    pub fn delta_time(&self) -> f64 {
        match self.pass {
            Pass::FixedUpdate => self.time.fixed_timestep,
            Pass::Update | Pass::LateUpdate => self.time.delta_time,
        }
    }

    pub fn total_time(&self) -> f64 {
        self.time.total_time
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// Register another behaviour; it is first ticked on the next dispatch
    pub fn add(&mut self, target: &BehaviourHandle) -> Option<Pass> {
        self.registry.add(target)
    }

    pub fn remove(&mut self, target: &(impl AsRef<BehaviourRef> + ?Sized)) -> Option<Pass> {
        self.registry.remove(target)
    }

    pub fn remove_and_destroy(&mut self, target: &(impl AsRef<BehaviourRef> + ?Sized)) -> Option<Pass> {
        self.registry.remove_and_destroy(target)
    }

    /// Unregister the running behaviour. The current pass still finishes.
    pub fn remove_self(&mut self) -> Option<Pass> {
        self.registry.remove(self.this)
    }

    /// Unregister the running behaviour and destroy its object at the end of the frame
    pub fn destroy_self(&mut self) -> Option<Pass> {
        self.registry.remove_and_destroy(self.this)
    }
}

/// The frame dispatcher.
///
/// Built once per host loop, either empty with [`UpdateManager::new`] or by
/// scanning an existing scene with [`UpdateManager::bootstrap`]. Dropping it
/// ends dispatch; the behaviours themselves stay owned by the object system.
#[derive(Debug, Default)]
pub struct UpdateManager {
    registry: Registry,
    time: FrameTime,
}

impl UpdateManager {
    /// A manager with no registrations
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manager and register every behaviour the scan discovers in `scene`.
    ///
    /// Behaviours created afterwards must be added explicitly.
    pub fn bootstrap(scene: &impl SceneSource, scan: BootstrapScan) -> Self {
        let mut manager = Self::new();
        let discovered = bootstrap::discover(scene, scan);
        let found = discovered.len();
        for handle in &discovered {
            manager.registry.add(handle);
        }
        log::info!(
            "Update manager bootstrapped: {} behaviours found, {} update / {} fixed / {} late",
            found,
            manager.registry.len(Pass::Update),
            manager.registry.len(Pass::FixedUpdate),
            manager.registry.len(Pass::LateUpdate),
        );
        manager
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn add(&mut self, target: &BehaviourHandle) -> Option<Pass> {
        self.registry.add(target)
    }

    pub fn remove(&mut self, target: &(impl AsRef<BehaviourRef> + ?Sized)) -> Option<Pass> {
        self.registry.remove(target)
    }

    pub fn remove_and_destroy(&mut self, target: &(impl AsRef<BehaviourRef> + ?Sized)) -> Option<Pass> {
        self.registry.remove_and_destroy(target)
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Start a new frame, taking timing from `clock`
    pub fn begin_frame(&mut self, clock: &GameClock) {
        self.time = FrameTime {
            frame: self.time.frame + 1,
            delta_time: clock.delta_time,
            fixed_timestep: clock.fixed_timestep,
            total_time: clock.total_time,
        };
    }

    /// Early pass: call `update` on every update-list entry
    pub fn update(&mut self) -> PassReport {
        self.dispatch(Pass::Update)
    }

    /// Fixed pass: call `fixed_update` on every fixed-update-list entry
    pub fn fixed_update(&mut self) -> PassReport {
        self.dispatch(Pass::FixedUpdate)
    }

    /// Late pass: call `late_update` on every late-update-list entry
    pub fn late_update(&mut self) -> PassReport {
        self.dispatch(Pass::LateUpdate)
    }

    fn dispatch(&mut self, pass: Pass) -> PassReport {
        let mut report = PassReport::default();

        let list = self.registry.list(pass);
        if list.is_empty() {
            return report;
        }
        let count = list.len();
        let snapshot = list.snapshot();

        for entry in snapshot.iter().take(count) {
            let Some(shared) = entry.upgrade() else {
                report.skipped += 1;
                continue;
            };
            let Ok(mut behaviour) = shared.try_borrow_mut() else {
                log::warn!(
                    "[dispatch] {} skipped in {}: behaviour is already borrowed",
                    entry.owner(),
                    pass
                );
                report.skipped += 1;
                continue;
            };

            let mut ctx = FrameContext {
                registry: &mut self.registry,
                this: entry,
                pass,
                time: self.time,
            };
            match pass {
                Pass::Update => behaviour.update(&mut ctx),
                Pass::FixedUpdate => behaviour.fixed_update(&mut ctx),
                Pass::LateUpdate => behaviour.late_update(&mut ctx),
            }
            report.invoked += 1;
        }

        report
    }

    /// Destroy every object queued by `remove_and_destroy`.
    ///
    /// Returns how many objects were destroyed. Objects the scene no longer
    /// knows about are ignored.
    pub fn apply_destroy_requests(&mut self, scene: &mut impl SceneSource) -> usize {
        let mut destroyed = 0;
        for object in self.registry.drain_destroy_requests() {
            match scene.destroy(object) {
                Ok(()) => destroyed += 1,
                Err(e) => log::debug!("[dispatch] destroy of {} ignored: {}", object, e),
            }
        }
        destroyed
    }

    /// Drive one host frame using real elapsed time
    pub fn run_frame(&mut self, clock: &mut GameClock, scene: &mut impl SceneSource) -> FrameReport {
        clock.tick();
        self.run_ticked_frame(clock, scene)
    }

    /// Drive one host frame, advancing `clock` by a simulated `elapsed` seconds
    pub fn run_frame_with(
        &mut self,
        elapsed: f64,
        clock: &mut GameClock,
        scene: &mut impl SceneSource,
    ) -> FrameReport {
        clock.advance(elapsed);
        self.run_ticked_frame(clock, scene)
    }

    fn run_ticked_frame(&mut self, clock: &mut GameClock, scene: &mut impl SceneSource) -> FrameReport {
        let mut report = FrameReport::default();
        self.begin_frame(clock);

        report.update = self.update();

        while clock.should_fixed_update() {
            report.fixed_update.absorb(self.fixed_update());
            report.fixed_steps += 1;
            clock.consume_fixed_step();
        }

        report.late_update = self.late_update();
        report.destroyed = self.apply_destroy_requests(scene);
        report
    }
}
