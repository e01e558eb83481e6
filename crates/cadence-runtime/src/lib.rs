//! Cadence Runtime - Centralized per-frame tick dispatch
//!
//! Instead of every object receiving its own per-frame callbacks, a single
//! `UpdateManager` collects the behaviours that opt into periodic hooks and
//! drives them through three ordered passes each frame:
//! - `Behaviour` / `Hooks` - the hook capability set an entity declares
//! - `Pass` - update, fixed-update and late-update, plus the classifier
//! - `Registry` - one membership list per pass, rebuilt on every mutation
//! - `UpdateManager` - pass entry points, bootstrap scan and frame driver
//! - `GameClock` - fixed-timestep accumulator deciding how many fixed passes run

mod behaviour;
mod bootstrap;
mod clock;
mod config;
mod manager;
mod pass;
mod registry;

pub use behaviour::{Behaviour, BehaviourHandle, BehaviourRef, Hooks};
pub use bootstrap::{BootstrapScan, SceneSource};
pub use clock::GameClock;
pub use config::RuntimeConfig;
pub use manager::{FrameContext, FrameReport, FrameTime, PassReport, UpdateManager};
pub use pass::Pass;
pub use registry::{PassList, Registry};
