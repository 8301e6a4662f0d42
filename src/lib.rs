//! Retargets imported humanoid avatar skeletons onto generated control rigs.
//!
//! The pipeline classifies source bone names into a canonical role taxonomy,
//! aligns a spawned meta-rig template onto the source geometry, hands the
//! template to an external rig generator, and then reconciles the generated
//! rig with the source so existing mesh skin weights keep working. Host
//! integration (generation engine, avatar-format addon) plugs in through
//! the [`RigGenerator`] and [`AvatarAddon`] traits.

#![forbid(unsafe_code)]

mod align;
mod classify;
mod error;
mod humanize;
mod mapping;
mod pipeline;
mod prune;
mod reconcile;
mod skeleton;
mod tables;

pub use align::*;
pub use classify::*;
pub use error::*;
pub use humanize::*;
pub use mapping::*;
pub use pipeline::*;
pub use prune::*;
pub use reconcile::*;
pub use skeleton::*;
pub use tables::*;

#[cfg(test)]
mod fixtures;
