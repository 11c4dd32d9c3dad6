//! Placement of bricks along x and of wavelanes along y.
//!
//! [`WavelaneCompiler`] turns one wave string into positioned bricks and
//! registers its nodes; [`WavegroupCompiler`] stacks lanes and nested groups,
//! recording the row table later used by annotations. Both write into a
//! [`RenderContext`] owned by the draw.

pub(crate) mod context;
pub(crate) mod wavegroup;
pub(crate) mod wavelane;

pub use context::{NodeBank, RenderContext, YStep};
pub use wavegroup::{
    DiagramSize, GroupItem, GroupLayout, GroupOptions, Ticks, WavegroupCompiler, size,
};
pub use wavelane::{CompiledLane, LaneOptions, PlacedBrick, WavelaneCompiler};
