//! Mate Core Data Structures
//!
//! This crate places rigid parts by mating named anchors instead of
//! spelling out transforms:
//! - Anchor: position + direction on a part
//! - Solver: transform that mates a slave anchor onto a master anchor
//! - Part: geometry handle with named anchors
//! - Assembly: graph of parts linked by anchor constraints

pub mod anchor;
pub mod assembly;
pub mod config;
pub mod math;
pub mod observer;
pub mod part;
pub mod solver;

pub use anchor::*;
pub use assembly::*;
pub use config::*;
pub use math::*;
pub use observer::*;
pub use part::*;
pub use solver::*;

pub use mate_kernel::{Compound, KernelError, MeshSolid, Shape, ShapeKind, compound};
