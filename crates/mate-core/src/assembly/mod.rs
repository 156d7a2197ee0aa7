//! Assembly graph
//!
//! Parts are linked master to slave by anchor constraints. The root part stays
//! where it was built; every other part is placed relative to its master when
//! the assembly is resolved.

mod constraint;
mod graph;
mod transforms;

use std::collections::HashMap;

use mate_kernel::KernelError;
use thiserror::Error;
use uuid::Uuid;

use crate::math::GeometryError;
use crate::part::{Part, PartError};

pub use constraint::{Constraint, Link};

/// Assembly-related errors
#[derive(Debug, Clone, Error)]
pub enum AssemblyError {
    #[error("Part not found: {0}")]
    UnknownPart(Uuid),

    #[error("Anchor '{anchor}' not found on part '{part}'")]
    UnknownAnchor { part: String, anchor: String },

    #[error("Part {0} is already constrained to a master")]
    AlreadyConstrained(Uuid),

    #[error("Root part {0} cannot be constrained")]
    RootConstrained(Uuid),

    #[error("Part {0} is part of a constraint cycle")]
    CyclicAssembly(Uuid),

    #[error("Part {0} is not connected to the root")]
    DisconnectedAssembly(Uuid),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

impl From<PartError> for AssemblyError {
    fn from(err: PartError) -> Self {
        match err {
            PartError::UnknownAnchor { part, anchor } => {
                AssemblyError::UnknownAnchor { part, anchor }
            }
            PartError::Geometry(e) => AssemblyError::Geometry(e),
        }
    }
}

/// Result type for assembly operations
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Parts and the constraints between them
#[derive(Debug, Clone)]
pub struct Assembly<S> {
    pub name: String,
    root: Uuid,
    parts: HashMap<Uuid, Part<S>>,
    /// Part ids in registration order
    order: Vec<Uuid>,
    links: Vec<Link>,
    /// slave id -> index of its link
    master: HashMap<Uuid, usize>,
    /// master id -> indices of its links
    slaves: HashMap<Uuid, Vec<usize>>,
}

impl<S: mate_kernel::Shape> Assembly<S> {
    /// Create an assembly fixed on `root`
    pub fn new(name: impl Into<String>, root: Part<S>) -> Self {
        let root_id = root.id();
        Self {
            name: name.into(),
            root: root_id,
            parts: HashMap::from([(root_id, root)]),
            order: vec![root_id],
            links: Vec::new(),
            master: HashMap::new(),
            slaves: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Part<S> {
        &self.parts[&self.root]
    }

    pub fn root_id(&self) -> Uuid {
        self.root
    }

    pub fn part(&self, id: Uuid) -> Option<&Part<S>> {
        self.parts.get(&id)
    }

    /// Parts in the order they were added
    pub fn parts(&self) -> impl Iterator<Item = &Part<S>> {
        self.order.iter().filter_map(|id| self.parts.get(id))
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn part_count(&self) -> usize {
        self.order.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Id of the part `id` is constrained to
    pub fn master_of(&self, id: Uuid) -> Option<Uuid> {
        self.master.get(&id).map(|&index| self.links[index].master)
    }

    /// Ids of the parts constrained to `id`
    pub fn slaves_of(&self, id: Uuid) -> Vec<Uuid> {
        self.slaves
            .get(&id)
            .map(|indices| indices.iter().map(|&i| self.links[i].slave).collect())
            .unwrap_or_default()
    }
}
