//! World transform resolution for Assembly

use std::collections::{HashMap, HashSet, VecDeque};

use mate_kernel::{Compound, Shape};
use uuid::Uuid;

use super::{Assembly, AssemblyError, AssemblyResult, Link};
use crate::anchor::Anchor;
use crate::config::SolverConfig;
use crate::math::Transform;
use crate::observer::{LinkEvent, SolveObserver};
use crate::part::Part;
use crate::solver::Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolveState {
    Unresolved,
    Resolving,
    Resolved,
}

impl<S: Shape> Assembly<S> {
    /// World transform of every part, root at identity
    pub fn resolve(&self) -> AssemblyResult<HashMap<Uuid, Transform>> {
        self.resolve_with(&Solver::new(SolverConfig::default()))
    }

    /// Same as [`Assembly::resolve`] with an explicit solver
    pub fn resolve_with<O: SolveObserver>(
        &self,
        solver: &Solver<O>,
    ) -> AssemblyResult<HashMap<Uuid, Transform>> {
        let mut state: HashMap<Uuid, ResolveState> = self
            .order
            .iter()
            .map(|&id| (id, ResolveState::Unresolved))
            .collect();
        let mut world = HashMap::with_capacity(self.order.len());

        state.insert(self.root, ResolveState::Resolved);
        world.insert(self.root, Transform::IDENTITY);

        let mut queue = VecDeque::from([self.root]);
        while let Some(master_id) = queue.pop_front() {
            let Some(&master_world) = world.get(&master_id) else {
                continue;
            };
            let Some(indices) = self.slaves.get(&master_id) else {
                continue;
            };

            for &index in indices {
                let link = &self.links[index];
                match state.get(&link.slave) {
                    Some(ResolveState::Unresolved) => {}
                    Some(_) => return Err(AssemblyError::CyclicAssembly(link.slave)),
                    None => return Err(AssemblyError::UnknownPart(link.slave)),
                }
                state.insert(link.slave, ResolveState::Resolving);

                let transform = self.solve_link(solver, link, &master_world)?;
                solver.observer().link_resolved(&LinkEvent {
                    master: link.master,
                    slave: link.slave,
                    constraint: &link.constraint,
                    world: transform,
                });

                world.insert(link.slave, transform);
                state.insert(link.slave, ResolveState::Resolved);
                queue.push_back(link.slave);
            }
        }

        if let Some(&stray) = self
            .order
            .iter()
            .find(|id| state.get(*id) != Some(&ResolveState::Resolved))
        {
            let err = self.classify_unreachable(stray);
            tracing::error!(assembly = %self.name, "Failed to resolve assembly: {}", err);
            return Err(err);
        }

        tracing::debug!(
            assembly = %self.name,
            parts = world.len(),
            links = self.links.len(),
            "Resolved assembly"
        );
        Ok(world)
    }

    /// Every part moved to its world pose, in insertion order
    pub fn resolve_parts(&self) -> AssemblyResult<Vec<Part<S>>> {
        let world = self.resolve()?;
        self.parts()
            .map(|part| {
                world
                    .get(&part.id())
                    .map(|transform| part.transformed(transform))
                    .ok_or(AssemblyError::UnknownPart(part.id()))
            })
            .collect()
    }

    /// All world-space geometry combined into one compound
    pub fn compound(&self) -> AssemblyResult<Compound<S>> {
        let shapes: Vec<S> = self
            .resolve_parts()?
            .into_iter()
            .map(|part| part.geometry().clone())
            .collect();
        Ok(mate_kernel::compound(&shapes)?)
    }

    /// Anchor `name` of part `id` in world space
    ///
    /// Resolves the whole assembly on every call. To query many anchors,
    /// call [`Assembly::resolve`] once and use [`Assembly::resolved_anchor`].
    pub fn world_anchor(&self, id: Uuid, name: &str) -> AssemblyResult<Anchor> {
        // Check the anchor before paying for resolution
        self.part(id)
            .ok_or(AssemblyError::UnknownPart(id))?
            .anchor(name)?;
        let world = self.resolve()?;
        self.resolved_anchor(&world, id, name)
    }

    /// Anchor `name` of part `id` moved by a map from [`Assembly::resolve`]
    pub fn resolved_anchor(
        &self,
        world: &HashMap<Uuid, Transform>,
        id: Uuid,
        name: &str,
    ) -> AssemblyResult<Anchor> {
        let part = self.part(id).ok_or(AssemblyError::UnknownPart(id))?;
        let anchor = part.anchor(name)?;
        let transform = world.get(&id).ok_or(AssemblyError::UnknownPart(id))?;
        Ok(anchor.transformed(transform))
    }

    fn solve_link<O: SolveObserver>(
        &self,
        solver: &Solver<O>,
        link: &Link,
        master_world: &Transform,
    ) -> AssemblyResult<Transform> {
        let master = self
            .parts
            .get(&link.master)
            .ok_or(AssemblyError::UnknownPart(link.master))?;
        let slave = self
            .parts
            .get(&link.slave)
            .ok_or(AssemblyError::UnknownPart(link.slave))?;

        let master_anchor = master
            .anchor(&link.constraint.master_anchor)?
            .transformed(master_world);
        let slave_anchor = slave.anchor(&link.constraint.slave_anchor)?;

        Ok(solver.solve(
            &master_anchor,
            slave_anchor,
            link.constraint.angle,
            link.constraint.distance,
        )?)
    }

    /// Walk the master chain of a part the root never reached
    fn classify_unreachable(&self, id: Uuid) -> AssemblyError {
        let mut seen = HashSet::from([id]);
        let mut current = id;
        while let Some(master) = self.master_of(current) {
            if !seen.insert(master) {
                return AssemblyError::CyclicAssembly(id);
            }
            current = master;
        }
        AssemblyError::DisconnectedAssembly(id)
    }
}
