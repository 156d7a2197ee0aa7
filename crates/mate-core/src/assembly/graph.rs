//! Graph operations for Assembly (linking parts)

use mate_kernel::Shape;

use super::{Assembly, AssemblyError, AssemblyResult, Constraint, Link};
use crate::part::Part;

impl<S: Shape> Assembly<S> {
    /// Constrain `slave` to `master`, registering either part if unseen
    ///
    /// Parts are identified by id; a part already in the assembly keeps its
    /// stored pose. Returns the index of the new link.
    pub fn link(
        &mut self,
        master: &Part<S>,
        slave: &Part<S>,
        constraint: Constraint,
    ) -> AssemblyResult<usize> {
        let slave_id = slave.id();
        if slave_id == self.root {
            return Err(AssemblyError::RootConstrained(slave_id));
        }
        if self.master.contains_key(&slave_id) {
            return Err(AssemblyError::AlreadyConstrained(slave_id));
        }

        master.anchor(&constraint.master_anchor)?;
        slave.anchor(&constraint.slave_anchor)?;

        self.register(master);
        self.register(slave);

        let index = self.links.len();
        tracing::debug!(
            assembly = %self.name,
            master = master.name(),
            master_anchor = %constraint.master_anchor,
            slave = slave.name(),
            slave_anchor = %constraint.slave_anchor,
            "Linked parts"
        );
        self.links.push(Link {
            master: master.id(),
            slave: slave_id,
            constraint,
        });
        self.master.insert(slave_id, index);
        self.slaves.entry(master.id()).or_default().push(index);

        Ok(index)
    }

    fn register(&mut self, part: &Part<S>) {
        if !self.parts.contains_key(&part.id()) {
            self.order.push(part.id());
            self.parts.insert(part.id(), part.clone());
        }
    }
}
