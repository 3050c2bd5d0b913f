//! Dependency ordering of stacks.
//!
//! Stacks are nodes, "must be deployed after" references are edges. A reference
//! may name a stack by artifact id or by display name (its construct path), both
//! resolve to the same node. References that resolve to nothing, such as asset
//! manifests or stacks outside the selection, are not edges.

use crate::assembly::StackArtifact;
use crate::error::Error;
use crate::list_stacks::DependencyDetails;
use std::collections::{HashMap, HashSet};

pub(crate) struct StackGraph<'a> {
    stacks: &'a [StackArtifact],
    /// Direct dependencies per node, in declaration order.
    dependencies: Vec<Vec<usize>>,
    dependents: Vec<Vec<usize>>,
}

impl<'a> StackGraph<'a> {
    pub(crate) fn resolve(stacks: &'a [StackArtifact]) -> Result<Self, Error> {
        let mut aliases: HashMap<&str, usize> = HashMap::with_capacity(stacks.len() * 2);
        for (index, stack) in stacks.iter().enumerate() {
            for name in std::iter::once(stack.id.as_str()).chain(stack.display_name.as_deref()) {
                match aliases.insert(name, index) {
                    Some(previous) if previous != index => {
                        return Err(Error::DuplicateStack(name.to_string()));
                    }
                    _ => {}
                }
            }
        }

        let mut dependencies = Vec::with_capacity(stacks.len());
        let mut dependents = vec![Vec::new(); stacks.len()];
        for (index, stack) in stacks.iter().enumerate() {
            let mut direct: Vec<usize> = Vec::with_capacity(stack.dependencies.len());
            for reference in &stack.dependencies {
                match aliases.get(reference.as_str()) {
                    Some(&dependency) if !direct.contains(&dependency) => {
                        direct.push(dependency);
                        dependents[dependency].push(index);
                    }
                    Some(_) => {}
                    None => {
                        tracing::trace!(
                            stack = %stack.hierarchical_id(),
                            %reference,
                            "ignoring unresolved dependency"
                        );
                    }
                }
            }
            dependencies.push(direct);
        }

        Ok(Self {
            stacks,
            dependencies,
            dependents,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.stacks.len()
    }

    pub(crate) fn stack(&self, index: usize) -> &'a StackArtifact {
        &self.stacks[index]
    }

    pub(crate) fn dependencies_of(&self, index: usize) -> &[usize] {
        &self.dependencies[index]
    }

    pub(crate) fn dependents_of(&self, index: usize) -> &[usize] {
        &self.dependents[index]
    }

    /// Node indices with every dependency ahead of its dependents.
    ///
    /// Each round places, in input order, all nodes whose dependencies are
    /// already placed. A round that places nothing means the remaining nodes
    /// are on or behind a cycle.
    pub(crate) fn topological_order(&self) -> Result<Vec<usize>, Error> {
        let mut placed = vec![false; self.len()];
        let mut order = Vec::with_capacity(self.len());

        while order.len() < self.len() {
            let ready: Vec<usize> = (0..self.len())
                .filter(|&i| !placed[i] && self.dependencies[i].iter().all(|&d| placed[d]))
                .collect();

            if ready.is_empty() {
                let remaining = (0..self.len()).filter(|&i| !placed[i]).collect::<Vec<_>>();
                tracing::debug!(nremaining = remaining.len(), "dependency cycle");
                return Err(self.cycle_error(remaining));
            }

            for i in ready {
                placed[i] = true;
                order.push(i);
            }
        }

        Ok(order)
    }

    /// The dependency tree of every node in `order`, sharing work between
    /// stacks that have dependencies in common.
    pub(crate) fn dependency_trees(
        &self,
        order: &[usize],
    ) -> Result<Vec<Vec<DependencyDetails>>, Error> {
        let mut memo = HashMap::new();
        let mut in_progress = HashSet::new();
        order
            .iter()
            .map(|&index| self.subtree(index, &mut memo, &mut in_progress))
            .collect()
    }

    fn subtree(
        &self,
        index: usize,
        memo: &mut HashMap<usize, Vec<DependencyDetails>>,
        in_progress: &mut HashSet<usize>,
    ) -> Result<Vec<DependencyDetails>, Error> {
        if let Some(tree) = memo.get(&index) {
            return Ok(tree.clone());
        }
        if !in_progress.insert(index) {
            let mut nodes: Vec<usize> = in_progress.iter().copied().collect();
            nodes.sort_unstable();
            return Err(self.cycle_error(nodes));
        }

        let mut tree = Vec::with_capacity(self.dependencies[index].len());
        for &dependency in &self.dependencies[index] {
            tree.push(DependencyDetails {
                id: self.stacks[dependency].hierarchical_id().to_string(),
                dependencies: self.subtree(dependency, memo, in_progress)?,
            });
        }

        in_progress.remove(&index);
        memo.insert(index, tree.clone());
        Ok(tree)
    }

    fn cycle_error(&self, nodes: Vec<usize>) -> Error {
        Error::CyclicDependencies(
            nodes
                .into_iter()
                .map(|i| self.stacks[i].hierarchical_id().to_string())
                .collect(),
        )
    }
}
