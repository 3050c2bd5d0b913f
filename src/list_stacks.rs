use crate::assembly::{CloudAssembly, StackArtifact};
use crate::environment::Environment;
use crate::error::Error;
use crate::order::StackGraph;
use crate::selection::{ExtendedSelection, StackSelector};
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub(crate) struct ListStacksOptions {
    /// Stacks to list, all stacks when empty
    pub(crate) selectors: Vec<String>,
    pub(crate) extend: ExtendedSelection,
}

/// A dependency of a stack, with its own dependencies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct DependencyDetails {
    pub(crate) id: String,
    pub(crate) dependencies: Vec<DependencyDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct StackDetails {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) environment: Environment,
    pub(crate) dependencies: Vec<DependencyDetails>,
}

/// The selected stacks, dependencies first.
pub(crate) async fn list_stacks(
    assembly: &impl CloudAssembly,
    options: &ListStacksOptions,
) -> Result<Vec<StackDetails>, Error> {
    let artifacts = assembly.stack_artifacts().await?;
    let selector = StackSelector::new(&options.selectors)?;
    let selected = selector.select(&artifacts, options.extend)?;
    tracing::debug!(
        nstacks = artifacts.len(),
        nselected = selected.len(),
        "selected stacks"
    );

    stack_details(&selected)
}

pub(crate) fn stack_details(stacks: &[StackArtifact]) -> Result<Vec<StackDetails>, Error> {
    let graph = StackGraph::resolve(stacks)?;
    let order = graph.topological_order()?;
    let trees = graph.dependency_trees(&order)?;

    Ok(order
        .into_iter()
        .zip(trees)
        .map(|(index, dependencies)| {
            let stack = graph.stack(index);
            StackDetails {
                id: stack.hierarchical_id().to_string(),
                name: stack.stack_name.clone(),
                environment: stack.environment.clone(),
                dependencies,
            }
        })
        .collect())
}
