use crate::assembly::StackArtifact;
use crate::error::Error;
use crate::order::StackGraph;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Which stacks besides the matched ones are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExtendedSelection {
    None,
    /// Also include everything the matched stacks depend on.
    Upstream,
    /// Also include everything that depends on the matched stacks.
    Downstream,
}

impl Default for ExtendedSelection {
    fn default() -> Self {
        ExtendedSelection::None
    }
}

#[derive(Debug)]
pub(crate) struct StackSelector {
    patterns: Vec<String>,
    matcher: GlobSet,
}

impl StackSelector {
    // `*` stops at `/`, so `*` means top level stacks and `**` means all of them.
    pub(crate) fn new(patterns: &[String]) -> Result<Self, Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| Error::InvalidSelector {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }
        let matcher = builder.build().map_err(|source| Error::InvalidSelector {
            pattern: patterns.join(" "),
            source,
        })?;

        Ok(Self {
            patterns: patterns.to_vec(),
            matcher,
        })
    }

    pub(crate) fn matches(&self, stack: &StackArtifact) -> bool {
        self.matcher.is_match(stack.hierarchical_id())
    }

    /// Selected stacks, in assembly order.
    pub(crate) fn select(
        &self,
        stacks: &[StackArtifact],
        extend: ExtendedSelection,
    ) -> Result<Vec<StackArtifact>, Error> {
        let graph = StackGraph::resolve(stacks)?;

        let mut selected: Vec<bool> = if self.patterns.is_empty() {
            vec![true; stacks.len()]
        } else {
            stacks.iter().map(|s| self.matches(s)).collect()
        };
        if !self.patterns.is_empty() && !selected.iter().any(|&s| s) {
            return Err(Error::NoStacksMatch(self.patterns.clone()));
        }
        tracing::debug!(
            nmatched = selected.iter().filter(|&&s| s).count(),
            ?extend,
            "matched stacks"
        );

        match extend {
            ExtendedSelection::None => {}
            ExtendedSelection::Upstream => {
                expand(&mut selected, |i| graph.dependencies_of(i));
            }
            ExtendedSelection::Downstream => {
                expand(&mut selected, |i| graph.dependents_of(i));
            }
        }

        Ok(stacks
            .iter()
            .zip(selected)
            .filter_map(|(stack, keep)| if keep { Some(stack.clone()) } else { None })
            .collect())
    }
}

fn expand<'g>(selected: &mut [bool], neighbours: impl Fn(usize) -> &'g [usize]) {
    let mut to_visit: Vec<usize> = (0..selected.len()).filter(|&i| selected[i]).collect();

    while let Some(index) = to_visit.pop() {
        for &next in neighbours(index) {
            if !selected[next] {
                selected[next] = true;
                to_visit.push(next);
            }
        }
    }
}
