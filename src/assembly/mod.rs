mod manifest;

pub(crate) use manifest::AssemblyDirectory;

use crate::environment::Environment;
use crate::error::Error;

/// A deployable stack as described by the cloud assembly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StackArtifact {
    pub(crate) id: String,
    pub(crate) display_name: Option<String>,
    pub(crate) stack_name: String,
    pub(crate) environment: Environment,
    /// Artifact ids (or display names) this stack must be deployed after.
    pub(crate) dependencies: Vec<String>,
}

impl StackArtifact {
    /// The id users see and select by: the construct path if there is one.
    pub(crate) fn hierarchical_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Source of stack artifacts
#[async_trait::async_trait]
pub(crate) trait CloudAssembly {
    async fn stack_artifacts(&self) -> Result<Vec<StackArtifact>, Error>;
}

#[cfg(test)]
#[async_trait::async_trait]
impl CloudAssembly for Vec<StackArtifact> {
    async fn stack_artifacts(&self) -> Result<Vec<StackArtifact>, Error> {
        Ok(self.clone())
    }
}

#[cfg(test)]
impl StackArtifact {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: None,
            stack_name: id.to_string(),
            environment: Environment::new("123456789012", "bermuda-triangle-1"),
            dependencies: Vec::new(),
        }
    }

    pub(crate) fn depends_on(mut self, ids: &[&str]) -> Self {
        self.dependencies
            .extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub(crate) fn display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub(crate) fn stack_name(mut self, name: &str) -> Self {
        self.stack_name = name.to_string();
        self
    }
}
