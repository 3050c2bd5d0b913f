use super::{CloudAssembly, StackArtifact};
use crate::environment::Environment;
use crate::error::Error;
use futures::future::{try_join_all, BoxFuture, FutureExt};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::Instrument;

const MANIFEST_FILE: &str = "manifest.json";
const STACK_ARTIFACT: &str = "aws:cloudformation:stack";
const NESTED_ASSEMBLY_ARTIFACT: &str = "cdk:cloud-assembly";

#[derive(Debug, Deserialize)]
struct AssemblyManifest {
    #[serde(default)]
    version: String,
    #[serde(default)]
    artifacts: IndexMap<String, ArtifactManifest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactManifest {
    #[serde(rename = "type")]
    type_: String,
    environment: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    display_name: Option<String>,
    #[serde(default)]
    properties: ArtifactProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactProperties {
    stack_name: Option<String>,
    directory_name: Option<String>,
}

/// A synthesized cloud assembly on disk, e.g. `cdk.out`.
#[derive(Debug, Clone)]
pub(crate) struct AssemblyDirectory {
    root: PathBuf,
}

impl AssemblyDirectory {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl CloudAssembly for AssemblyDirectory {
    async fn stack_artifacts(&self) -> Result<Vec<StackArtifact>, Error> {
        let stacks = load_assembly(self.root.clone(), Vec::new())
            .instrument(tracing::debug_span!("loading cloud assembly", root = %self.root.display()))
            .await?;
        tracing::debug!(nstacks = stacks.len(), "loaded stack artifacts");
        Ok(stacks)
    }
}

// Nested assemblies (stages) live in subdirectories with their own manifest,
// so loading recurses; siblings are read concurrently. `ancestors` holds the
// canonical directories above `dir`, a nested assembly may not point back at one.
fn load_assembly(
    dir: PathBuf,
    mut ancestors: Vec<PathBuf>,
) -> BoxFuture<'static, Result<Vec<StackArtifact>, Error>> {
    async move {
        let dir = tokio::fs::canonicalize(&dir).await?;
        let path = dir.join(MANIFEST_FILE);
        if ancestors.contains(&dir) {
            return Err(Error::manifest(
                path.display(),
                "nested assembly cycle, directory is already being loaded",
            ));
        }
        ancestors.push(dir.clone());

        tracing::debug!(path = %path.display(), "reading manifest");
        let contents = tokio::fs::read_to_string(&path).await?;
        let manifest: AssemblyManifest =
            serde_json::from_str(&contents).map_err(|e| Error::manifest(path.display(), e))?;
        tracing::debug!(
            version = %manifest.version,
            nartifacts = manifest.artifacts.len(),
            "parsed manifest"
        );

        let mut stacks = Vec::new();
        let mut nested = Vec::new();
        for (id, artifact) in manifest.artifacts {
            match artifact.type_.as_str() {
                STACK_ARTIFACT => stacks.push(artifact.into_stack_artifact(&path, id)?),
                NESTED_ASSEMBLY_ARTIFACT => {
                    let directory = artifact.properties.directory_name.ok_or_else(|| {
                        Error::manifest(
                            path.display(),
                            format!("nested assembly {} has no directoryName", id),
                        )
                    })?;
                    tracing::debug!(%id, %directory, "found nested assembly");
                    nested.push(load_assembly(dir.join(directory), ancestors.clone()));
                }
                other => tracing::trace!(%id, artifact_type = other, "skipping artifact"),
            }
        }

        for mut batch in try_join_all(nested).await? {
            stacks.append(&mut batch);
        }
        Ok(stacks)
    }
    .boxed()
}

impl ArtifactManifest {
    fn into_stack_artifact(self, path: &Path, id: String) -> Result<StackArtifact, Error> {
        let environment = self.environment.ok_or_else(|| {
            Error::manifest(path.display(), format!("stack {} has no environment", id))
        })?;
        let environment: Environment = environment.parse()?;

        Ok(StackArtifact {
            stack_name: self.properties.stack_name.unwrap_or_else(|| id.clone()),
            id,
            display_name: self.display_name,
            environment,
            dependencies: self.dependencies,
        })
    }
}
