//! Pre-trained classifier, fitted scaler, and training schema, loaded once per process.

mod classifier;
mod scaler;
mod schema;

pub use classifier::{
    ClassLabel, Classifier, ClassifierArtifact, DecisionTree, LogisticRegression, ModelError,
    RandomForest, DECISION_BOUNDARY,
};
pub use scaler::{MinMaxScaler, Scaler, ScalerArtifact, ScalingError, StandardScaler};
pub use schema::{AlignedFeatures, SchemaError, TrainingSchema};

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::encoding::columns;
use crate::config::ArtifactConfig;

/// The three stored artifacts the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Classifier,
    Scaler,
    TrainingSchema,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Classifier,
        ArtifactKind::Scaler,
        ArtifactKind::TrainingSchema,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::TrainingSchema => "training schema",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Startup failure: no inference is possible without every artifact.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("{artifact} artifact unavailable at {location}: {reason}")]
    Unavailable {
        artifact: ArtifactKind,
        location: String,
        reason: String,
    },
    #[error("{artifact} expects {found} features but the training schema has {expected}")]
    WidthMismatch {
        artifact: ArtifactKind,
        expected: usize,
        found: usize,
    },
}

/// Storage abstraction so loading can be exercised without the filesystem.
pub trait ArtifactSource: Send + Sync {
    fn read(&self, artifact: ArtifactKind) -> std::io::Result<Vec<u8>>;
    fn location(&self, artifact: ArtifactKind) -> String;
}

/// Reads JSON artifacts from the configured paths.
#[derive(Debug, Clone)]
pub struct FileArtifactSource {
    config: ArtifactConfig,
}

impl FileArtifactSource {
    pub fn new(config: ArtifactConfig) -> Self {
        Self { config }
    }

    fn path(&self, artifact: ArtifactKind) -> &PathBuf {
        match artifact {
            ArtifactKind::Classifier => &self.config.model_path,
            ArtifactKind::Scaler => &self.config.scaler_path,
            ArtifactKind::TrainingSchema => &self.config.columns_path,
        }
    }
}

impl ArtifactSource for FileArtifactSource {
    fn read(&self, artifact: ArtifactKind) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.path(artifact))
    }

    fn location(&self, artifact: ArtifactKind) -> String {
        self.path(artifact).display().to_string()
    }
}

/// Immutable bundle shared by every assessment for the lifetime of the service.
pub struct ModelHandles {
    classifier: Arc<dyn Classifier>,
    scaler: Arc<dyn Scaler>,
    schema: TrainingSchema,
}

impl ModelHandles {
    pub fn new(
        classifier: impl Classifier + 'static,
        scaler: impl Scaler + 'static,
        schema: TrainingSchema,
    ) -> Self {
        Self {
            classifier: Arc::new(classifier),
            scaler: Arc::new(scaler),
            schema,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn schema(&self) -> &TrainingSchema {
        &self.schema
    }
}

impl fmt::Debug for ModelHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandles")
            .field("classifier_width", &self.classifier.width())
            .field("scaler_width", &self.scaler.width())
            .field("schema_width", &self.schema.width())
            .finish()
    }
}

/// Initialize-once loader; later calls hand back the cached bundle.
pub struct ResourceLoader<S> {
    source: S,
    slot: Mutex<Option<Arc<ModelHandles>>>,
}

impl ResourceLoader<FileArtifactSource> {
    pub fn from_config(config: ArtifactConfig) -> Self {
        Self::new(FileArtifactSource::new(config))
    }
}

impl<S> ResourceLoader<S>
where
    S: ArtifactSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: Mutex::new(None),
        }
    }

    /// Load all artifacts on first use. Concurrent first callers wait on the same load;
    /// a failed load leaves the slot empty.
    pub fn initialize(&self) -> Result<Arc<ModelHandles>, ResourceError> {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handles) = slot.as_ref() {
            return Ok(Arc::clone(handles));
        }

        let handles = Arc::new(self.load()?);
        *slot = Some(Arc::clone(&handles));
        Ok(handles)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_initialized(&self) -> bool {
        self.slot
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or_else(|poisoned| poisoned.into_inner().is_some())
    }

    fn load(&self) -> Result<ModelHandles, ResourceError> {
        let schema: TrainingSchema = self.read_json(ArtifactKind::TrainingSchema)?;
        let scaler: ScalerArtifact = self.read_json(ArtifactKind::Scaler)?;
        let classifier: ClassifierArtifact = self.read_json(ArtifactKind::Classifier)?;

        scaler
            .validate()
            .map_err(|reason| self.unavailable(ArtifactKind::Scaler, reason))?;
        classifier
            .validate()
            .map_err(|reason| self.unavailable(ArtifactKind::Classifier, reason))?;

        for (artifact, found) in [
            (ArtifactKind::Scaler, scaler.width()),
            (ArtifactKind::Classifier, classifier.width()),
        ] {
            if found != schema.width() {
                return Err(ResourceError::WidthMismatch {
                    artifact,
                    expected: schema.width(),
                    found,
                });
            }
        }

        for raw in columns::SUPERSEDED {
            if schema.contains(raw) {
                warn!(column = raw, "training schema lists a superseded raw column");
            }
        }

        info!(
            features = schema.width(),
            schema = %self.source.location(ArtifactKind::TrainingSchema),
            "model artifacts loaded"
        );

        Ok(ModelHandles::new(classifier, scaler, schema))
    }

    fn read_json<T: DeserializeOwned>(&self, artifact: ArtifactKind) -> Result<T, ResourceError> {
        let bytes = self
            .source
            .read(artifact)
            .map_err(|err| self.unavailable(artifact, err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| self.unavailable(artifact, err.to_string()))
    }

    fn unavailable(&self, artifact: ArtifactKind, reason: String) -> ResourceError {
        ResourceError::Unavailable {
            artifact,
            location: self.source.location(artifact),
            reason,
        }
    }
}
