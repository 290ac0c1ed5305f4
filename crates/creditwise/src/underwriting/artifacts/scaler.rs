use serde::{Deserialize, Serialize};

/// Raised when the aligned vector does not match the width the scaler was fitted on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scaler expects {expected} features, received {found}")]
pub struct ScalingError {
    pub expected: usize,
    pub found: usize,
}

/// Numeric normalization fitted at training time.
pub trait Scaler: Send + Sync {
    fn width(&self) -> usize;
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ScalingError>;
}

/// Standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler for StandardScaler {
    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ScalingError> {
        check_width(self.width(), features)?;
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| {
                // constant training columns are stored with a zero scale
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (value - mean) / scale
            })
            .collect())
    }
}

/// Range scaling: `x * scale + min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler for MinMaxScaler {
    fn width(&self) -> usize {
        self.min.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ScalingError> {
        check_width(self.width(), features)?;
        Ok(features
            .iter()
            .zip(self.min.iter().zip(&self.scale))
            .map(|(value, (min, scale))| value * scale + min)
            .collect())
    }
}

/// Serialized scaler as stored on disk, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl ScalerArtifact {
    /// Reject artifacts whose parameter vectors disagree in length or hold non-finite values.
    pub fn validate(&self) -> Result<(), String> {
        let (label, offsets, scales) = match self {
            ScalerArtifact::Standard(inner) => ("mean", &inner.mean, &inner.scale),
            ScalerArtifact::MinMax(inner) => ("min", &inner.min, &inner.scale),
        };

        if offsets.len() != scales.len() {
            return Err(format!(
                "{label} has {} entries but scale has {}",
                offsets.len(),
                scales.len()
            ));
        }
        if offsets.iter().chain(scales).any(|value| !value.is_finite()) {
            return Err("scaler parameters must be finite".to_string());
        }
        Ok(())
    }
}

impl Scaler for ScalerArtifact {
    fn width(&self) -> usize {
        match self {
            ScalerArtifact::Standard(inner) => inner.width(),
            ScalerArtifact::MinMax(inner) => inner.width(),
        }
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ScalingError> {
        match self {
            ScalerArtifact::Standard(inner) => inner.transform(features),
            ScalerArtifact::MinMax(inner) => inner.transform(features),
        }
    }
}

fn check_width(expected: usize, features: &[f64]) -> Result<(), ScalingError> {
    if features.len() == expected {
        Ok(())
    } else {
        Err(ScalingError {
            expected,
            found: features.len(),
        })
    }
}
