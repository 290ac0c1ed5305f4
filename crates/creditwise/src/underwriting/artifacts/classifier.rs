use serde::{Deserialize, Serialize};

/// Probability above which the positive (approved) class is predicted.
pub const DECISION_BOUNDARY: f64 = 0.5;

/// Failure while evaluating the classifier on a scaled vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("classifier expects {expected} features, received {found}")]
    WidthMismatch { expected: usize, found: usize },
    #[error("classifier produced a non-finite probability ({0})")]
    NonFiniteProbability(f64),
    #[error("tree {tree} is malformed at node {node}")]
    MalformedTree { tree: usize, node: usize },
    #[error("ensemble contains no trees")]
    EmptyEnsemble,
}

/// Binary class predicted by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassLabel {
    Negative,
    Positive,
}

impl ClassLabel {
    pub const fn value(self) -> u8 {
        match self {
            ClassLabel::Negative => 0,
            ClassLabel::Positive => 1,
        }
    }
}

/// Trained binary decision model.
pub trait Classifier: Send + Sync {
    fn width(&self) -> usize;

    /// Probability of the positive class.
    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError>;

    fn predict(&self, features: &[f64]) -> Result<ClassLabel, ModelError> {
        let probability = self.predict_probability(features)?;
        Ok(if probability > DECISION_BOUNDARY {
            ClassLabel::Positive
        } else {
            ClassLabel::Negative
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn decision_function(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_width(self.coefficients.len(), features)?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(weight, value)| weight * value)
            .sum();
        Ok(dot + self.intercept)
    }
}

impl Classifier for LogisticRegression {
    fn width(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        let score = self.decision_function(features)?;
        finite(sigmoid(score))
    }
}

/// One fitted tree in flattened array form.
///
/// Leaves carry `-1` in both child arrays; `value` holds the positive-class fraction of the
/// training samples that reached each node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

const LEAF: i64 = -1;

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.value.len()
    }

    fn is_well_formed(&self) -> bool {
        let nodes = self.node_count();
        nodes > 0
            && self.children_left.len() == nodes
            && self.children_right.len() == nodes
            && self.feature.len() == nodes
            && self.threshold.len() == nodes
    }

    fn leaf_value(&self, tree: usize, features: &[f64]) -> Result<f64, ModelError> {
        let malformed = |node: usize| ModelError::MalformedTree { tree, node };
        if !self.is_well_formed() {
            return Err(malformed(0));
        }

        let mut node = 0usize;
        // a well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..self.node_count() {
            let left = self.children_left[node];
            if left == LEAF {
                return Ok(self.value[node]);
            }

            let feature = usize::try_from(self.feature[node])
                .ok()
                .and_then(|index| features.get(index))
                .ok_or_else(|| malformed(node))?;
            let next = if *feature <= self.threshold[node] {
                left
            } else {
                self.children_right[node]
            };
            node = usize::try_from(next)
                .ok()
                .filter(|next| *next < self.node_count())
                .ok_or_else(|| malformed(node))?;
        }

        Err(malformed(node))
    }
}

/// Bagged ensemble; the probability is the mean of the trees' leaf values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl Classifier for RandomForest {
    fn width(&self) -> usize {
        self.n_features
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_width(self.n_features, features)?;
        if self.trees.is_empty() {
            return Err(ModelError::EmptyEnsemble);
        }

        let mut total = 0.0;
        for (index, tree) in self.trees.iter().enumerate() {
            total += tree.leaf_value(index, features)?;
        }
        finite(total / self.trees.len() as f64)
    }
}

/// Serialized classifier as stored on disk, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
}

impl ClassifierArtifact {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ClassifierArtifact::LogisticRegression(model) => {
                if model.coefficients.is_empty() {
                    return Err("logistic regression has no coefficients".to_string());
                }
                let all_finite = model
                    .coefficients
                    .iter()
                    .chain(std::iter::once(&model.intercept))
                    .all(|value| value.is_finite());
                if !all_finite {
                    return Err("logistic regression weights must be finite".to_string());
                }
            }
            ClassifierArtifact::RandomForest(model) => {
                if model.trees.is_empty() {
                    return Err("random forest has no trees".to_string());
                }
                if let Some(index) = model.trees.iter().position(|tree| !tree.is_well_formed()) {
                    return Err(format!("random forest tree {index} has mismatched arrays"));
                }
            }
        }
        Ok(())
    }
}

impl Classifier for ClassifierArtifact {
    fn width(&self) -> usize {
        match self {
            ClassifierArtifact::LogisticRegression(model) => model.width(),
            ClassifierArtifact::RandomForest(model) => model.width(),
        }
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        match self {
            ClassifierArtifact::LogisticRegression(model) => model.predict_probability(features),
            ClassifierArtifact::RandomForest(model) => model.predict_probability(features),
        }
    }
}

fn sigmoid(score: f64) -> f64 {
    if score >= 0.0 {
        1.0 / (1.0 + (-score).exp())
    } else {
        let exp = score.exp();
        exp / (1.0 + exp)
    }
}

fn finite(probability: f64) -> Result<f64, ModelError> {
    if probability.is_finite() {
        Ok(probability.clamp(0.0, 1.0))
    } else {
        Err(ModelError::NonFiniteProbability(probability))
    }
}

fn check_width(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() == expected {
        Ok(())
    } else {
        Err(ModelError::WidthMismatch {
            expected,
            found: features.len(),
        })
    }
}
