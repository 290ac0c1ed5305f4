use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::super::encoding::FeatureVector;

/// Defects that make a column list unusable as a training schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("training schema lists no columns")]
    Empty,
    #[error("training schema column {position} has an empty name")]
    BlankColumn { position: usize },
    #[error("training schema lists '{column}' more than once")]
    DuplicateColumn { column: String },
}

/// Ordered feature names the classifier was trained on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSchema {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl TrainingSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if column.trim().is_empty() {
                return Err(SchemaError::BlankColumn { position });
            }
            if positions.insert(column.clone(), position).is_some() {
                return Err(SchemaError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }

        Ok(Self { columns, positions })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Project `features` onto the schema: schema order, zero for missing columns,
    /// and anything the schema does not list is discarded.
    pub fn reindex(&self, features: &FeatureVector) -> AlignedFeatures<'_> {
        let mut values = vec![0.0; self.columns.len()];
        for (name, value) in features.iter() {
            if let Some(position) = self.position(name) {
                values[position] = value;
            }
        }
        AlignedFeatures {
            schema: self,
            values,
        }
    }
}

impl Serialize for TrainingSchema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.columns.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TrainingSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let columns = Vec::<String>::deserialize(deserializer)?;
        TrainingSchema::new(columns).map_err(serde::de::Error::custom)
    }
}

/// Fixed-width feature buffer indexed by schema position.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFeatures<'a> {
    schema: &'a TrainingSchema,
    values: Vec<f64>,
}

impl<'a> AlignedFeatures<'a> {
    pub fn schema(&self) -> &'a TrainingSchema {
        self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema
            .position(column)
            .map(|position| self.values[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + '_ {
        self.schema
            .columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}
