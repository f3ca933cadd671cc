//! Recording models.

use chrono::{DateTime, Utc};

use crate::error::{ArmError, Result};

/// A recording that is still capturing steps.
///
/// Inputs and outputs are only ever appended as a pair, so both sequences
/// always have the same length.
#[derive(Debug, Clone)]
pub struct ActiveRecording {
    name: Option<String>,
    started_at: DateTime<Utc>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl ActiveRecording {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            started_at: Utc::now(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn push(&mut self, input: impl Into<String>, output: impl Into<String>) {
        self.inputs.push(input.into());
        self.outputs.push(output.into());
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Freezes the buffer under its final name.
    pub fn finalize(self, name: String) -> Recording {
        Recording {
            name,
            created_at: self.started_at,
            inputs: self.inputs,
            outputs: self.outputs,
        }
    }
}

/// A finalized, immutable capture of command/response pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    name: String,
    created_at: DateTime<Utc>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl Recording {
    /// Rebuilds a recording from stored steps (used when loading from disk).
    pub fn from_parts(
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        inputs: Vec<String>,
        outputs: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        if inputs.len() != outputs.len() {
            return Err(ArmError::Serialization {
                format: "recording".to_string(),
                message: format!(
                    "'{}' has {} inputs but {} outputs",
                    name,
                    inputs.len(),
                    outputs.len()
                ),
            });
        }
        Ok(Self {
            name,
            created_at,
            inputs,
            outputs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// `(input, output)` pairs in capture order.
    pub fn steps(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inputs
            .iter()
            .zip(self.outputs.iter())
            .map(|(input, output)| (input.as_str(), output.as_str()))
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
