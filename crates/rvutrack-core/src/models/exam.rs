use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A kind of exam and the RVUs credited for reading one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamType {
    pub name: String,
    #[serde(rename = "rvu")]
    pub units_per_exam: f64,
}

impl ExamType {
    pub fn new(name: impl Into<String>, units_per_exam: f64) -> Self {
        Self {
            name: name.into(),
            units_per_exam,
        }
    }

    /// RVU value as shown in the exam table.
    pub fn display_units(&self) -> String {
        format!("{:.2}", self.units_per_exam)
    }
}

/// Ordered list of exam types. The position of an entry is both its display
/// order and the index its count field is bound to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExamCatalog {
    exams: Vec<ExamType>,
}

impl ExamCatalog {
    /// Build a catalog, rejecting empty lists and non-positive unit values.
    pub fn new(exams: Vec<ExamType>) -> Result<Self, ConfigError> {
        if exams.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for exam in &exams {
            if exam.name.trim().is_empty() {
                return Err(ConfigError::UnnamedExam);
            }
            if !exam.units_per_exam.is_finite() || exam.units_per_exam <= 0.0 {
                return Err(ConfigError::InvalidUnits {
                    exam: exam.name.clone(),
                    units: exam.units_per_exam,
                });
            }
        }
        Ok(Self { exams })
    }

    pub fn exams(&self) -> &[ExamType] {
        &self.exams
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExamType> {
        self.exams.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExamType> {
        self.exams.iter()
    }
}

impl Default for ExamCatalog {
    fn default() -> Self {
        Self {
            exams: vec![
                ExamType::new("MRI Abdomen/Pelvis (wow)", 2.21),
                ExamType::new("CT Abdomen/Pelvis (w)", 1.82),
                ExamType::new("Ultrasound (US)", 0.80),
                ExamType::new("X\u{2011}ray (per view)", 0.18),
            ],
        }
    }
}

impl<'a> IntoIterator for &'a ExamCatalog {
    type Item = &'a ExamType;
    type IntoIter = std::slice::Iter<'a, ExamType>;

    fn into_iter(self) -> Self::IntoIter {
        self.exams.iter()
    }
}

impl<'de> Deserialize<'de> for ExamCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let exams = Vec::<ExamType>::deserialize(deserializer)?;
        ExamCatalog::new(exams).map_err(serde::de::Error::custom)
    }
}
