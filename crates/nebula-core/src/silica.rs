//! Silica (SiO2) mass-fraction buckets, after the igneous-rock naming scheme.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SilicaClass {
    NonSilicous,
    Ultramafic,
    Mafic,
    Intermediate,
    IntermediateFelsic,
    Felsic,
}

impl SilicaClass {
    /// Bucket a silica mass fraction. Lower bounds are inclusive.
    pub fn classify(fraction: f64) -> Self {
        if fraction <= 0.0 {
            SilicaClass::NonSilicous
        } else if fraction < 0.45 {
            SilicaClass::Ultramafic
        } else if fraction < 0.52 {
            SilicaClass::Mafic
        } else if fraction < 0.63 {
            SilicaClass::Intermediate
        } else if fraction < 0.69 {
            SilicaClass::IntermediateFelsic
        } else {
            SilicaClass::Felsic
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SilicaClass::NonSilicous => "Non-silicous",
            SilicaClass::Ultramafic => "Ultramafic",
            SilicaClass::Mafic => "Mafic",
            SilicaClass::Intermediate => "Intermediate",
            SilicaClass::IntermediateFelsic => "Intermediate-felsic",
            SilicaClass::Felsic => "Felsic",
        }
    }
}

impl fmt::Display for SilicaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
