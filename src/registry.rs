use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::ProcessError;

/// Code of the "Mean Above Ground Biomass" product, reported with its regional total.
pub const MEAN_BIOMASS: &str = "MU";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Units {
    #[serde(rename = "Mg ha-1")]
    Biomass,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "")]
    Unitless,
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Biomass => write!(f, "Mg ha-1"),
            Units::Percent => write!(f, "%"),
            Units::Unitless => Ok(()),
        }
    }
}

/// One entry of the GEDI L4B variable table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Variable {
    pub code: &'static str,
    pub readable_name: &'static str,
    pub sentinel: f64,
    pub units: Units,
}

impl Variable {
    const fn new(code: &'static str, readable_name: &'static str, sentinel: f64, units: Units) -> Self {
        Self {
            code,
            readable_name,
            sentinel,
            units,
        }
    }

    pub fn is_mean_biomass(&self) -> bool {
        self.code == MEAN_BIOMASS
    }
}

// Sentinels differ per product: 0 and 255 are valid values elsewhere.
const GEDI_L4B_VARIABLES: [Variable; 10] = [
    Variable::new("MU", "Mean", -9999.0, Units::Biomass),
    Variable::new("V1", "Variance component 1", -9999.0, Units::Unitless),
    Variable::new("V2", "Variance component 2", -9999.0, Units::Unitless),
    Variable::new("SE", "Standard Error", -9999.0, Units::Biomass),
    Variable::new("PE", "Percentage Std Error", 255.0, Units::Percent),
    Variable::new("NC", "Number of Clusters", 0.0, Units::Unitless),
    Variable::new("NS", "Number of Samples", 0.0, Units::Unitless),
    Variable::new("QF", "Quality", 0.0, Units::Unitless),
    Variable::new("PS", "Predicted Stratum", 0.0, Units::Unitless),
    Variable::new("MI", "Mode of Interference", 0.0, Units::Unitless),
];

/// Read-only lookup from variable code to its name and "no data" sentinel.
///
/// Built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    variables: HashMap<&'static str, Variable>,
}

impl VariableRegistry {
    pub fn gedi_l4b() -> Self {
        let variables = GEDI_L4B_VARIABLES.iter().map(|v| (v.code, *v)).collect();
        Self { variables }
    }

    pub fn resolve(&self, code: &str) -> Result<Variable, ProcessError> {
        self.variables
            .get(code)
            .copied()
            .ok_or_else(|| ProcessError::UnknownVariableCode {
                code: code.to_string(),
            })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.variables.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl Default for VariableRegistry {
    fn default() -> Self {
        Self::gedi_l4b()
    }
}
