//! NetCDF structure inspection
//!
//! Collects the dimensions and variables of an FVCOM output file so callers
//! can see what is available before choosing a variable list and clip spec.

use crate::errors::Result;
use netcdf::{AttributeValue, File};
use std::path::Path;

/// Information about a dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionInfo {
    pub name: String,
    pub length: usize,
    pub is_unlimited: bool,
}

/// A variable and the dimensions it is declared over, in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: String,
    pub dimensions: Vec<String>,
    pub shape: Vec<usize>,
    pub long_name: Option<String>,
    pub units: Option<String>,
}

/// Dimensions and variables of a file, each sorted by name
#[derive(Debug, Clone, Default)]
pub struct DatasetSummary {
    pub dimensions: Vec<DimensionInfo>,
    pub variables: Vec<VariableInfo>,
}

impl DatasetSummary {
    pub fn dimension(&self, name: &str) -> Option<&DimensionInfo> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&VariableInfo> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Lists all variables and dimensions in a clean, organized format.
    pub fn print(&self) {
        println!("\n Dimensions");
        println!("==============");

        if self.dimensions.is_empty() {
            println!("   (No dimensions found)");
        }
        for dim in &self.dimensions {
            let length_info = if dim.is_unlimited {
                format!("{} (unlimited)", dim.length)
            } else {
                dim.length.to_string()
            };
            println!("    {} = {}", dim.name, length_info);
        }

        println!("\n Variables");
        println!("=============");

        if self.variables.is_empty() {
            println!("   (No variables found)");
        }
        for var in &self.variables {
            if var.dimensions.is_empty() {
                println!("    {}: scalar", var.name);
            } else {
                let shape: Vec<String> = var.shape.iter().map(|s| s.to_string()).collect();
                println!(
                    "    {}: [{}] = ({})",
                    var.name,
                    var.dimensions.join(", "),
                    shape.join(" × ")
                );
            }

            let key_attrs: Vec<String> = [("long_name", &var.long_name), ("units", &var.units)]
                .into_iter()
                .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}: {}", key, v)))
                .collect();
            if !key_attrs.is_empty() {
                println!("      └─ {}", key_attrs.join(", "));
            }
        }

        println!("\n💡 Tip: Use --var <name> --clip <dimension>=<start:end> to extract a subset");
    }
}

/// Collects the dimensions and variables of an open file.
pub fn inspect(file: &File) -> DatasetSummary {
    let mut dimensions: Vec<DimensionInfo> = file
        .dimensions()
        .map(|d| DimensionInfo {
            name: d.name().to_string(),
            length: d.len(),
            is_unlimited: d.is_unlimited(),
        })
        .collect();
    dimensions.sort_by(|a, b| a.name.cmp(&b.name));

    let mut variables: Vec<VariableInfo> = file
        .variables()
        .map(|var| VariableInfo {
            name: var.name().to_string(),
            dimensions: var.dimensions().iter().map(|d| d.name().to_string()).collect(),
            shape: var.dimensions().iter().map(|d| d.len()).collect(),
            long_name: string_attribute(&var, "long_name"),
            units: string_attribute(&var, "units"),
        })
        .collect();
    variables.sort_by(|a, b| a.name.cmp(&b.name));

    DatasetSummary {
        dimensions,
        variables,
    }
}

/// Opens `path`, inspects it and closes it again.
pub fn inspect_path<P: AsRef<Path>>(path: P) -> Result<DatasetSummary> {
    let file = netcdf::open(path)?;
    Ok(inspect(&file))
}

fn string_attribute(var: &netcdf::Variable, name: &str) -> Option<String> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
