use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{Blendstock, DEFAULT_OPENING_INVENTORY, ProblemData, Product, QualitySpec, TankageLimits};
use crate::error::InputError;

/// A named row of numbers, e.g. a blendstock and its quality per spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub name: String,
    pub values: Vec<f64>,
}

impl TableRow {
    pub fn new(name: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub name: String,
    pub quantity: f64,
}

/// Planning input as it arrives: independent tables keyed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTables {
    pub specs: Vec<String>,
    /// Blendstock quality per spec
    pub quality: Vec<TableRow>,
    /// Blendstock cost per period
    pub cost: Vec<TableRow>,
    /// Product minimum quality ratio per spec
    pub quality_min: Vec<TableRow>,
    /// Product maximum quality ratio per spec
    pub quality_max: Vec<TableRow>,
    #[serde(default)]
    pub opening_inventory: Vec<InventoryRow>,
    pub demand: f64,
    pub tankage: TankageLimits,
}

impl PlanTables {
    pub fn from_json(source: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Join the tables on their name columns and validate the result
    pub fn build(&self) -> Result<ProblemData, InputError> {
        if self.quality.is_empty() {
            return Err(InputError::EmptyTable("quality"));
        }
        if self.cost.is_empty() {
            return Err(InputError::EmptyTable("cost"));
        }
        if self.quality_min.is_empty() {
            return Err(InputError::EmptyTable("quality_min"));
        }
        if self.quality_max.is_empty() {
            return Err(InputError::EmptyTable("quality_max"));
        }

        let cost = index_rows("cost", &self.cost)?;
        let max = index_rows("quality_max", &self.quality_max)?;
        same_names("cost", "quality", &self.quality, &cost)?;
        same_names("quality_max", "quality_min", &self.quality_min, &max)?;

        let mut opening = HashMap::new();
        for row in &self.opening_inventory {
            if !self.quality.iter().any(|q| q.name == row.name) {
                return Err(InputError::UnknownName {
                    table: "opening_inventory",
                    reference: "quality",
                    name: row.name.clone(),
                });
            }
            if opening.insert(row.name.as_str(), row.quantity).is_some() {
                return Err(InputError::DuplicateName {
                    table: "opening_inventory",
                    name: row.name.clone(),
                });
            }
        }

        let specs = self
            .specs
            .iter()
            .map(|name| QualitySpec { name: name.clone() })
            .collect();

        let blendstocks = self
            .quality
            .iter()
            .map(|row| Blendstock {
                name: row.name.clone(),
                quality: row.values.clone(),
                cost: cost[row.name.as_str()].values.clone(),
                opening_inventory: opening
                    .get(row.name.as_str())
                    .copied()
                    .unwrap_or(DEFAULT_OPENING_INVENTORY),
            })
            .collect();

        let products = self
            .quality_min
            .iter()
            .map(|row| Product {
                name: row.name.clone(),
                quality_min: row.values.clone(),
                quality_max: max[row.name.as_str()].values.clone(),
            })
            .collect();

        ProblemData::new(specs, blendstocks, products, self.demand, self.tankage)
    }
}

fn index_rows<'a>(table: &'static str, rows: &'a [TableRow]) -> Result<HashMap<&'a str, &'a TableRow>, InputError> {
    let mut index = HashMap::new();
    for row in rows {
        if index.insert(row.name.as_str(), row).is_some() {
            return Err(InputError::DuplicateName {
                table,
                name: row.name.clone(),
            });
        }
    }
    Ok(index)
}

/// `table` must name exactly the rows of `reference`
fn same_names(
    table: &'static str,
    reference: &'static str,
    reference_rows: &[TableRow],
    index: &HashMap<&str, &TableRow>,
) -> Result<(), InputError> {
    let expected: HashSet<&str> = reference_rows.iter().map(|r| r.name.as_str()).collect();

    if let Some(row) = reference_rows.iter().find(|r| !index.contains_key(r.name.as_str())) {
        return Err(InputError::MissingName {
            table,
            name: row.name.clone(),
        });
    }
    if let Some(name) = index.keys().find(|name| !expected.contains(*name)) {
        return Err(InputError::UnknownName {
            table,
            reference,
            name: name.to_string(),
        });
    }
    Ok(())
}
