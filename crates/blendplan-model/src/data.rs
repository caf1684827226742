use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Opening stock assumed for a blendstock with no opening inventory row
pub const DEFAULT_OPENING_INVENTORY: f64 = 1.0;

/// One quality dimension shared by blendstocks and products (e.g. RON)
#[derive(Debug, Clone, PartialEq)]
pub struct QualitySpec {
    pub name: String,
}

/// A raw input material
#[derive(Debug, Clone, PartialEq)]
pub struct Blendstock {
    pub name: String,
    /// Quality attribute per spec
    pub quality: Vec<f64>,
    /// Purchase cost per period
    pub cost: Vec<f64>,
    /// Stock on hand at the start of period 0
    pub opening_inventory: f64,
}

/// A deliverable blend with its allowed quality band per spec
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub quality_min: Vec<f64>,
    pub quality_max: Vec<f64>,
}

/// Aggregate inventory limits across all blendstocks in a period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankageLimits {
    pub min: f64,
    pub max: f64,
}

/// Validated problem data: every table agrees on specs, periods, and names
#[derive(Debug, Clone)]
pub struct ProblemData {
    specs: Vec<QualitySpec>,
    blendstocks: Vec<Blendstock>,
    products: Vec<Product>,
    periods: usize,
    demand: f64,
    tankage: TankageLimits,
}

impl ProblemData {
    pub fn new(
        specs: Vec<QualitySpec>,
        blendstocks: Vec<Blendstock>,
        products: Vec<Product>,
        demand: f64,
        tankage: TankageLimits,
    ) -> Result<Self, InputError> {
        if specs.is_empty() {
            return Err(InputError::NoSpecs);
        }
        if blendstocks.is_empty() {
            return Err(InputError::EmptyTable("quality"));
        }
        if products.is_empty() {
            return Err(InputError::EmptyTable("quality_min"));
        }

        check_unique("specs", specs.iter().map(|s| s.name.as_str()))?;
        check_unique("quality", blendstocks.iter().map(|b| b.name.as_str()))?;
        check_unique("quality_min", products.iter().map(|p| p.name.as_str()))?;

        let periods = blendstocks[0].cost.len();
        if periods == 0 {
            return Err(InputError::RowWidth {
                table: "cost",
                row: blendstocks[0].name.clone(),
                expected: 1,
                found: 0,
            });
        }

        for b in &blendstocks {
            check_row("quality", &b.name, &b.quality, specs.len())?;
            check_row("cost", &b.name, &b.cost, periods)?;
            if !b.opening_inventory.is_finite() || b.opening_inventory < 0.0 {
                return Err(InputError::InvalidScalar {
                    field: "opening_inventory",
                    reason: format!("{} must be a non-negative number, got {}", b.name, b.opening_inventory),
                });
            }
        }
        for p in &products {
            check_row("quality_min", &p.name, &p.quality_min, specs.len())?;
            check_row("quality_max", &p.name, &p.quality_max, specs.len())?;
        }

        if !demand.is_finite() || demand < 0.0 {
            return Err(InputError::InvalidScalar {
                field: "demand",
                reason: format!("must be a non-negative number, got {}", demand),
            });
        }
        if tankage.min.is_nan() || tankage.max.is_nan() || tankage.min < 0.0 || tankage.min > tankage.max {
            return Err(InputError::InvalidScalar {
                field: "tankage",
                reason: format!("need 0 <= min <= max, got [{}, {}]", tankage.min, tankage.max),
            });
        }

        Ok(Self {
            specs,
            blendstocks,
            products,
            periods,
            demand,
            tankage,
        })
    }

    pub fn specs(&self) -> &[QualitySpec] {
        &self.specs
    }

    pub fn blendstocks(&self) -> &[Blendstock] {
        &self.blendstocks
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn num_periods(&self) -> usize {
        self.periods
    }

    pub fn periods(&self) -> std::ops::Range<usize> {
        0..self.periods
    }

    pub fn last_period(&self) -> usize {
        self.periods - 1
    }

    /// Minimum quantity of each product required in each period
    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn tankage(&self) -> TankageLimits {
        self.tankage
    }
}

fn check_unique<'a>(table: &'static str, names: impl Iterator<Item = &'a str>) -> Result<(), InputError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(InputError::DuplicateName {
                table,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn check_row(table: &'static str, row: &str, values: &[f64], expected: usize) -> Result<(), InputError> {
    if values.len() != expected {
        return Err(InputError::RowWidth {
            table,
            row: row.to_string(),
            expected,
            found: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(InputError::NonFinite {
            table,
            row: row.to_string(),
        });
    }
    Ok(())
}
