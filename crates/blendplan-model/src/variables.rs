use std::collections::HashMap;

use blendplan_solver::{LpProblem, VarId};

use crate::data::ProblemData;

/// Composite index of a decision variable
///
/// `blendstock`, `product`, and `spec` are positions in the corresponding
/// [`ProblemData`] tables; `period` runs over `0..num_periods`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKey {
    /// Quantity of a blendstock purchased
    Buy { blendstock: usize, period: usize },
    /// Quantity of a blendstock consumed into a product
    Blend { product: usize, blendstock: usize, period: usize },
    /// Inventory of a blendstock carried into a period
    Hold { blendstock: usize, period: usize },
    /// Total quantity of a product blended
    Produced { product: usize, period: usize },
    /// Total purchase spend
    PurchaseCost { period: usize },
    /// Quality contribution summed over blendstocks
    BlendedQuality { spec: usize, product: usize, period: usize },
}

/// Every decision variable of the model, one per [`VarKey`]
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    vars: HashMap<VarKey, VarId>,
}

impl VariableStore {
    /// Allocate all variables for `data` in `lp`, each non-negative and unbounded above
    pub fn allocate(lp: &mut LpProblem, data: &ProblemData) -> Self {
        let mut store = Self::default();
        let blendstocks = data.blendstocks();
        let products = data.products();

        for i in data.periods() {
            for (j, b) in blendstocks.iter().enumerate() {
                store.register(lp, VarKey::Buy { blendstock: j, period: i }, format!("buy[{}][{}]", b.name, i));
                store.register(lp, VarKey::Hold { blendstock: j, period: i }, format!("hold[{}][{}]", b.name, i));
            }

            for (k, p) in products.iter().enumerate() {
                store.register(
                    lp,
                    VarKey::Produced { product: k, period: i },
                    format!("produced[{}][{}]", p.name, i),
                );
                for (j, b) in blendstocks.iter().enumerate() {
                    store.register(
                        lp,
                        VarKey::Blend { product: k, blendstock: j, period: i },
                        format!("blend[{}][{}][{}]", p.name, b.name, i),
                    );
                }
                for (l, s) in data.specs().iter().enumerate() {
                    store.register(
                        lp,
                        VarKey::BlendedQuality { spec: l, product: k, period: i },
                        format!("quality[{}][{}][{}]", s.name, p.name, i),
                    );
                }
            }

            store.register(lp, VarKey::PurchaseCost { period: i }, format!("purchase_cost[{}]", i));
        }

        store
    }

    fn register(&mut self, lp: &mut LpProblem, key: VarKey, name: String) {
        let id = lp.add_variable(name, 0.0, f64::INFINITY);
        self.vars.insert(key, id);
    }

    pub fn get(&self, key: VarKey) -> Option<VarId> {
        self.vars.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Look up a variable that [`allocate`](Self::allocate) created; panics on an out-of-range index
    pub fn var(&self, key: VarKey) -> VarId {
        self.vars[&key]
    }

    pub fn buy(&self, blendstock: usize, period: usize) -> VarId {
        self.var(VarKey::Buy { blendstock, period })
    }

    pub fn blend(&self, product: usize, blendstock: usize, period: usize) -> VarId {
        self.var(VarKey::Blend { product, blendstock, period })
    }

    pub fn hold(&self, blendstock: usize, period: usize) -> VarId {
        self.var(VarKey::Hold { blendstock, period })
    }

    pub fn produced(&self, product: usize, period: usize) -> VarId {
        self.var(VarKey::Produced { product, period })
    }

    pub fn purchase_cost(&self, period: usize) -> VarId {
        self.var(VarKey::PurchaseCost { period })
    }

    pub fn blended_quality(&self, spec: usize, product: usize, period: usize) -> VarId {
        self.var(VarKey::BlendedQuality { spec, product, period })
    }
}
