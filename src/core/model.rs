//! A small 0/1 feasibility model: binary variables and linear equality
//! constraints with unit coefficients (`sum(vars) == rhs`). There is no
//! objective; any satisfying assignment is a solution.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

#[derive(Debug, Clone)]
pub struct Equality {
    pub(crate) label: String,
    pub(crate) vars: Vec<VarId>,
    pub(crate) rhs: usize,
}

impl Equality {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vars(&self) -> &[VarId] {
        &self.vars
    }

    pub fn rhs(&self) -> usize {
        self.rhs
    }
}

impl fmt::Display for Equality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: sum of {} vars == {}", self.label, self.vars.len(), self.rhs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BinaryModel {
    labels: Vec<String>,
    constraints: Vec<Equality>,
    /// For each variable, the constraints it appears in.
    occurrences: Vec<Vec<ConstraintId>>,
}

impl BinaryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_var(&mut self, label: impl Into<String>) -> VarId {
        let id = VarId(self.labels.len());
        self.labels.push(label.into());
        self.occurrences.push(Vec::new());
        id
    }

    /// Adds `sum(vars) == rhs`. Repeated variables count once.
    ///
    /// Panics if a variable does not belong to this model.
    pub fn add_equality(
        &mut self,
        label: impl Into<String>,
        vars: impl IntoIterator<Item = VarId>,
        rhs: usize,
    ) -> ConstraintId {
        let id = ConstraintId(self.constraints.len());

        let mut unique: Vec<VarId> = Vec::new();
        for var in vars {
            assert!(
                var.0 < self.labels.len(),
                "variable {} is not part of this model",
                var.0
            );
            if !unique.contains(&var) {
                unique.push(var);
                self.occurrences[var.0].push(id);
            }
        }

        self.constraints.push(Equality {
            label: label.into(),
            vars: unique,
            rhs,
        });
        id
    }

    pub fn num_vars(&self) -> usize {
        self.labels.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn var_label(&self, var: VarId) -> &str {
        &self.labels[var.0]
    }

    pub fn constraints(&self) -> &[Equality] {
        &self.constraints
    }

    pub fn constraint(&self, id: ConstraintId) -> &Equality {
        &self.constraints[id.0]
    }

    pub(crate) fn occurrences(&self, var: VarId) -> &[ConstraintId] {
        &self.occurrences[var.0]
    }
}
