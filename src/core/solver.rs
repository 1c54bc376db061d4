//! Backtracking solver for [`BinaryModel`].
//!
//! Search alternates between choosing a variable and propagating the
//! equality constraints it touches:
//! - a constraint already at its rhs forces its free variables to 0;
//! - a constraint that needs every free variable forces them to 1;
//! - a constraint over its rhs, or unable to reach it, is a conflict.
//!
//! The branching variable is the first free variable (in model order) of the
//! constraint with the fewest free variables. Each choice tries 1 before 0.
//! Assignments are recorded on a trail so backtracking undoes exactly the
//! work done since the choice point.

use crate::core::model::{BinaryModel, ConstraintId, VarId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverOptions {
    /// Upper bound on branching decisions. `None` searches to completion.
    pub max_nodes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    values: Vec<f64>,
}

impl Solution {
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveStatus {
    Feasible(Solution),
    Infeasible,
    NodeLimit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub nodes: u64,
    pub backtracks: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Solver {
    options: SolverOptions,
    stats: SolveStats,
}

/// Choice point on the decision stack.
#[derive(Debug)]
struct Frame {
    trail_len: usize,
    var: VarId,
    tried_zero: bool,
}

struct Search<'m> {
    model: &'m BinaryModel,
    values: Vec<Option<bool>>,
    ones: Vec<usize>,
    free: Vec<usize>,
    trail: Vec<VarId>,
    pending: Vec<ConstraintId>,
}

impl<'m> Search<'m> {
    fn new(model: &'m BinaryModel) -> Self {
        Self {
            model,
            values: vec![None; model.num_vars()],
            ones: vec![0; model.num_constraints()],
            free: model.constraints().iter().map(|c| c.vars().len()).collect(),
            trail: Vec::with_capacity(model.num_vars()),
            pending: (0..model.num_constraints()).map(ConstraintId).collect(),
        }
    }

    fn assign(&mut self, var: VarId, value: bool) {
        debug_assert!(self.values[var.index()].is_none());
        self.values[var.index()] = Some(value);
        self.trail.push(var);
        for &c in self.model.occurrences(var) {
            self.free[c.0] -= 1;
            if value {
                self.ones[c.0] += 1;
            }
            self.pending.push(c);
        }
    }

    fn undo_to(&mut self, trail_len: usize) {
        while self.trail.len() > trail_len {
            let Some(var) = self.trail.pop() else { break };
            let value = self.values[var.index()].take();
            for &c in self.model.occurrences(var) {
                self.free[c.0] += 1;
                if value == Some(true) {
                    self.ones[c.0] -= 1;
                }
            }
        }
        self.pending.clear();
    }

    /// Runs pending constraints to a fixpoint. Returns false on conflict.
    fn propagate(&mut self) -> bool {
        while let Some(c) = self.pending.pop() {
            let rhs = self.model.constraint(c).rhs();
            let (ones, free) = (self.ones[c.0], self.free[c.0]);

            if ones > rhs || ones + free < rhs {
                self.pending.clear();
                return false;
            }
            if free == 0 {
                continue;
            }

            let forced = if ones == rhs {
                false
            } else if ones + free == rhs {
                true
            } else {
                continue;
            };

            let model = self.model;
            for &var in model.constraint(c).vars() {
                if self.values[var.index()].is_none() {
                    self.assign(var, forced);
                }
            }
        }
        true
    }

    fn pick_branch_var(&self) -> Option<VarId> {
        let (best, _) = self
            .free
            .iter()
            .enumerate()
            .filter(|&(_, &free)| free > 0)
            .min_by_key(|&(index, &free)| (free, index))?;

        self.model.constraints()[best]
            .vars()
            .iter()
            .copied()
            .find(|var| self.values[var.index()].is_none())
    }

    fn solution(&self) -> Solution {
        Solution {
            values: self
                .values
                .iter()
                .map(|v| if *v == Some(true) { 1.0 } else { 0.0 })
                .collect(),
        }
    }
}

impl Solver {
    pub fn new(options: SolverOptions) -> Self {
        Self {
            options,
            stats: SolveStats::default(),
        }
    }

    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    pub fn solve(&mut self, model: &BinaryModel) -> SolveStatus {
        self.stats = SolveStats::default();
        let mut search = Search::new(model);

        if !search.propagate() {
            return SolveStatus::Infeasible;
        }

        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let Some(var) = search.pick_branch_var() else {
                tracing::debug!(
                    "Solver found a feasible point after {} nodes, {} backtracks",
                    self.stats.nodes,
                    self.stats.backtracks
                );
                return SolveStatus::Feasible(search.solution());
            };

            if self.limit_reached() {
                return SolveStatus::NodeLimit;
            }
            self.stats.nodes += 1;

            stack.push(Frame {
                trail_len: search.trail.len(),
                var,
                tried_zero: false,
            });
            search.assign(var, true);
            if search.propagate() {
                continue;
            }

            // Backtrack until some choice point still has its 0 branch open.
            loop {
                let Some(frame) = stack.last_mut() else {
                    tracing::debug!(
                        "Solver exhausted the search after {} nodes",
                        self.stats.nodes
                    );
                    return SolveStatus::Infeasible;
                };
                self.stats.backtracks += 1;
                search.undo_to(frame.trail_len);

                if frame.tried_zero {
                    stack.pop();
                    continue;
                }

                frame.tried_zero = true;
                let var = frame.var;
                search.assign(var, false);
                if search.propagate() {
                    break;
                }
            }
        }
    }

    fn limit_reached(&self) -> bool {
        self.options
            .max_nodes
            .is_some_and(|limit| self.stats.nodes >= limit)
    }
}
