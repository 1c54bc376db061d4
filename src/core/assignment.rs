//! Turns a candidate arc list into an assignment.
//!
//! One binary variable per arc, and for every identity two equalities:
//! its outgoing arcs sum to 1 and its incoming arcs sum to 1. Any point
//! satisfying these is a set of disjoint gift cycles covering everyone.

use crate::core::matching::has_perfect_matching;
use crate::core::model::{BinaryModel, VarId};
use crate::core::solver::{SolveStatus, Solver, SolverOptions};
use crate::domain::model::{Assignment, GiftArc};
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::validate_unique;
use std::collections::{HashMap, HashSet};

/// Values at or above this are read as a selected arc.
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// Solves for a giver -> recipient assignment over `arcs`.
///
/// Exploration follows the order of `arcs`, so a shuffled arc list yields
/// different assignments among the equally valid ones.
pub fn solve_assignment<S: AsRef<str>>(
    arcs: &[GiftArc],
    identities: &[S],
    options: SolverOptions,
) -> Result<Assignment> {
    if identities.len() < 2 {
        tracing::debug!("Need at least two participants, got {}", identities.len());
        return Err(SantaError::InfeasibleAssignment);
    }

    validate_unique("identities", identities.iter().map(|id| id.as_ref()))?;

    if !has_perfect_matching(arcs, identities) {
        tracing::debug!("No perfect matching over {} arcs, skipping search", arcs.len());
        return Err(SantaError::InfeasibleAssignment);
    }

    let (model, vars) = build_model(arcs, identities);
    tracing::debug!(
        "Solving model with {} variables and {} constraints",
        model.num_vars(),
        model.num_constraints()
    );

    let mut solver = Solver::new(options);
    let status = solver.solve(&model);
    let stats = solver.stats();
    tracing::debug!("Solver finished: {} nodes, {} backtracks", stats.nodes, stats.backtracks);

    match status {
        SolveStatus::Feasible(solution) => {
            let pairs = arcs
                .iter()
                .zip(&vars)
                .filter(|&(_, var)| {
                    var.is_some_and(|var| solution.value(var) >= SELECTION_THRESHOLD)
                })
                .map(|(arc, _)| arc.clone())
                .collect();
            Ok(Assignment::new(pairs))
        }
        SolveStatus::Infeasible => Err(SantaError::InfeasibleAssignment),
        SolveStatus::NodeLimit => {
            tracing::warn!("Solver stopped at its node limit before finding an assignment");
            Err(SantaError::InfeasibleAssignment)
        }
    }
}

/// Builds the degree-constrained model. `vars[i]` belongs to `arcs[i]`;
/// arcs touching an identity outside `identities` get no variable.
fn build_model<S: AsRef<str>>(
    arcs: &[GiftArc],
    identities: &[S],
) -> (BinaryModel, Vec<Option<VarId>>) {
    let known: HashSet<&str> = identities.iter().map(|id| id.as_ref()).collect();
    let mut model = BinaryModel::new();
    let mut outgoing: HashMap<&str, Vec<VarId>> = HashMap::new();
    let mut incoming: HashMap<&str, Vec<VarId>> = HashMap::new();

    let vars: Vec<Option<VarId>> = arcs
        .iter()
        .map(|arc| {
            if !known.contains(arc.giver.as_str()) || !known.contains(arc.recipient.as_str()) {
                tracing::debug!("Skipping arc {} to or from a non-participant", arc);
                return None;
            }
            let var = model.add_var(arc.to_string());
            outgoing.entry(arc.giver.as_str()).or_default().push(var);
            incoming.entry(arc.recipient.as_str()).or_default().push(var);
            Some(var)
        })
        .collect();

    for id in identities {
        let id = id.as_ref();
        model.add_equality(
            format!("out({})", id),
            outgoing.get(id).cloned().unwrap_or_default(),
            1,
        );
        model.add_equality(
            format!("in({})", id),
            incoming.get(id).cloned().unwrap_or_default(),
            1,
        );
    }

    (model, vars)
}
