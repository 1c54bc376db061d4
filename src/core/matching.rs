//! Bipartite perfect-matching check used as a presolve for the assignment.
//!
//! Every identity appears once on the giver side and once on the recipient
//! side; each arc is an edge between the two. A valid assignment exists
//! exactly when this graph has a perfect matching.

use crate::domain::model::GiftArc;
use std::collections::HashMap;

/// Returns true when every identity can be matched to a distinct recipient
/// along the given arcs.
pub fn has_perfect_matching<S: AsRef<str>>(arcs: &[GiftArc], identities: &[S]) -> bool {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for id in identities {
        let next = index.len();
        index.entry(id.as_ref()).or_insert(next);
    }
    let n = index.len();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for arc in arcs {
        if let (Some(&g), Some(&r)) = (index.get(arc.giver.as_str()), index.get(arc.recipient.as_str())) {
            adjacency[g].push(r);
        }
    }

    let mut matched_giver: Vec<Option<usize>> = vec![None; n];
    for giver in 0..n {
        let mut visited = vec![false; n];
        if !augment(giver, &adjacency, &mut matched_giver, &mut visited) {
            return false;
        }
    }
    true
}

/// Kuhn's augmenting path step from `giver`.
fn augment(
    giver: usize,
    adjacency: &[Vec<usize>],
    matched_giver: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &recipient in &adjacency[giver] {
        if visited[recipient] {
            continue;
        }
        visited[recipient] = true;

        let free_or_rematched = match matched_giver[recipient] {
            None => true,
            Some(other) => augment(other, adjacency, matched_giver, visited),
        };
        if free_or_rematched {
            matched_giver[recipient] = Some(giver);
            return true;
        }
    }
    false
}
