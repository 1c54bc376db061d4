//! Candidate arc construction.
//!
//! The arc set is every ordered pair of distinct participants minus the
//! pairs some participant has excluded. Exclusions are one-directional:
//! `A` excluding `B` removes `A -> B` only.

use crate::domain::model::{GiftArc, Participant};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Builds the permissible giver -> recipient arcs and shuffles them with `rng`.
///
/// Identities are expected to be unique. The shuffle does not change which
/// arcs exist, only the order the solver explores them in.
pub fn build_arcs<R: Rng + ?Sized>(participants: &[Participant], rng: &mut R) -> Vec<GiftArc> {
    let known: HashSet<&str> = participants.iter().map(|p| p.email.as_str()).collect();

    let excluded: HashSet<(&str, &str)> = participants
        .iter()
        .flat_map(|p| {
            p.exclusions
                .iter()
                .map(move |e| (p.email.as_str(), e.as_str()))
        })
        .collect();

    for (giver, recipient) in &excluded {
        if !known.contains(recipient) {
            tracing::debug!("Ignoring exclusion of unknown participant {} by {}", recipient, giver);
        }
    }

    let n = participants.len();
    let mut arcs = Vec::with_capacity(n.saturating_sub(1) * n);

    for (i, first) in participants.iter().enumerate() {
        for second in &participants[i + 1..] {
            let (a, b) = (first.email.as_str(), second.email.as_str());
            if a == b {
                continue;
            }
            if !excluded.contains(&(a, b)) {
                arcs.push(GiftArc::new(a, b));
            }
            if !excluded.contains(&(b, a)) {
                arcs.push(GiftArc::new(b, a));
            }
        }
    }

    arcs.shuffle(rng);

    tracing::debug!(
        "Built {} candidate arcs for {} participants ({} exclusions declared)",
        arcs.len(),
        n,
        excluded.len()
    );

    arcs
}

/// [`build_arcs`] with a fixed seed when given, otherwise fresh entropy.
pub fn build_arcs_seeded(participants: &[Participant], seed: Option<u64>) -> Vec<GiftArc> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    build_arcs(participants, &mut rng)
}
