use crate::utils::error::{Result, SantaError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A person taking part in the exchange. `email` is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
    /// Identities this participant must not give to.
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            exclusions: Vec::new(),
        }
    }

    pub fn excluding<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(emails.into_iter().map(Into::into));
        self
    }

    pub fn excludes(&self, email: &str) -> bool {
        self.exclusions.iter().any(|e| e == email)
    }
}

/// Directed candidate pairing: `giver` buys for `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GiftArc {
    pub giver: String,
    pub recipient: String,
}

impl GiftArc {
    pub fn new(giver: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            giver: giver.into(),
            recipient: recipient.into(),
        }
    }
}

impl<G: Into<String>, R: Into<String>> From<(G, R)> for GiftArc {
    fn from((giver, recipient): (G, R)) -> Self {
        Self::new(giver, recipient)
    }
}

impl fmt::Display for GiftArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.giver, self.recipient)
    }
}

/// The drawn matching. Every participant gives exactly once and receives exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pairs: Vec<GiftArc>,
}

impl Assignment {
    pub fn new(pairs: Vec<GiftArc>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[GiftArc] {
        &self.pairs
    }

    pub fn iter(&self) -> impl Iterator<Item = &GiftArc> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn recipient_of(&self, giver: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|arc| arc.giver == giver)
            .map(|arc| arc.recipient.as_str())
    }

    pub fn giver_of(&self, recipient: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|arc| arc.recipient == recipient)
            .map(|arc| arc.giver.as_str())
    }

    /// Pairs sorted by giver, for comparing draws independent of solver output order.
    pub fn canonical(&self) -> Vec<GiftArc> {
        let mut pairs = self.pairs.clone();
        pairs.sort();
        pairs
    }

    /// Splits the assignment into its disjoint gift cycles.
    ///
    /// Each cycle starts at the smallest identity it contains and follows
    /// giver -> recipient links. Cycles are ordered by that starting identity.
    /// Links that do not close into a cycle (only possible for an assignment
    /// that fails [`Assignment::verify`]) are left out.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let next: HashMap<&str, &str> = self
            .pairs
            .iter()
            .map(|arc| (arc.giver.as_str(), arc.recipient.as_str()))
            .collect();

        let mut starts: Vec<&str> = next.keys().copied().collect();
        starts.sort_unstable();

        let mut visited: HashSet<&str> = HashSet::new();
        let mut cycles = Vec::new();

        for start in starts {
            if visited.contains(start) {
                continue;
            }

            let mut cycle = Vec::new();
            let mut seen_here = HashSet::new();
            let mut current = start;
            let closed = loop {
                if !seen_here.insert(current) {
                    break current == start;
                }
                cycle.push(current);
                match next.get(current) {
                    Some(&following) => current = following,
                    None => break false,
                }
            };

            visited.extend(cycle.iter().copied());
            if closed {
                cycles.push(cycle.into_iter().map(str::to_string).collect());
            }
        }

        cycles
    }

    /// Checks that the assignment covers `participants` exactly once on each
    /// side, never pairs anyone with themselves and respects every exclusion.
    pub fn verify(&self, participants: &[Participant]) -> Result<()> {
        let violation = |message: String| SantaError::AssignmentInvariantError { message };

        if self.pairs.len() != participants.len() {
            return Err(violation(format!(
                "expected {} pairs, found {}",
                participants.len(),
                self.pairs.len()
            )));
        }

        let by_email: HashMap<&str, &Participant> = participants
            .iter()
            .map(|p| (p.email.as_str(), p))
            .collect();

        let mut givers = HashSet::new();
        let mut recipients = HashSet::new();

        for arc in &self.pairs {
            let giver = by_email
                .get(arc.giver.as_str())
                .ok_or_else(|| violation(format!("unknown giver {}", arc.giver)))?;
            if !by_email.contains_key(arc.recipient.as_str()) {
                return Err(violation(format!("unknown recipient {}", arc.recipient)));
            }
            if arc.giver == arc.recipient {
                return Err(violation(format!("{} gives to themselves", arc.giver)));
            }
            if giver.excludes(&arc.recipient) {
                return Err(violation(format!("excluded pair {}", arc)));
            }
            if !givers.insert(arc.giver.as_str()) {
                return Err(violation(format!("{} gives more than once", arc.giver)));
            }
            if !recipients.insert(arc.recipient.as_str()) {
                return Err(violation(format!("{} receives more than once", arc.recipient)));
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = &'a GiftArc;
    type IntoIter = std::slice::Iter<'a, GiftArc>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// A rendered notification, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<Participant> {
        vec![
            Participant::new("Alice", "a@x.io").excluding(["b@x.io"]),
            Participant::new("Bob", "b@x.io"),
            Participant::new("Carol", "c@x.io"),
            Participant::new("Dan", "d@x.io"),
        ]
    }

    #[test]
    fn test_cycles_split_two_swaps() {
        let assignment = Assignment::new(vec![
            ("d@x.io", "c@x.io").into(),
            ("a@x.io", "b@x.io").into(),
            ("c@x.io", "d@x.io").into(),
            ("b@x.io", "a@x.io").into(),
        ]);

        let cycles = assignment.cycles();
        assert_eq!(
            cycles,
            vec![
                vec!["a@x.io".to_string(), "b@x.io".to_string()],
                vec!["c@x.io".to_string(), "d@x.io".to_string()],
            ]
        );
    }

    #[test]
    fn test_cycles_single_ring() {
        let assignment = Assignment::new(vec![
            ("b@x.io", "c@x.io").into(),
            ("c@x.io", "a@x.io").into(),
            ("a@x.io", "b@x.io").into(),
        ]);
        assert_eq!(assignment.cycles(), vec![vec!["a@x.io", "b@x.io", "c@x.io"]]);
    }

    #[test]
    fn test_lookup_both_directions() {
        let assignment = Assignment::new(vec![("a@x.io", "b@x.io").into(), ("b@x.io", "a@x.io").into()]);
        assert_eq!(assignment.recipient_of("a@x.io"), Some("b@x.io"));
        assert_eq!(assignment.giver_of("a@x.io"), Some("b@x.io"));
        assert_eq!(assignment.recipient_of("z@x.io"), None);
    }

    #[test]
    fn test_verify_accepts_valid_assignment() {
        let assignment = Assignment::new(vec![
            ("a@x.io", "c@x.io").into(),
            ("c@x.io", "b@x.io").into(),
            ("b@x.io", "d@x.io").into(),
            ("d@x.io", "a@x.io").into(),
        ]);
        assert!(assignment.verify(&people()).is_ok());
    }

    #[test]
    fn test_verify_rejects_excluded_pair() {
        let assignment = Assignment::new(vec![
            ("a@x.io", "b@x.io").into(),
            ("b@x.io", "a@x.io").into(),
            ("c@x.io", "d@x.io").into(),
            ("d@x.io", "c@x.io").into(),
        ]);
        let err = assignment.verify(&people()).unwrap_err();
        assert!(err.to_string().contains("excluded pair a@x.io -> b@x.io"));
    }

    #[test]
    fn test_verify_rejects_double_recipient() {
        let assignment = Assignment::new(vec![
            ("a@x.io", "c@x.io").into(),
            ("b@x.io", "c@x.io").into(),
            ("c@x.io", "d@x.io").into(),
            ("d@x.io", "a@x.io").into(),
        ]);
        let err = assignment.verify(&people()).unwrap_err();
        assert!(err.to_string().contains("c@x.io receives more than once"));
    }

    #[test]
    fn test_verify_rejects_missing_pairs() {
        let assignment = Assignment::new(vec![("a@x.io", "c@x.io").into()]);
        assert!(matches!(
            assignment.verify(&people()),
            Err(SantaError::AssignmentInvariantError { .. })
        ));
    }
}
