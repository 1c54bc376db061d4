use crate::core::arcs::build_arcs;
use crate::core::assignment::solve_assignment;
use crate::core::message::MessageTemplate;
use crate::core::solver::SolverOptions;
use crate::domain::model::{Assignment, Participant};
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, SantaError};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

/// Summary of a finished exchange. Says nothing about who gives to whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeReport {
    pub participants: usize,
    pub cycle_lengths: Vec<usize>,
    pub delivered: usize,
}

pub struct ExchangeEngine<N: Notifier> {
    participants: Vec<Participant>,
    template: MessageTemplate,
    solver_options: SolverOptions,
    notifier: N,
}

impl<N: Notifier> ExchangeEngine<N> {
    pub fn new(participants: Vec<Participant>, template: MessageTemplate, notifier: N) -> Self {
        Self {
            participants,
            template,
            solver_options: SolverOptions::default(),
            notifier,
        }
    }

    pub fn with_solver_options(mut self, options: SolverOptions) -> Self {
        self.solver_options = options;
        self
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Builds the arc graph, solves it and checks the result.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Assignment> {
        let arcs = build_arcs(&self.participants, rng);
        tracing::info!(
            "🎲 Drawing among {} participants ({} candidate pairings)",
            self.participants.len(),
            arcs.len()
        );

        let identities: Vec<&str> = self.participants.iter().map(|p| p.email.as_str()).collect();
        let assignment = solve_assignment(&arcs, &identities, self.solver_options)?;
        assignment.verify(&self.participants)?;

        tracing::info!(
            "🎁 Assignment found: {} gift cycles",
            assignment.cycles().len()
        );
        Ok(assignment)
    }

    /// Sends one message per pair, in assignment order. Stops at the first failure.
    pub async fn notify(&self, assignment: &Assignment) -> Result<ExchangeReport> {
        let by_email: HashMap<&str, &Participant> = self
            .participants
            .iter()
            .map(|p| (p.email.as_str(), p))
            .collect();

        let lookup = |email: &str| {
            by_email
                .get(email)
                .copied()
                .ok_or_else(|| SantaError::AssignmentInvariantError {
                    message: format!("{} is not a participant", email),
                })
        };

        let mut delivered = 0;
        for arc in assignment {
            let giver = lookup(&arc.giver)?;
            let recipient = lookup(&arc.recipient)?;
            let message = self.template.render(giver, recipient);

            if let Err(e) = self.notifier.deliver(&message).await {
                tracing::error!(
                    "❌ Delivery via {} to {} failed after {} of {} messages: {}",
                    self.notifier.name(),
                    giver.email,
                    delivered,
                    assignment.len(),
                    e
                );
                return Err(e);
            }

            delivered += 1;
            tracing::debug!("Notified {} via {}", giver.email, self.notifier.name());
        }

        tracing::info!("📬 Delivered {} messages via {}", delivered, self.notifier.name());

        Ok(ExchangeReport {
            participants: self.participants.len(),
            cycle_lengths: assignment.cycles().iter().map(Vec::len).collect(),
            delivered,
        })
    }

    pub async fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ExchangeReport> {
        let assignment = self.draw(rng)?;
        self.notify(&assignment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Message;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<Message>>>,
        fail_after: Option<usize>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn deliver(&self, message: &Message) -> Result<()> {
            let mut sent = self.sent.lock().await;
            if self.fail_after.is_some_and(|limit| sent.len() >= limit) {
                return Err(SantaError::DeliveryError {
                    recipient: message.to.clone(),
                    message: "relay unavailable".to_string(),
                });
            }
            sent.push(message.clone());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn family() -> Vec<Participant> {
        vec![
            Participant::new("Alice", "alice@example.com").excluding(["bob@example.com"]),
            Participant::new("Bob", "bob@example.com").excluding(["alice@example.com"]),
            Participant::new("Carol", "carol@example.com"),
            Participant::new("Dan", "dan@example.com"),
            Participant::new("Erin", "erin@example.com"),
        ]
    }

    #[tokio::test]
    async fn test_run_notifies_every_participant_once() {
        let notifier = RecordingNotifier::default();
        let engine = ExchangeEngine::new(family(), MessageTemplate::default(), notifier.clone());

        let report = engine.run(&mut StdRng::seed_from_u64(11)).await.unwrap();

        assert_eq!(report.participants, 5);
        assert_eq!(report.delivered, 5);
        assert_eq!(report.cycle_lengths.iter().sum::<usize>(), 5);

        let sent = notifier.sent.lock().await;
        let mut to: Vec<&str> = sent.iter().map(|m| m.to.as_str()).collect();
        to.sort_unstable();
        assert_eq!(
            to,
            vec![
                "alice@example.com",
                "bob@example.com",
                "carol@example.com",
                "dan@example.com",
                "erin@example.com"
            ]
        );
        assert!(!sent
            .iter()
            .any(|m| m.to == "alice@example.com" && m.body.contains("bob@example.com")));
    }

    #[tokio::test]
    async fn test_delivery_failure_stops_run() {
        let notifier = RecordingNotifier {
            fail_after: Some(2),
            ..Default::default()
        };
        let engine = ExchangeEngine::new(family(), MessageTemplate::default(), notifier.clone());

        let err = engine.run(&mut StdRng::seed_from_u64(5)).await.unwrap_err();

        assert!(matches!(err, SantaError::DeliveryError { .. }));
        assert_eq!(notifier.sent.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_infeasible_draw_sends_nothing() {
        let notifier = RecordingNotifier::default();
        let people = family().into_iter().take(2).collect();
        let engine = ExchangeEngine::new(people, MessageTemplate::default(), notifier.clone());

        let err = engine.run(&mut StdRng::seed_from_u64(1)).await.unwrap_err();

        assert!(matches!(err, SantaError::InfeasibleAssignment));
        assert!(notifier.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_notify_rejects_unknown_participant() {
        let engine = ExchangeEngine::new(
            family(),
            MessageTemplate::default(),
            RecordingNotifier::default(),
        );
        let assignment = Assignment::new(vec![("mallory@example.com", "carol@example.com").into()]);

        assert!(matches!(
            engine.notify(&assignment).await,
            Err(SantaError::AssignmentInvariantError { .. })
        ));
    }

    #[test]
    fn test_draw_with_repeated_participant_is_an_error() {
        let mut people = family();
        people.push(Participant::new("Carol again", "carol@example.com"));
        let engine = ExchangeEngine::new(people, MessageTemplate::default(), RecordingNotifier::default());

        assert!(matches!(
            engine.draw(&mut StdRng::seed_from_u64(4)),
            Err(SantaError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_draw_is_reproducible_with_seed() {
        let engine = ExchangeEngine::new(
            family(),
            MessageTemplate::default(),
            RecordingNotifier::default(),
        );
        let first = engine.draw(&mut StdRng::seed_from_u64(99)).unwrap();
        let second = engine.draw(&mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(first, second);
    }
}
