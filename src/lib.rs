pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, Transport};
pub use config::SantaConfig;
pub use crate::core::{
    arcs::{build_arcs, build_arcs_seeded},
    assignment::solve_assignment,
    exchange::{ExchangeEngine, ExchangeReport},
    message::MessageTemplate,
    solver::SolverOptions,
};
pub use domain::model::{Assignment, GiftArc, Message, Participant};
pub use utils::error::{Result, SantaError};
