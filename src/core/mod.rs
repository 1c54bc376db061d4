pub mod arcs;
pub mod assignment;
pub mod exchange;
pub mod matching;
pub mod message;
pub mod model;
pub mod solver;

pub use crate::domain::model::{Assignment, GiftArc, Message, Participant};
pub use crate::domain::ports::{Notifier, Storage};
pub use crate::utils::error::Result;
