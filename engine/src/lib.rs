pub mod types;
pub mod error;
pub mod session;
pub mod stats;
pub mod engine;
pub mod view;

mod tests;

pub use types::*;
pub use error::SessionError;
pub use session::ArmySession;
pub use engine::{apply_action, Action, Outcome};
pub use stats::{army_stats, ArmyStats};
