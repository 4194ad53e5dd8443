pub mod board;
pub mod config;
pub mod economy;
pub mod error;
pub mod game_state;
pub mod protocol;
pub mod registry;
pub mod rules;
pub mod session;
pub mod types;

pub use board::*;
pub use config::load_json;
pub use economy::{EconomyConfig, EnergyPool};
pub use error::{ConfigError, LayoutError, MoveError, UnknownPieceType};
pub use game_state::*;
pub use protocol::{MoveRecord, MoveRequest, SessionEvent, StateUpdate};
pub use registry::{PieceDefinition, SideEffect};
pub use rules::{all_candidate_moves, candidate_moves, is_legal};
pub use session::Session;
pub use types::*;
