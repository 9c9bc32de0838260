pub mod common;
pub mod context;
pub mod discount;
pub mod enums;
pub mod game;
pub mod play;
pub mod session;
pub mod webhook;

pub use common::*;
pub use context::*;
pub use discount::*;
pub use enums::*;
pub use game::*;
pub use play::*;
pub use session::*;
pub use webhook::*;
