pub mod discount;
pub mod play;
pub mod session;
pub mod webhook;

pub use discount::discount_config;
pub use play::play_config;
pub use session::session_config;
pub use webhook::webhook_config;
