pub mod code_generator;
pub mod fingerprint;
pub mod storefront;
pub mod token;
pub mod user_agent;

pub use code_generator::generate_discount_code;
pub use fingerprint::derive_fingerprint;
pub use storefront::{derive_page_type, derive_traffic_source};
pub use token::generate_session_token;
pub use user_agent::classify_user_agent;
