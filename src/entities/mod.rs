pub mod analytics_daily;
pub mod discount_rules;
pub mod discounts;
pub mod game_segments;
pub mod games;
pub mod plays;
pub mod sessions;
pub mod shops;
pub mod targeting_rules;
pub mod visitors;

pub use analytics_daily as analytics_entity;
pub use discount_rules as discount_rule_entity;
pub use discounts as discount_entity;
pub use game_segments as segment_entity;
pub use games as game_entity;
pub use plays as play_entity;
pub use sessions as session_entity;
pub use shops as shop_entity;
pub use targeting_rules as targeting_rule_entity;
pub use visitors as visitor_entity;
