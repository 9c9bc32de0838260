pub mod analytics_service;
pub mod discount_service;
pub mod eligibility_service;
pub mod outcome_service;
pub mod play_service;
pub mod reward_service;
pub mod session_service;
pub mod visitor_service;

pub use analytics_service::AnalyticsDelta;
pub use discount_service::DiscountService;
pub use eligibility_service::EligibilityService;
pub use play_service::PlayService;
pub use reward_service::RewardService;
pub use session_service::SessionService;
pub use visitor_service::{RequestSignals, VisitorService};
