pub mod commerce;

pub use commerce::{CommerceApi, CommercePlatformClient, DiscountSpec};
