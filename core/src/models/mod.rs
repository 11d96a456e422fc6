// launchdeck/src/models/mod.rs

//! Entities as they are stored in, and read back from, the document store.

pub mod coupon;
pub mod product;
pub mod review;
pub mod statistics;
pub mod user;

pub use coupon::{Coupon, CouponDraft, CouponRedemption, ValidCouponDraft};
pub use product::{Product, ProductEdit, ProductQuery, ProductStatus, ProductSubmission, Report};
pub use review::{NewReview, Review};
pub use statistics::Statistics;
pub use user::{NewUser, Role, SubscriptionStatus, User, UserProfile};

/// Names of the required fields that are absent or blank.
pub(crate) fn blank_fields(fields: &[(&'static str, Option<&str>)]) -> Vec<&'static str> {
  fields
    .iter()
    .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
    .map(|(name, _)| *name)
    .collect()
}
