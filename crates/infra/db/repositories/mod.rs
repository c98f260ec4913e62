pub mod entitlements;
pub mod payments;
pub mod plans;
