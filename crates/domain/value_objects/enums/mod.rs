pub mod charge_methods;
pub mod entitlement_statuses;
pub mod payment_statuses;
