pub mod expire_entitlements;
