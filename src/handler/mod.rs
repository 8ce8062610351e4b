pub mod admin;
pub mod deliveries;
pub mod distributor;
pub mod inventory;
pub mod onboarding;
pub mod payouts;
pub mod wallet;
