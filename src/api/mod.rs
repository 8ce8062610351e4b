pub mod adminapi;
pub mod cache;
pub mod client;
pub mod deliveryapi;
pub mod distributorapi;
pub mod error;
pub mod inventoryapi;
pub mod onboardingapi;
pub mod payoutapi;
pub mod walletapi;

#[cfg(test)]
pub mod testing;
