pub mod admindtos;
pub mod common;
pub mod deliverydtos;
pub mod distributordtos;
pub mod inventorydtos;
pub mod onboardingdtos;
pub mod payoutdtos;
pub mod walletdtos;
