pub mod binary_tree;
pub mod commission;
pub mod delivery;
pub mod error;
pub mod fetch;
pub mod funnel;
pub mod inventory;
pub mod milestone;
pub mod referral;
pub mod supersede;
