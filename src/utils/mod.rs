pub mod currency;
pub mod decimal;
pub mod token;
