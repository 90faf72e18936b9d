pub mod analysis;
pub mod balance;
pub mod comparison;
