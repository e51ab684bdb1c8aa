pub mod contract;
pub mod contracts;
pub mod create_contract;
pub mod create_series;
pub mod login;
pub mod mint;
