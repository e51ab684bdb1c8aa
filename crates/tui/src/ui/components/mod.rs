pub mod card;
pub mod field;
pub mod toast;
