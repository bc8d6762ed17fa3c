pub mod health;
pub mod order;
pub mod simulate;
