pub mod actions;
pub mod client;
pub mod drain;
pub mod payload;
pub mod publish;
