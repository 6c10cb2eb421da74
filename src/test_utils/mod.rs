pub mod app_state_builder;
pub mod factories;
pub mod mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use mocks::*;
