pub mod config;
pub mod demo;
pub mod orchestrator;
pub mod render;
pub mod runner;
pub mod seed;

pub use config::*;
pub use demo::*;
pub use orchestrator::*;
pub use runner::*;
