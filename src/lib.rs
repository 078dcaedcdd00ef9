pub mod charts;
pub mod config;
mod engine;
pub mod http;
mod id;
pub mod storage;
pub mod table;
pub mod telemetry;

pub use engine::{PenguinEngine, PenguinEngineBuilder};
