pub mod capture_engine;
pub mod power;
