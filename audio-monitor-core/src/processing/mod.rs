pub mod accumulation;
pub mod pitch;
pub mod volume;
