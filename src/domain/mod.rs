pub mod breakdown;
pub mod context;
pub mod money;
pub mod ports;
pub mod rules;
