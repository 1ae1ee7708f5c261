pub mod csv;
pub mod snapshot;
