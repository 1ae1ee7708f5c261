pub mod breakdown_writer;
pub mod line_reader;
