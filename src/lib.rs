pub mod aggregator;
pub mod error;
pub mod interval;
pub mod output;
pub mod parser;
