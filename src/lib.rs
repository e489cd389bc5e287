pub mod config;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod scoring;
pub mod sources;
pub mod trends;
