pub mod config;
pub mod filter;
pub mod leads;
pub mod output;
pub mod pipeline;
pub mod scoring;
