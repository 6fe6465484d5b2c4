pub mod cleaner;
pub mod error;
pub mod fetcher;
pub mod parser;
pub mod trimmer;
pub mod writer;
