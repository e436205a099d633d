pub mod app;
pub mod core;
pub mod gitlab;
pub mod output;
pub mod scanner;
