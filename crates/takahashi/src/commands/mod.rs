pub mod completion;
pub mod config;
pub mod examples;
pub mod export;
pub mod new;
pub mod validate;
