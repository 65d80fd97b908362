pub mod client;
pub mod error;
pub mod forecast;
pub mod history;
pub mod warnings;
