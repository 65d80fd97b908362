pub mod forecast;
pub mod gweather;
pub mod health;
pub mod report;
pub mod risk;
pub mod warnings;
pub mod weather;
