pub mod digital_twin;
pub mod google;
