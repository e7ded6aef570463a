pub mod charts;
pub mod devices;
