pub mod date_key;
pub mod occupancy;
pub mod selection;
