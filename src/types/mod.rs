pub mod reading;
pub mod schema;
pub mod station;
pub mod station_result;
