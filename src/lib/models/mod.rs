pub mod field;
pub mod season;
pub mod series;
pub mod station;
