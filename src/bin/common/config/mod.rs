pub mod builder;
pub mod paths;
