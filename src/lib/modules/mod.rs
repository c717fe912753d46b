pub mod completeness;
pub mod correlation;
pub mod derived;
pub mod extract;
pub mod index;
pub mod market;
pub mod monthly;
pub mod pipeline;
pub mod regional;
pub mod season;
pub mod solar;
pub mod standardize;
