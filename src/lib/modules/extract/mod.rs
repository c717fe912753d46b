pub mod functions;
pub mod models;
