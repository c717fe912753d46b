pub mod constants;
pub mod error;
pub mod helpers;
pub mod models;
pub mod modules;
pub mod version;
