pub mod meta;
pub mod models;
