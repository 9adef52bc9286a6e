pub mod db;
pub mod fix;
pub mod import;
pub mod models;
