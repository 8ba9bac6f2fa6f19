// Configuration, SQLite storage, and Lahman data import for dugout.

pub mod config;
pub mod db;
pub mod import;
pub mod season;
