pub mod command;
pub mod context;
pub mod cursor;
pub mod error;
pub mod line;
pub mod manager;
pub mod managers;
pub mod parser;
