pub mod reader;
pub mod token;
