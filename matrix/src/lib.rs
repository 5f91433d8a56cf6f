pub mod matrix;
pub mod parse_error;
pub mod parser;
