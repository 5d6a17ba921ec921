pub mod token;
pub use token::*;

pub mod lexer;
pub use lexer::*;
