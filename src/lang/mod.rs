/*!
# Rust Language Module

This Rust module provides lexical analysis of the BASIC language. The
interpreter in the machine module walks the token stream directly.

*/

#[macro_use]
mod error;
mod ident;
mod lex;
pub mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use ident::Ident;
pub use ident::Symbol;
pub use ident::Symbols;
pub use lex::lex;
pub use token::Token;

pub type LineNumber = Option<u16>;

pub const MAX_LINE_NUMBER: u16 = 65529;
