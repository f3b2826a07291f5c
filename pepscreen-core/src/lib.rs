#[macro_use]
mod par;

pub mod alphabets;
pub mod complexity;
pub mod error;
pub mod filter;
pub mod io;
pub mod oracle;
pub mod pipeline;
pub mod score;
pub mod seq;
pub mod translate;
