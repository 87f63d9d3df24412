pub mod extract;

pub use extract::{ExtractOptions, ExtractReport, extract};
