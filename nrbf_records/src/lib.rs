pub mod catalog;
mod formatted_object;
mod id;
mod options;
mod parser;
mod record_map;
pub mod records;
mod resolver;
#[cfg(test)]
mod test_utils;
mod writer;

pub use formatted_object::*;
pub use id::*;
pub use options::*;
pub use parser::*;
pub use record_map::*;
pub use resolver::*;
pub use writer::*;
