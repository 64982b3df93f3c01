pub mod input_parser;

pub use input_parser::{ParsedInput, parse_task_input};
