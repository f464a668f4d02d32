//! BDD step definitions for the space status indicator

pub mod controller_steps;
pub mod parser_steps;
