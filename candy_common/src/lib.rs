mod earnings;
mod helpers;
mod kilograms;

pub mod op;

pub use earnings::Earnings;
pub use helpers::parse_boolean_flag;
pub use kilograms::Kilograms;
