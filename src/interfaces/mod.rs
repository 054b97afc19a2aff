pub mod script;
pub mod tools;
