pub mod queries;
pub mod sections;
pub mod types;
