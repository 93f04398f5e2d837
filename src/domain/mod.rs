// Domain layer - Core pipeline types and caption rules

pub mod errors;
pub mod model;
pub mod rules;
