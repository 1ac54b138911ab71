// Domain layer - Core types and assembly rules

pub mod model;
pub mod rules;
