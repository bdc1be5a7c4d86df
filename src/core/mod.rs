pub mod builder;
pub mod components;
pub mod connections;
pub mod errors;
pub mod execution;
pub mod graph;
pub mod types;

#[cfg(test)]
mod tests;
