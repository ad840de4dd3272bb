mod memory;
mod traits;

// Re-export the trait
pub use traits::ThoughtStorage;

#[cfg(test)]
pub use traits::MockThoughtStorage;

// Re-export the implementation
pub use memory::MemoryThoughtStore;
