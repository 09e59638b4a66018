// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "supabase/mod.rs"]
pub mod supabase;

// Only the tests swap the remote tables for memory.
#[cfg(test)]
#[path = "memory/in_memory_store.rs"]
pub mod memory;
