// Supabase infra layer.
// - `supabase_table.rs` talks to one table through the PostgREST HTTP API.

#[path = "supabase_table.rs"]
pub mod supabase_table;

pub use supabase_table::SupabaseTable;
