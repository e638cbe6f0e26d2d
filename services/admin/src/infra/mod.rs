pub mod db;
pub mod firebase;
pub mod identity;
pub mod observer;
pub mod supabase;
