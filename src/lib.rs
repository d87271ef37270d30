pub mod config;
pub mod feed;
pub mod mapper;
pub mod models;
pub mod supabase;
