pub mod load_repo;
pub mod models;
