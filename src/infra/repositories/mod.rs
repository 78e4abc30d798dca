pub mod sqlite_tourist_repo;
pub mod postgres_tourist_repo;
