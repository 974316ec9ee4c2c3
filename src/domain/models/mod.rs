pub mod issue;
pub mod repository;
