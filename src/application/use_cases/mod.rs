pub mod add_repository;
pub mod load_repository_detail;

#[cfg(test)]
mod test_support;
