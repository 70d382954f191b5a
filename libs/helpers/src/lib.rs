pub mod documents;
pub mod export;
