pub mod archiver;
pub mod authorizer;
pub mod generator;
pub mod ingestion;
