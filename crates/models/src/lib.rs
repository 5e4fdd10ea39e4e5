pub mod errors;
pub mod db;
pub mod record;
pub mod document;
