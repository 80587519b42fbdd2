pub mod item_store;
pub mod object_store;
pub mod secrets;
