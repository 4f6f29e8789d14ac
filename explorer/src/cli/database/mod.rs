pub mod memory;
pub mod mongodb;
