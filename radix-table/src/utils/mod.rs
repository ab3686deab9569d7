pub mod arena;
pub mod murmur;
