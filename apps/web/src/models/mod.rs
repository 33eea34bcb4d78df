pub mod block;
pub mod collection;
