pub mod signature;
pub mod slug;
