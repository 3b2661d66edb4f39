pub mod chunks;
pub mod lingo;
