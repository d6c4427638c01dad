pub mod inspector;
pub mod network;
