pub mod chunk;
pub mod contacts;
pub mod conversation;
pub mod hmo;
pub mod profile;
