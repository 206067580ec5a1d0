pub mod items;
pub mod system;
