pub mod path;
pub mod resource;
