pub mod globals;
pub mod special_forms;
