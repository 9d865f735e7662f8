pub mod env;
pub mod paths;
pub mod string_ext;
