pub mod replay;
pub mod validate;
