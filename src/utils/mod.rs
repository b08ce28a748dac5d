pub mod input;
pub mod jwt;
pub mod password;
