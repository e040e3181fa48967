pub mod ask;
pub mod gateway;
