pub mod demo;
pub mod expression;
pub mod memo;
pub mod render;
pub mod value;
