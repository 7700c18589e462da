pub mod widgets;
pub mod wire;
