pub mod check;
pub mod lint;
