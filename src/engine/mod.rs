pub mod compare;
pub mod decode;
pub mod evaluate;
pub mod extract;

pub use compare::{Comparison, compare};
pub use decode::{decode_assertion, decode_assertions, kind_hint};
pub use evaluate::{EvaluateOptions, evaluate, evaluate_with};
pub use extract::{ExtractedValue, ResponseView, extract};
