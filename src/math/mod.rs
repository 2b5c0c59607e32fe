pub mod numeric;

pub use numeric::{argmax, guarded_ratio, percent_growth, sigmoid, sign, sqr};
