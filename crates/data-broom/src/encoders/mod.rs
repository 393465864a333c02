//! Categorical encoding.
//!
//! - Label encoding: each distinct text value becomes an integer code, assigned
//!   in sorted value order.
//! - One-hot encoding: each text column expands into one boolean indicator per
//!   distinct value.
//!
//! Neither encoder keeps its mapping after the call.

mod label;
mod one_hot;

pub use label::LabelEncoder;
pub use one_hot::OneHotEncoder;
