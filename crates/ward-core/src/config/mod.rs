//! Configuration traits and validation
//!
//! Every tunable the authorization core reads is passed in through a config
//! struct implementing [`WardConfig`]; nothing is read from module-level
//! constants at request time.

pub mod traits;
pub mod validation;

pub use traits::{parse_value, WardConfig};
pub use validation::{ConfigValidator, ValidationError, ValidationResult};
