//! Form validation driven by a declarative rule set

pub mod engine;

pub use engine::{
    split_list, Check, FieldError, FieldRule, Form, ValidationError, Validator, MAX_TRANSFER_FEE,
};
