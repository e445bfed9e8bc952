#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]

#[macro_use]
extern crate alloc;

mod utils;

mod policy;
pub use policy::DeletePolicy;

mod rb_tree;
pub use rb_tree::{Color, RbTree};

mod traversal;
pub use traversal::{Branch, Order, RenderRow, Visit};

mod verify;
pub use verify::InvariantViolation;
