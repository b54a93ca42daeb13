#![doc = include_str!("../README.md")]

mod error;
#[cfg(feature = "async-tokio")]
mod futures;
mod generator;
mod id;
mod layout;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
#[cfg(feature = "async-tokio")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::layout::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
