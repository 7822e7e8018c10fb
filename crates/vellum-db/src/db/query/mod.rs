//! Query builders and loaders, one module per aggregate.

pub mod bitstream;
pub mod container;
pub mod eperson;
pub mod item;
