pub mod bitstream;
pub mod container;
pub mod eperson;
pub mod item;
