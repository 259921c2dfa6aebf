//! Bean implementations for standard types.

mod collections;
mod dynamic;
mod maps;
mod option;
mod scalars;
