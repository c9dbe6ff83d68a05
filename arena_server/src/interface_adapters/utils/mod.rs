// Small adapter-level helpers.

pub mod ids;
