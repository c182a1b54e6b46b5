// Composition roots of the smoke-test binary.

#[cfg(feature = "gui")]
pub mod gui;
pub mod smoke;
