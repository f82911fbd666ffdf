pub mod cli;
pub mod gesture;
pub mod haptics;
pub mod io;
pub mod model;
pub mod mutation;
pub mod sheet;
pub mod toast;

#[cfg(test)]
pub(crate) mod test_helpers;
