pub mod config;
pub mod gesture;
pub mod toast;

pub use config::*;
pub use gesture::*;
pub use toast::*;
