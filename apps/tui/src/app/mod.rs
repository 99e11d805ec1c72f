// App module for race_dash
// Dashboard context, filters and key handling

pub mod filter;
pub mod input;
pub mod state;

pub use input::handle_key;
pub use state::{Command, Dashboard};
