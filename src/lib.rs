//! Generates a printable UNO deck: one AI illustration per card, composited
//! into a bordered card face and laid out on PDF pages.

pub mod assets;
pub mod config;
pub mod deck;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod render;

pub use config::{Args, Config};
pub use deck::{CardKind, CardSpec, Color, build_deck};
pub use error::{Error, Result};
pub use pipeline::{RunSummary, run};
