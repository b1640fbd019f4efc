// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod error;
pub mod history;
pub mod model;
pub mod prompt;
pub mod selection;
pub mod state;

pub use error::*;
pub use history::*;
pub use model::*;
pub use prompt::*;
pub use selection::*;
pub use state::*;
