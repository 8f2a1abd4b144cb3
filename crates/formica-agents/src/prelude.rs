//! Formica Agents Prelude: convenient imports for common usage.
//!
//! ```rust
//! use formica_agents::prelude::*;
//! ```

pub use crate::ant::{Ant, AntParams};
pub use crate::selection::{attractiveness, roulette};

// Re-export from core
pub use formica_core::prelude::*;
