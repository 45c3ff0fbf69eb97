//! Pipeline stage identifiers.

use std::fmt;

/// One step of the linear cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Select,
    Impute,
    Derive,
    Smooth,
    Clean,
}

impl Stage {
    /// Name used in error context and log spans.
    pub const fn name(self) -> &'static str {
        match self {
            Stage::Select => "select",
            Stage::Impute => "forward_fill",
            Stage::Derive => "derive_metrics",
            Stage::Smooth => "rolling_mean",
            Stage::Clean => "drop_incomplete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
