pub mod euler;
pub mod rk4;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    Euler,
    #[default]
    Rk4,
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntegratorKind::Euler => write!(f, "Euler"),
            IntegratorKind::Rk4 => write!(f, "RK4"),
        }
    }
}
