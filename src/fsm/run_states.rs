use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunPhase {
    Idle,
    Stepping,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "Idle"),
            RunPhase::Stepping => write!(f, "Stepping"),
            RunPhase::Done => write!(f, "Done"),
        }
    }
}
