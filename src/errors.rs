use std::{error::Error, fmt, io};

#[derive(Debug)]
pub enum SimError {
    IoError(io::Error),
    CsvError(csv::Error),
    JsonError(serde_json::Error),
    TimeParse(String),
    MissingColumn(String),
    SingularMatrix,
    DegenerateVector(&'static str),
    InsufficientSamples { required: usize, available: usize },
    EmptySeries,
    UnsortedSeries,
    DuplicateTimestamp(String),
    InvalidParameter(String),
    /// A failure inside a simulation step, tagged with the simulated time.
    Step { time: String, source: Box<SimError> },
}

impl SimError {
    pub fn at_step(time: impl fmt::Display, source: SimError) -> Self {
        SimError::Step {
            time: time.to_string(),
            source: Box::new(source),
        }
    }

    /// Innermost error, skipping any step context.
    pub fn root_cause(&self) -> &SimError {
        match self {
            SimError::Step { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::IoError(e) => write!(f, "I/O error: {}", e),
            SimError::CsvError(e) => write!(f, "CSV error: {}", e),
            SimError::JsonError(e) => write!(f, "Configuration parsing error: {}", e),
            SimError::TimeParse(s) => write!(f, "Unparsable timestamp '{}'", s),
            SimError::MissingColumn(name) => write!(f, "Column not found: {}", name),
            SimError::SingularMatrix => write!(f, "Matrix is singular and cannot be inverted"),
            SimError::DegenerateVector(what) => {
                write!(f, "Cannot normalize zero-length vector ({})", what)
            }
            SimError::InsufficientSamples {
                required,
                available,
            } => write!(
                f,
                "Interpolation needs at least {} samples, series has {}",
                required, available
            ),
            SimError::EmptySeries => write!(f, "Interpolation requested on empty time series"),
            SimError::UnsortedSeries => {
                write!(f, "Time series must be sorted before interpolation")
            }
            SimError::DuplicateTimestamp(time) => {
                write!(f, "Time series has more than one sample at {}", time)
            }
            SimError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            SimError::Step { time, source } => write!(f, "Step at {} failed: {}", time, source),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimError::IoError(e) => Some(e),
            SimError::CsvError(e) => Some(e),
            SimError::JsonError(e) => Some(e),
            SimError::Step { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

// Implement `From<T>` conversions for automatic error mapping
impl From<io::Error> for SimError {
    fn from(err: io::Error) -> Self {
        SimError::IoError(err)
    }
}

impl From<csv::Error> for SimError {
    fn from(err: csv::Error) -> Self {
        SimError::CsvError(err)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::JsonError(err)
    }
}
