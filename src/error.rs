use thiserror::Error;

use anise::errors::PhysicsError;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// Every [Asset] of a [Scenario] must be uniquely named,
    /// because pair identifiers and result columns derive from it.
    #[error("duplicate asset name \"{0}\": all assets must have a unique name")]
    DuplicateAssetName(String),

    #[error("unknown coordinate system \"{0}\"")]
    UnknownCoordinateSystem(String),

    /// Two aligned inputs (tables, batches) do not share the same dimensions.
    #[error("shape mismatch: expected {expected} rows, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Coordinates need 3 components (2 are tolerated for geodetic points).
    #[error("invalid coordinates: {0} components")]
    InvalidCoordinates(usize),

    #[error("location table timestamps must be in ascending order")]
    UnsortedTimestamps,

    #[error("location table is empty")]
    EmptyLocationTable,

    #[error("measurement interval must be strictly positive")]
    InvalidInterval,

    #[error("scenario duration must be strictly positive")]
    InvalidDuration,

    /// A history row must provide exactly one value per configured measurement.
    #[error("expected {expected} measurement values, got {got}")]
    MeasurementCount { expected: usize, got: usize },

    #[error("unknown antenna action \"{0}\"")]
    UnknownAction(String),

    #[error("antenna \"{0}\" is not allowed to transmit")]
    NotATransmitter(String),

    #[error("antenna \"{0}\" is not allowed to receive")]
    NotAReceiver(String),

    #[error("asset \"{asset}\" has no antenna named \"{antenna}\"")]
    AntennaNotFound { asset: String, antenna: String },

    #[error("no asset at index {0}")]
    UnknownAsset(usize),

    #[error("failed to read system time: {0}")]
    SystemTime(String),

    /// Internal error: more timestamps were simulated than the history
    /// was sized for. This indicates a logic error, not a user error.
    #[error("internal error: measurement history is full ({0} rows)")]
    HistoryCapacity(usize),

    /// Pattern grid steps must be finite and strictly positive.
    #[error("invalid pattern grid step: {0}°")]
    InvalidPatternGrid(f64),

    #[error("invalid antenna geometry: {0}")]
    InvalidGeometry(&'static str),

    /// The EM solver could not produce a physically meaningful pattern.
    #[error("em solver did not converge")]
    SolverDivergence,

    #[error("tle error: {0}")]
    Tle(String),

    #[error("propagation error: {0}")]
    Propagation(String),

    /// Any physical non sense detected by ANISE will cause us to abort with this error.
    #[error("physics issue: {0}")]
    Physics(PhysicsError),
}

impl From<PhysicsError> for Error {
    fn from(e: PhysicsError) -> Self {
        Self::Physics(e)
    }
}
