use crate::{error::Error, prelude::Epoch};

/// Any entity whose state evolves with simulation time.
///
/// The simulation is fully synchronous and moves forward in time only:
/// implementations may assume chronological requests.
pub trait Simulated {
    /// Advance this entity to `t`.
    fn simulate_to(&mut self, t: Epoch) -> Result<(), Error>;
}
