use crate::{error::Error, prelude::Vector3};

/// Default wire radius [m]
pub const DEFAULT_WIRE_RADIUS_M: f64 = 0.001;

/// Straight [Wire], divided in equal segments.
/// The positive current reference runs from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    /// Tag identification number
    pub tag: usize,
    /// Number of segments
    pub segments: usize,
    /// Start position [m]
    pub start: Vector3<f64>,
    /// End position [m]
    pub end: Vector3<f64>,
    /// Wire radius [m]
    pub radius: f64,
}

impl Wire {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit vector, from start to end
    pub fn direction(&self) -> Vector3<f64> {
        (self.end - self.start) / self.length()
    }

    pub fn segment_length(&self) -> f64 {
        self.length() / self.segments as f64
    }

    /// Center of the i-th (0 based) segment
    pub fn segment_center(&self, i: usize) -> Vector3<f64> {
        let ratio = (i as f64 + 0.5) / self.segments as f64;
        self.start + (self.end - self.start) * ratio
    }
}

/// [WireGeometry] describes an antenna as a set of wires,
/// and the segment on which the excitation is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireGeometry {
    wires: Vec<Wire>,
    /// Absolute (1 based) index of the fed segment
    source_index: usize,
    completed: bool,
}

impl WireGeometry {
    pub fn new(source_index: usize) -> Self {
        Self {
            wires: Vec::new(),
            source_index,
            completed: false,
        }
    }

    /// Appends a new [Wire].
    pub fn create_wire(
        &mut self,
        tag: usize,
        segments: usize,
        start: Vector3<f64>,
        end: Vector3<f64>,
    ) -> &mut Self {
        self.wires.push(Wire {
            tag,
            segments,
            start,
            end,
            radius: DEFAULT_WIRE_RADIUS_M,
        });
        self.completed = false;
        self
    }

    /// Validates and locks this [WireGeometry].
    pub fn complete(&mut self) -> Result<(), Error> {
        if self.wires.is_empty() {
            return Err(Error::InvalidGeometry("no wires"));
        }
        if self.wires.iter().any(|w| w.segments == 0) {
            return Err(Error::InvalidGeometry("wire without segments"));
        }
        if self.wires.iter().any(|w| w.length() <= 0.0 || !w.length().is_finite()) {
            return Err(Error::InvalidGeometry("null or invalid wire length"));
        }
        if self.source_index == 0 || self.source_index > self.total_segments() {
            return Err(Error::InvalidGeometry("source segment out of range"));
        }
        self.completed = true;
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    pub fn total_segments(&self) -> usize {
        self.wires.iter().map(|w| w.segments).sum()
    }

    /// Locates an absolute (1 based) segment index,
    /// returning the wire index and the segment center.
    pub fn segment(&self, index: usize) -> Option<(usize, Vector3<f64>)> {
        let mut offset = 0;
        for (i, wire) in self.wires.iter().enumerate() {
            if index > offset && index <= offset + wire.segments {
                return Some((i, wire.segment_center(index - offset - 1)));
            }
            offset += wire.segments;
        }
        None
    }

    /// Feed point: the wire end closest to the source segment.
    pub fn feed_point(&self) -> Option<Vector3<f64>> {
        let (wire, center) = self.segment(self.source_index)?;
        let wire = &self.wires[wire];
        if (wire.start - center).norm() <= (wire.end - center).norm() {
            Some(wire.start)
        } else {
            Some(wire.end)
        }
    }
}
