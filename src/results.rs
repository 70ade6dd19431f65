// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Output types for the pose extraction pass.

use crate::topology::Topology;

/// Pair-table entry whose segment drives the mascot's left limb.
pub const LEFT_LIMB_PAIR: usize = 3;

/// Pair-table entry whose segment drives the mascot's right limb.
pub const RIGHT_LIMB_PAIR: usize = 5;

/// Pixel location of a detected body part.
///
/// Coordinates are in heatmap space until scaled into frame space during
/// segment assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartPoint {
    /// Column, in pixels.
    pub x: u32,
    /// Row, in pixels.
    pub y: u32,
}

impl PartPoint {
    /// Create a new part point.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are strictly positive.
    ///
    /// Points on the x=0 or y=0 border are never connected into segments.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.x > 0 && self.y > 0
    }
}

/// A limb segment: two connected part points in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First endpoint.
    pub from: PartPoint,
    /// Second endpoint.
    pub to: PartPoint,
}

impl Segment {
    /// Create a new segment.
    #[must_use]
    pub const fn new(from: PartPoint, to: PartPoint) -> Self {
        Self { from, to }
    }

    /// Rotation angle of the segment in radians.
    ///
    /// Measured the way the mascot expects it: the direction from `to`
    /// back towards `from`, with y pointing down (screen coordinates).
    #[must_use]
    pub fn angle(&self) -> f64 {
        let dy = f64::from(self.from.y) - f64::from(self.to.y);
        let dx = f64::from(self.from.x) - f64::from(self.to.x);
        (-dy).atan2(-dx)
    }
}

/// The decoded pose for one frame.
///
/// Holds one entry per row of the active topology's pair table, in table
/// order. An entry is `None` when either endpoint was below the confidence
/// threshold or sat on the frame border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseResult {
    topology: Topology,
    segments: Vec<Option<Segment>>,
}

impl PoseResult {
    /// Create a new pose result.
    ///
    /// # Panics
    ///
    /// Panics if the segment count does not match the topology's pair table.
    #[must_use]
    pub fn new(topology: Topology, segments: Vec<Option<Segment>>) -> Self {
        assert_eq!(
            segments.len(),
            topology.pairs().len(),
            "one segment slot per pair-table entry"
        );
        Self { topology, segments }
    }

    /// The topology this pose was decoded against.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of segment slots (always the active pair-table length).
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segment was detected at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Option::is_none)
    }

    /// The segment for one pair-table entry, if detected.
    #[must_use]
    pub fn segment(&self, pair: usize) -> Option<&Segment> {
        self.segments.get(pair).and_then(Option::as_ref)
    }

    /// All segment slots, in pair-table order.
    #[must_use]
    pub fn segments(&self) -> &[Option<Segment>] {
        &self.segments
    }

    /// Iterate over the detected segments only.
    pub fn present(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().flatten()
    }
}

/// Rotation angles for the mascot's two limbs, in radians.
///
/// `None` means the driving segment was not detected this frame; the mascot
/// keeps its previous limb orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MascotPose {
    /// Left limb angle.
    pub left: Option<f64>,
    /// Right limb angle.
    pub right: Option<f64>,
}

impl MascotPose {
    /// Derive limb angles from a pose result.
    ///
    /// Reads the arm segments at fixed pair-table entries
    /// ([`LEFT_LIMB_PAIR`] and [`RIGHT_LIMB_PAIR`]); the webcam image is
    /// mirrored, so the detected person's right arm drives the mascot's
    /// left limb.
    #[must_use]
    pub fn from_pose(pose: &PoseResult) -> Self {
        Self {
            left: pose.segment(LEFT_LIMB_PAIR).map(Segment::angle),
            right: pose.segment(RIGHT_LIMB_PAIR).map(Segment::angle),
        }
    }
}
