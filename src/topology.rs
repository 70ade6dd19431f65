// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose topology definitions for OpenPose-style models.
//!
//! The network reports one heatmap channel per body part (plus a background
//! channel for the body models). The channel count identifies which model is
//! loaded, and each model has a fixed table of part-index pairs describing
//! which detected points connect into visible limb segments.

use std::fmt;

use crate::error::{PoseError, Result};

/// COCO body skeleton (pairs of part indices).
/// Parts: 0=nose, 1=neck, 2-4=right arm, 5-7=left arm, 8-10=right leg,
/// 11-13=left leg, 14/15=eyes, 16/17=ears, 18=background.
pub const COCO_PAIRS: [[usize; 2]; 17] = [
    [1, 2],   // neck to right shoulder
    [1, 5],   // neck to left shoulder
    [2, 3],   // right shoulder to right elbow
    [3, 4],   // right elbow to right wrist
    [5, 6],   // left shoulder to left elbow
    [6, 7],   // left elbow to left wrist
    [1, 8],   // neck to right hip
    [8, 9],   // right hip to right knee
    [9, 10],  // right knee to right ankle
    [1, 11],  // neck to left hip
    [11, 12], // left hip to left knee
    [12, 13], // left knee to left ankle
    [1, 0],   // neck to nose
    [0, 14],  // nose to right eye
    [14, 16], // right eye to right ear
    [0, 15],  // nose to left eye
    [15, 17], // left eye to left ear
];

/// MPI body skeleton.
/// Parts: 0=head, 1=neck, 2-4=right arm, 5-7=left arm, 8-10=right leg,
/// 11-13=left leg, 14=chest, 15=background.
pub const MPI_PAIRS: [[usize; 2]; 14] = [
    [0, 1],   // head to neck
    [1, 2],   // neck to right shoulder
    [2, 3],   // right shoulder to right elbow
    [3, 4],   // right elbow to right wrist
    [1, 5],   // neck to left shoulder
    [5, 6],   // left shoulder to left elbow
    [6, 7],   // left elbow to left wrist
    [1, 14],  // neck to chest
    [14, 8],  // chest to right hip
    [8, 9],   // right hip to right knee
    [9, 10],  // right knee to right ankle
    [14, 11], // chest to left hip
    [11, 12], // left hip to left knee
    [12, 13], // left knee to left ankle
];

/// Hand skeleton. Part 0 is the wrist; each finger is a chain of four joints.
pub const HAND_PAIRS: [[usize; 2]; 20] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 4], // thumb
    [0, 5],
    [5, 6],
    [6, 7],
    [7, 8], // index
    [0, 9],
    [9, 10],
    [10, 11],
    [11, 12], // middle
    [0, 13],
    [13, 14],
    [14, 15],
    [15, 16], // ring
    [0, 17],
    [17, 18],
    [18, 19],
    [19, 20], // pinky
];

/// Model topology variant, selected from the heatmap channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// COCO body model: 19 heatmap channels, 18 usable parts.
    Coco,
    /// MPI body model: 16 heatmap channels, 15 usable parts.
    Mpi,
    /// Hand model: 22 heatmap channels, all usable.
    Hand,
}

impl Topology {
    /// Identify the topology from a heatmap channel count.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::UnsupportedPartCount`] for any count outside
    /// {19, 16, 22}. This is a data-format error: the model output cannot be
    /// decoded and the extraction pass must not produce a result.
    pub const fn from_part_count(channels: usize) -> Result<Self> {
        match channels {
            19 => Ok(Self::Coco),
            16 => Ok(Self::Mpi),
            22 => Ok(Self::Hand),
            other => Err(PoseError::UnsupportedPartCount(other)),
        }
    }

    /// Number of heatmap channels this topology expects.
    #[must_use]
    pub const fn channel_count(&self) -> usize {
        match self {
            Self::Coco => 19,
            Self::Mpi => 16,
            Self::Hand => 22,
        }
    }

    /// Number of usable body parts. The body models carry a trailing
    /// background channel that is never decoded.
    #[must_use]
    pub const fn part_count(&self) -> usize {
        match self {
            Self::Coco => 18,
            Self::Mpi => 15,
            Self::Hand => 22,
        }
    }

    /// The pair table connecting detected parts into limb segments.
    #[must_use]
    pub const fn pairs(&self) -> &'static [[usize; 2]] {
        match self {
            Self::Coco => &COCO_PAIRS,
            Self::Mpi => &MPI_PAIRS,
            Self::Hand => &HAND_PAIRS,
        }
    }

    /// Returns the lowercase topology name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Coco => "coco",
            Self::Mpi => "mpi",
            Self::Hand => "hand",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_part_count() {
        assert_eq!(Topology::from_part_count(19).unwrap(), Topology::Coco);
        assert_eq!(Topology::from_part_count(16).unwrap(), Topology::Mpi);
        assert_eq!(Topology::from_part_count(22).unwrap(), Topology::Hand);
    }

    #[test]
    fn test_from_part_count_rejects_unknown() {
        for n in [0, 1, 15, 17, 18, 20, 21, 23, 100] {
            match Topology::from_part_count(n) {
                Err(PoseError::UnsupportedPartCount(got)) => assert_eq!(got, n),
                other => panic!("expected UnsupportedPartCount for {n}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_table_lengths() {
        assert_eq!(Topology::Coco.pairs().len(), 17);
        assert_eq!(Topology::Mpi.pairs().len(), 14);
        assert_eq!(Topology::Hand.pairs().len(), 20);
    }

    #[test]
    fn test_part_counts_skip_background() {
        assert_eq!(Topology::Coco.part_count(), 18);
        assert_eq!(Topology::Mpi.part_count(), 15);
        assert_eq!(Topology::Hand.part_count(), 22);
    }

    #[test]
    fn test_pairs_reference_usable_parts() {
        // No table may reference its background channel or beyond.
        for topology in [Topology::Coco, Topology::Mpi, Topology::Hand] {
            for pair in topology.pairs() {
                assert!(pair[0] < topology.part_count(), "{topology}: pair {pair:?}");
                assert!(pair[1] < topology.part_count(), "{topology}: pair {pair:?}");
            }
        }
    }
}
