// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Heatmap decoding: per-part peaks, scaling, and segment assembly.

use crate::engine::HeatmapSet;
use crate::error::Result;
use crate::results::{PartPoint, PoseResult, Segment};
use crate::topology::Topology;

/// Decode a heatmap set into scaled limb segments.
///
/// Selects the topology from the channel count, locates each usable part's
/// peak, and connects the accepted peaks into frame-space segments via the
/// topology's pair table.
///
/// # Errors
///
/// Returns [`crate::PoseError::UnsupportedPartCount`] when the channel count
/// matches no known topology.
pub fn decode_heatmaps(
    maps: &HeatmapSet,
    frame_width: u32,
    frame_height: u32,
    threshold: f32,
) -> Result<PoseResult> {
    let topology = Topology::from_part_count(maps.part_count())?;
    let points = part_points(maps, topology, threshold);

    // Truncating division, matching the original integer scale computation.
    // A 256x256 frame against 32x32 maps yields exactly 8; non-multiple
    // sizes lose the fractional part.
    let scale_x = frame_width / maps.width().max(1);
    let scale_y = frame_height / maps.height().max(1);

    let segments = connect_pairs(&points, topology, scale_x, scale_y);
    Ok(PoseResult::new(topology, segments))
}

/// Locate the accepted peak for each usable part.
///
/// The returned vector is keyed by part index and sized exactly to the
/// topology's part count; body models thereby never decode their trailing
/// background channel. A part is `None` when its peak does not exceed
/// `threshold`.
#[must_use]
pub fn part_points(
    maps: &HeatmapSet,
    topology: Topology,
    threshold: f32,
) -> Vec<Option<PartPoint>> {
    (0..topology.part_count())
        .map(|part| {
            let (confidence, (x, y)) = maps.peak(part);
            (confidence > threshold).then(|| PartPoint::new(x, y))
        })
        .collect()
}

/// Connect part points into frame-space segments, one slot per pair.
fn connect_pairs(
    points: &[Option<PartPoint>],
    topology: Topology,
    scale_x: u32,
    scale_y: u32,
) -> Vec<Option<Segment>> {
    topology
        .pairs()
        .iter()
        .map(|&[a, b]| {
            let a = points.get(a).copied().flatten()?;
            let b = points.get(b).copied().flatten()?;
            // Peaks on the frame border are not connected.
            if !a.is_positive() || !b.is_positive() {
                return None;
            }
            Some(Segment::new(
                PartPoint::new(a.x * scale_x, a.y * scale_y),
                PartPoint::new(b.x * scale_x, b.y * scale_y),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    /// Build a heatmap set with the given peaks; everything else is zero.
    fn synthetic_maps(
        channels: usize,
        height: usize,
        width: usize,
        peaks: &[(usize, (usize, usize), f32)],
    ) -> HeatmapSet {
        let mut data = Array4::<f32>::zeros((1, channels, height, width));
        for &(part, (x, y), value) in peaks {
            data[[0, part, y, x]] = value;
        }
        HeatmapSet::new(data)
    }

    #[test]
    fn test_part_points_sized_to_topology() {
        let maps = synthetic_maps(19, 32, 32, &[]);
        let points = part_points(&maps, Topology::Coco, 0.1);
        assert_eq!(points.len(), 18);
        assert!(points.iter().all(Option::is_none));

        let maps = synthetic_maps(16, 32, 32, &[]);
        assert_eq!(part_points(&maps, Topology::Mpi, 0.1).len(), 15);

        let maps = synthetic_maps(22, 32, 32, &[]);
        assert_eq!(part_points(&maps, Topology::Hand, 0.1).len(), 22);
    }

    #[test]
    fn test_part_point_below_threshold_is_unknown() {
        let maps = synthetic_maps(19, 32, 32, &[(1, (10, 10), 0.05)]);
        let points = part_points(&maps, Topology::Coco, 0.1);
        assert!(points[1].is_none());
    }

    #[test]
    fn test_decode_scales_by_truncating_division() {
        // Frame 256x256 over 32x32 maps: scale 8 on both axes. COCO pair 0
        // connects parts 1 and 2.
        let maps = synthetic_maps(19, 32, 32, &[(1, (10, 10), 0.9), (2, (20, 10), 0.9)]);
        let pose = decode_heatmaps(&maps, 256, 256, 0.1).unwrap();

        assert_eq!(pose.topology(), Topology::Coco);
        assert_eq!(pose.len(), 17);
        let seg = pose.segment(0).expect("pair (1,2) present");
        assert_eq!(seg.from, PartPoint::new(80, 80));
        assert_eq!(seg.to, PartPoint::new(160, 80));
    }

    #[test]
    fn test_decode_low_confidence_endpoint_empties_pairs() {
        let maps = synthetic_maps(19, 32, 32, &[(1, (10, 10), 0.9), (2, (20, 10), 0.05)]);
        let pose = decode_heatmaps(&maps, 256, 256, 0.1).unwrap();

        for (i, &[a, b]) in Topology::Coco.pairs().iter().enumerate() {
            if a == 2 || b == 2 {
                assert!(pose.segment(i).is_none(), "pair {i} references part 2");
            }
        }
    }

    #[test]
    fn test_decode_border_peak_not_connected() {
        // Part 1 lands on the y=0 border: confident, but never connected.
        let maps = synthetic_maps(19, 32, 32, &[(1, (10, 0), 0.9), (2, (20, 10), 0.9)]);
        let pose = decode_heatmaps(&maps, 256, 256, 0.1).unwrap();
        assert!(pose.segment(0).is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_channel_count() {
        let maps = synthetic_maps(7, 32, 32, &[]);
        assert!(decode_heatmaps(&maps, 256, 256, 0.1).is_err());
    }

    #[test]
    fn test_decode_nonsquare_scale() {
        // 640x480 frame over 80x60 maps: scale (8, 8). 645x481 truncates the
        // fractional part the same way the original did.
        let maps = synthetic_maps(19, 60, 80, &[(1, (10, 10), 0.9), (2, (20, 10), 0.9)]);
        let pose = decode_heatmaps(&maps, 645, 481, 0.1).unwrap();
        let seg = pose.segment(0).unwrap();
        assert_eq!(seg.from, PartPoint::new(80, 80));
        assert_eq!(seg.to, PartPoint::new(160, 80));
    }
}
