// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose overlay drawing.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::results::PoseResult;

/// Limb segment color (green).
pub const SEGMENT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Joint marker color (dark blue).
pub const JOINT_COLOR: Rgb<u8> = Rgb([0, 0, 200]);

/// Joint marker radius in pixels.
const JOINT_RADIUS: i32 = 3;

/// Draw the detected pose onto a frame.
///
/// Each present segment becomes a line with a filled circle at both
/// endpoints; empty slots are skipped.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
pub fn draw_pose(frame: &mut RgbImage, pose: &PoseResult) {
    for segment in pose.present() {
        draw_line_segment_mut(
            frame,
            (segment.from.x as f32, segment.from.y as f32),
            (segment.to.x as f32, segment.to.y as f32),
            SEGMENT_COLOR,
        );
        draw_filled_circle_mut(
            frame,
            (segment.from.x as i32, segment.from.y as i32),
            JOINT_RADIUS,
            JOINT_COLOR,
        );
        draw_filled_circle_mut(
            frame,
            (segment.to.x as i32, segment.to.y as i32),
            JOINT_RADIUS,
            JOINT_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{PartPoint, Segment};
    use crate::topology::Topology;

    #[test]
    fn test_draw_pose_marks_endpoints() {
        let mut segments = vec![None; Topology::Coco.pairs().len()];
        segments[0] = Some(Segment::new(PartPoint::new(20, 20), PartPoint::new(60, 20)));
        let pose = PoseResult::new(Topology::Coco, segments);

        let mut frame = RgbImage::new(100, 100);
        draw_pose(&mut frame, &pose);

        assert_eq!(*frame.get_pixel(20, 20), JOINT_COLOR);
        assert_eq!(*frame.get_pixel(60, 20), JOINT_COLOR);
        // A point along the line, past the joint marker.
        assert_eq!(*frame.get_pixel(40, 20), SEGMENT_COLOR);
    }

    #[test]
    fn test_draw_empty_pose_leaves_frame_untouched() {
        let pose = PoseResult::new(Topology::Mpi, vec![None; Topology::Mpi.pairs().len()]);
        let mut frame = RgbImage::new(32, 32);
        draw_pose(&mut frame, &pose);
        assert!(frame.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
