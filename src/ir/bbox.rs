//! Bounding box types.
//!
//! YOLO labels store normalized center/size boxes ([`YoloBox`]); VOC and COCO
//! store absolute integer pixel corners ([`PixelBox`]).

use serde::{Deserialize, Serialize};

/// One parsed YOLO label row: class index plus a normalized center box.
///
/// All four geometry fields are fractions of the image size. Values outside
/// `[0, 1]` are carried through unchanged; detprep does not validate
/// annotation correctness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloBox {
    pub class_id: usize,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl YoloBox {
    /// Converts to absolute pixel corners for an image of the given size.
    ///
    /// The arithmetic runs in pixel space in a fixed order (scale first,
    /// then offset by half the scaled size) and each corner is truncated
    /// toward zero. Changing the order or rounding instead would move
    /// boundaries by up to one pixel.
    ///
    /// Returns `None` when a corner is not finite or lies outside
    /// `±PixelBox::COORD_LIMIT`.
    pub fn to_pixel(&self, image_width: u32, image_height: u32) -> Option<PixelBox> {
        let img_w = image_width as f64;
        let img_h = image_height as f64;

        let abs_w = self.w * img_w;
        let abs_h = self.h * img_h;
        let abs_x = self.cx * img_w;
        let abs_y = self.cy * img_h;

        Some(PixelBox {
            xmin: truncate_corner(abs_x - abs_w / 2.0)?,
            ymin: truncate_corner(abs_y - abs_h / 2.0)?,
            xmax: truncate_corner(abs_x + abs_w / 2.0)?,
            ymax: truncate_corner(abs_y + abs_h / 2.0)?,
        })
    }
}

fn truncate_corner(value: f64) -> Option<i64> {
    let corner = value.trunc();
    let limit = PixelBox::COORD_LIMIT as f64;
    (corner.is_finite() && corner.abs() <= limit).then_some(corner as i64)
}

/// An axis-aligned box in absolute pixel corners (xmin, ymin, xmax, ymax).
///
/// Like the rest of the model this does not enforce `min <= max`; a box
/// built from out-of-range YOLO values is written out as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl PixelBox {
    /// Largest corner magnitude produced by conversion or accepted from VOC.
    /// Widths and areas of boxes within this bound fit in an `i64`.
    pub const COORD_LIMIT: i64 = 1 << 30;

    /// Whether every corner lies within `±COORD_LIMIT`.
    pub fn in_coord_range(&self) -> bool {
        [self.xmin, self.ymin, self.xmax, self.ymax]
            .iter()
            .all(|corner| corner.unsigned_abs() <= Self::COORD_LIMIT as u64)
    }

    /// Creates a box from explicit corners.
    #[inline]
    pub fn from_xyxy(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// May be negative if the box is malformed (xmax < xmin).
    #[inline]
    pub fn width(&self) -> i64 {
        self.xmax.saturating_sub(self.xmin)
    }

    /// May be negative if the box is malformed (ymax < ymin).
    #[inline]
    pub fn height(&self) -> i64 {
        self.ymax.saturating_sub(self.ymin)
    }

    /// Saturates instead of overflowing for boxes outside `COORD_LIMIT`.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width().saturating_mul(self.height())
    }

    /// Converts to COCO's `[x, y, width, height]` with (x, y) the top-left corner.
    #[inline]
    pub fn to_xywh(&self) -> [i64; 4] {
        [self.xmin, self.ymin, self.width(), self.height()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yolo(cx: f64, cy: f64, w: f64, h: f64) -> YoloBox {
        YoloBox {
            class_id: 0,
            cx,
            cy,
            w,
            h,
        }
    }

    #[test]
    fn test_centered_box_on_square_image() {
        let px = yolo(0.5, 0.5, 0.2, 0.2).to_pixel(100, 100).expect("in range");
        assert_eq!(px, PixelBox::from_xyxy(40, 40, 60, 60));
    }

    #[test]
    fn test_box_on_wide_image() {
        let px = yolo(0.5, 0.5, 0.4, 0.6).to_pixel(200, 100).expect("in range");
        assert_eq!(px, PixelBox::from_xyxy(60, 20, 140, 80));
        assert_eq!(px.to_xywh(), [60, 20, 80, 60]);
        assert_eq!(px.area(), 4800);
    }

    #[test]
    fn test_fractional_corners_truncate() {
        // abs_x = 15.5, abs_w = 5.5 -> 12.75 and 18.25
        let px = yolo(0.155, 0.5, 0.055, 0.5).to_pixel(100, 10).expect("in range");
        assert_eq!(px.xmin, 12);
        assert_eq!(px.xmax, 18);
    }

    #[test]
    fn test_negative_corner_truncates_toward_zero() {
        // abs_x - abs_w/2 = -0.5 truncates to 0, where floor would give -1
        let px = yolo(0.0, 0.5, 0.01, 0.5).to_pixel(100, 10).expect("in range");
        assert_eq!(px.xmin, 0);
        assert_eq!(px.xmax, 0);
    }

    #[test]
    fn test_malformed_box_dimensions() {
        let px = PixelBox::from_xyxy(50, 50, 10, 40);
        assert_eq!(px.width(), -40);
        assert_eq!(px.height(), -10);
        assert_eq!(px.area(), 400);
    }

    #[test]
    fn test_unbounded_values_have_no_pixel_box() {
        assert_eq!(yolo(f64::NAN, 0.5, 0.2, 0.2).to_pixel(100, 100), None);
        assert_eq!(yolo(0.5, 0.5, f64::INFINITY, 0.2).to_pixel(100, 100), None);
        assert_eq!(yolo(0.5, 0.5, 1e300, 0.2).to_pixel(100, 100), None);
        assert_eq!(yolo(0.5, 0.5, 0.2, 0.2).to_pixel(u32::MAX, 100).map(|b| b.xmin), None);
    }

    #[test]
    fn test_extreme_corners_saturate() {
        let px = PixelBox::from_xyxy(i64::MIN, 0, i64::MAX, 10);
        assert!(!px.in_coord_range());
        assert_eq!(px.width(), i64::MAX);
        assert_eq!(px.area(), i64::MAX);
    }
}
