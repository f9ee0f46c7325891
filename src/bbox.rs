use nalgebra as na;
use opencv::core;
use serde::{Deserialize, Serialize};
use serde_derive::{Deserialize, Serialize};
use std::marker::PhantomData;

pub trait BBoxFormat: std::fmt::Debug {}

/// Left-top-width-height format, contains left top corner and width-height
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Ltwh;
impl BBoxFormat for Ltwh {}

/// Left-top-right-bottom format, contains left top and right bottom corners
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Ltrb;
impl BBoxFormat for Ltrb {}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BBox<F: BBoxFormat + Serialize + Deserialize<'static> + PartialEq>(
    [f32; 4],
    PhantomData<F>,
);

impl<F: BBoxFormat + Serialize + Deserialize<'static> + PartialEq> From<BBox<F>> for [f32; 4] {
    fn from(bbox: BBox<F>) -> Self {
        bbox.0
    }
}

impl<F: BBoxFormat + Serialize + Deserialize<'static> + PartialEq> BBox<F> {
    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.0
    }
}

impl BBox<Ltwh> {
    #[inline]
    pub fn ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        BBox([left, top, width, height], Default::default())
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn as_ltrb(&self) -> BBox<Ltrb> {
        self.into()
    }
}

impl BBox<Ltrb> {
    #[inline]
    pub fn ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        BBox([left, top, right, bottom], Default::default())
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn as_ltwh(&self) -> BBox<Ltwh> {
        self.into()
    }

    /// Truncates the corners to whole pixels and clamps them into the frame.
    /// A box fully outside the frame clips to zero area.
    pub fn clip(&self, frame_width: i32, frame_height: i32) -> PixelBox {
        let left = (self.0[0] as i32).clamp(0, frame_width);
        let top = (self.0[1] as i32).clamp(0, frame_height);
        let right = (self.0[2] as i32).clamp(0, frame_width).max(left);
        let bottom = (self.0[3] as i32).clamp(0, frame_height).max(top);

        PixelBox {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl<'a> From<&'a BBox<Ltwh>> for BBox<Ltrb> {
    #[inline]
    fn from(v: &'a BBox<Ltwh>) -> Self {
        Self(
            [v.0[0], v.0[1], v.0[0] + v.0[2], v.0[1] + v.0[3]],
            Default::default(),
        )
    }
}

impl<'a> From<&'a BBox<Ltrb>> for BBox<Ltwh> {
    #[inline]
    fn from(v: &'a BBox<Ltrb>) -> Self {
        Self(
            [v.0[0], v.0[1], v.0[2] - v.0[0], v.0[3] - v.0[1]],
            Default::default(),
        )
    }
}

/// Integer-pixel box, already clamped into frame bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelBox {
    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Truncating integer midpoint of the box.
    #[inline]
    pub fn centroid(&self) -> na::Point2<i32> {
        na::Point2::new(
            (self.left + self.right) / 2,
            (self.top + self.bottom) / 2,
        )
    }

    #[inline]
    pub fn rect(&self) -> core::Rect {
        core::Rect::new(self.left, self.top, self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_clipped(b: PixelBox, w: i32, h: i32) {
        assert!(0 <= b.left && b.left <= b.right && b.right <= w);
        assert!(0 <= b.top && b.top <= b.bottom && b.bottom <= h);
    }

    #[test]
    fn clip_inside_is_identity() {
        let b = BBox::ltrb(10.0, 20.0, 110.0, 220.0).clip(640, 480);
        assert_eq!(
            b,
            PixelBox {
                left: 10,
                top: 20,
                right: 110,
                bottom: 220
            }
        );
        assert_clipped(b, 640, 480);
    }

    #[test]
    fn clip_clamps_partially_outside() {
        let b = BBox::ltrb(-30.0, -5.0, 700.0, 500.0).clip(640, 480);
        assert_eq!(
            b,
            PixelBox {
                left: 0,
                top: 0,
                right: 640,
                bottom: 480
            }
        );
        assert_clipped(b, 640, 480);
    }

    #[test]
    fn clip_fully_outside_is_zero_area() {
        let b = BBox::ltrb(-100.0, -100.0, -10.0, -10.0).clip(640, 480);
        assert_clipped(b, 640, 480);
        assert!(b.is_empty());

        let b = BBox::ltrb(700.0, 500.0, 800.0, 600.0).clip(640, 480);
        assert_clipped(b, 640, 480);
        assert!(b.is_empty());
    }

    #[test]
    fn centroid_is_truncating_midpoint() {
        let b = BBox::ltrb(100.0, 50.0, 200.0, 150.0).clip(640, 480);
        assert_eq!(b.centroid(), nalgebra::Point2::new(150, 100));

        // odd sums truncate toward zero
        let b = BBox::ltrb(0.0, 0.0, 5.0, 7.0).clip(640, 480);
        assert_eq!(b.centroid(), nalgebra::Point2::new(2, 3));
    }

    #[test]
    fn centroid_is_deterministic() {
        let b = BBox::ltrb(3.7, 8.2, 91.9, 44.1);
        assert_eq!(b.clip(640, 480), b.clip(640, 480));
        assert_eq!(
            b.clip(640, 480).centroid(),
            b.clip(640, 480).centroid()
        );
    }

    #[test]
    fn ltwh_ltrb_round_trip() {
        let b = BBox::ltwh(10.0, 20.0, 30.0, 40.0);
        let r = b.as_ltrb();
        assert_eq!(r, BBox::ltrb(10.0, 20.0, 40.0, 60.0));
        assert_eq!(r.as_ltwh(), b);
    }
}
