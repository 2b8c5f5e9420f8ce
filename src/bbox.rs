use nalgebra as na;
use std::marker::PhantomData;

pub trait BBoxFormat: std::fmt::Debug + Copy + PartialEq {}

/// Left-top-width-height format, contains left top corner and width-height
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ltwh;
impl BBoxFormat for Ltwh {}

/// Left-top-right-bottom format, contains left top and right bottom corners
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ltrb;
impl BBoxFormat for Ltrb {}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BBox<F: BBoxFormat>([f32; 4], PhantomData<F>);

impl<F: BBoxFormat> From<BBox<F>> for [f32; 4] {
    fn from(bbox: BBox<F>) -> Self {
        bbox.0
    }
}

impl<F: BBoxFormat> BBox<F> {
    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.0
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    #[inline]
    pub fn as_vector(&self) -> na::Vector4<f32> {
        na::Vector4::new(self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl BBox<Ltrb> {
    /// Builds a box from two corners given in any order.
    #[inline]
    pub fn ltrb(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        BBox([x1, y1, x2, y2], PhantomData).normalized()
    }

    #[inline]
    pub fn from_vector(v: &na::Vector4<f32>) -> Self {
        Self::ltrb(v[0], v[1], v[2], v[3])
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
    pub fn center(&self) -> [f32; 2] {
        [
            (self.0[0] + self.0[2]) * 0.5,
            (self.0[1] + self.0[3]) * 0.5,
        ]
    }

    /// Swaps reversed corners so that `x1 <= x2` and `y1 <= y2`.
    #[inline]
    pub fn normalized(&self) -> Self {
        // min/max would silently drop a NaN corner
        if !self.is_finite() {
            return *self;
        }

        let [x1, y1, x2, y2] = self.0;

        BBox(
            [x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)],
            PhantomData,
        )
    }

    #[inline]
    pub fn is_normalized(&self) -> bool {
        self.0[0] <= self.0[2] && self.0[1] <= self.0[3]
    }

    #[inline]
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self::ltrb(self.0[0] * sx, self.0[1] * sy, self.0[2] * sx, self.0[3] * sy)
    }

    /// Linear blend towards `other`; `t = 0` gives `self`, `t = 1` gives `other`.
    #[inline]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let a = self.as_vector();
        let b = other.as_vector();

        Self::from_vector(&(a + (b - a) * t))
    }

    #[inline]
    pub fn as_ltwh(&self) -> BBox<Ltwh> {
        self.into()
    }
}

impl BBox<Ltwh> {
    #[inline]
    pub fn ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        BBox([left, top, width, height], PhantomData)
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

impl<'a> From<&'a BBox<Ltwh>> for BBox<Ltrb> {
    #[inline]
    fn from(v: &'a BBox<Ltwh>) -> Self {
        BBox::ltrb(v.0[0], v.0[1], v.0[2] + v.0[0], v.0[3] + v.0[1])
    }
}

impl<'a> From<&'a BBox<Ltrb>> for BBox<Ltwh> {
    #[inline]
    fn from(v: &'a BBox<Ltrb>) -> Self {
        BBox::ltwh(v.0[0], v.0[1], v.0[2] - v.0[0], v.0[3] - v.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_corners_are_swapped() {
        let reversed = BBox::ltrb(300.0, 50.0, 100.0, 200.0);
        let ordered = BBox::ltrb(100.0, 50.0, 300.0, 200.0);

        assert_eq!(reversed, ordered);
        assert!(reversed.is_normalized());
        assert_eq!(reversed.as_slice(), &[100.0, 50.0, 300.0, 200.0]);
    }

    #[test]
    fn ltwh_conversion() {
        let b = BBox::ltrb(10.0, 20.0, 40.0, 60.0);
        let w = b.as_ltwh();

        assert_eq!((w.left(), w.top(), w.width(), w.height()), (10.0, 20.0, 30.0, 40.0));
        assert_eq!(w.as_ltrb(), b);
    }

    #[test]
    fn lerp_hits_both_ends() {
        let a = BBox::ltrb(0.0, 0.0, 10.0, 10.0);
        let b = BBox::ltrb(100.0, 50.0, 120.0, 70.0);

        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5).as_slice(), &[50.0, 25.0, 65.0, 40.0]);
    }

    #[test]
    fn non_finite_is_detected() {
        assert!(!BBox::ltrb(f32::NAN, 0.0, 1.0, 1.0).is_finite());
        assert!(!BBox::ltrb(0.0, 0.0, f32::INFINITY, 1.0).is_finite());
        assert!(BBox::ltrb(0.0, 0.0, 1.0, 1.0).is_finite());
    }
}
