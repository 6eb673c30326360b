//! Image boxes from a page's object tree.
//!
//! Figures are often wrapped in form XObjects, so the walk descends into
//! forms and maps every nested image box from form space to page space
//! through the chain of form matrices.

use pdfcrop_core::NativeBounds;

/// Forms nested deeper than this are not searched.
pub const MAX_FORM_DEPTH: usize = 15;

/// A PDF affine matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// `self × outer`: apply `self` first, then `outer`.
    pub fn concat(&self, outer: &Transform) -> Transform {
        Transform {
            a: self.a * outer.a + self.b * outer.c,
            b: self.a * outer.b + self.b * outer.d,
            c: self.c * outer.a + self.d * outer.c,
            d: self.c * outer.b + self.d * outer.d,
            e: self.e * outer.a + self.f * outer.c + outer.e,
            f: self.e * outer.b + self.f * outer.d + outer.f,
        }
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Axis-aligned box around the four transformed corners of `bounds`.
    pub fn transform_bounds(&self, bounds: &NativeBounds) -> NativeBounds {
        if *self == Self::identity() {
            return *bounds;
        }
        let corners = [
            self.transform_point(bounds.left, bounds.bottom),
            self.transform_point(bounds.right, bounds.bottom),
            self.transform_point(bounds.left, bounds.top),
            self.transform_point(bounds.right, bounds.top),
        ];
        corners.iter().skip(1).fold(
            NativeBounds::new(corners[0].0, corners[0].1, corners[0].0, corners[0].1),
            |acc, &(x, y)| {
                NativeBounds::new(
                    acc.left.min(x),
                    acc.bottom.min(y),
                    acc.right.max(x),
                    acc.top.max(y),
                )
            },
        )
    }
}

/// The parts of a page object the image walk looks at.
pub trait ObjectNode: Sized {
    /// Bounds in the parent's space if this is an image object.
    fn image_bounds(&self) -> Option<NativeBounds>;

    /// Form matrix and child objects if this is a form XObject.
    fn form_children(&self) -> Option<(Transform, Vec<Self>)>;
}

/// Page-space bounds of every image in `objects`, including images inside
/// (nested) form XObjects, in content order.
pub fn collect_image_bounds<N, I>(objects: I) -> Vec<NativeBounds>
where
    N: ObjectNode,
    I: IntoIterator<Item = N>,
{
    let mut found = Vec::new();
    walk(objects, &Transform::identity(), 0, &mut found);
    found
}

fn walk<N, I>(objects: I, to_page: &Transform, depth: usize, found: &mut Vec<NativeBounds>)
where
    N: ObjectNode,
    I: IntoIterator<Item = N>,
{
    for object in objects {
        if let Some(bounds) = object.image_bounds() {
            found.push(to_page.transform_bounds(&bounds));
            continue;
        }
        if depth >= MAX_FORM_DEPTH {
            tracing::debug!(depth, "form nesting too deep, not descending");
            continue;
        }
        if let Some((matrix, children)) = object.form_children() {
            walk(children, &matrix.concat(to_page), depth + 1, found);
        }
    }
}
