//! Pure point and rectangle math in canvas pixel coordinates.
//!
//! All functions here are side-effect free. Points are integer canvas points
//! (`IVec2`, origin at the top-left of the frozen frame, y growing downward).

use bevy::math::IVec2;

/// Axis-aligned pixel rectangle. `w`/`h` may be negative before
/// [`normalize_rect`] is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn top_right(&self) -> IVec2 {
        IVec2::new(self.right(), self.y)
    }

    pub fn bottom_left(&self) -> IVec2 {
        IVec2::new(self.x, self.bottom())
    }

    pub fn bottom_right(&self) -> IVec2 {
        IVec2::new(self.right(), self.bottom())
    }

    /// Corners in handle order: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [IVec2; 4] {
        [
            self.top_left(),
            self.top_right(),
            self.bottom_left(),
            self.bottom_right(),
        ]
    }

    /// Inclusive containment on both edges.
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 && self.h <= 0
    }
}

/// Axis-aligned rectangle spanning two points, with non-negative size.
pub fn rect_from_points(a: IVec2, b: IVec2) -> PixelRect {
    PixelRect {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        w: (b.x - a.x).abs(),
        h: (b.y - a.y).abs(),
    }
}

/// Flip negative extents into positive ones, then clamp the rectangle so it
/// lies within `[0, bounds_w) x [0, bounds_h)` with `origin + size <= bounds`.
pub fn normalize_rect(mut rect: PixelRect, bounds_w: i32, bounds_h: i32) -> PixelRect {
    if rect.w < 0 {
        rect.x += rect.w;
        rect.w = -rect.w;
    }
    if rect.h < 0 {
        rect.y += rect.h;
        rect.h = -rect.h;
    }
    rect.x = rect.x.clamp(0, (bounds_w - 1).max(0));
    rect.y = rect.y.clamp(0, (bounds_h - 1).max(0));
    rect.w = rect.w.clamp(0, (bounds_w - rect.x).max(0));
    rect.h = rect.h.clamp(0, (bounds_h - rect.y).max(0));
    rect
}

/// Clamp a point into the canvas; used for pointer samples that leave the
/// canvas mid-drag.
pub fn clamp_to_canvas(p: IVec2, width: i32, height: i32) -> IVec2 {
    IVec2::new(
        p.x.clamp(0, (width - 1).max(0)),
        p.y.clamp(0, (height - 1).max(0)),
    )
}

pub fn distance_squared(a: IVec2, b: IVec2) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    dx * dx + dy * dy
}

/// Squared distance from `p` to the segment `a`-`b`, projecting onto the
/// segment and clamping the projection parameter to `[0, 1]`.
pub fn distance_to_segment_squared(p: IVec2, a: IVec2, b: IVec2) -> f64 {
    let vx = f64::from(b.x - a.x);
    let vy = f64::from(b.y - a.y);
    let wx = f64::from(p.x - a.x);
    let wy = f64::from(p.y - a.y);
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f64::EPSILON {
        // Degenerate segment
        return wx * wx + wy * wy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let dx = wx - vx * t;
    let dy = wy - vy * t;
    dx * dx + dy * dy
}

/// Snap `point` to the nearest horizontal, vertical or 45-degree direction
/// from `anchor`.
///
/// A direction wins outright when its magnitude is at least twice the other;
/// otherwise the point moves onto the diagonal, keeping the larger magnitude
/// and both signs.
pub fn snap_45(anchor: IVec2, point: IVec2) -> IVec2 {
    let dx = point.x - anchor.x;
    let dy = point.y - anchor.y;
    let adx = dx.abs();
    let ady = dy.abs();
    if adx >= ady * 2 {
        return IVec2::new(point.x, anchor.y);
    }
    if ady >= adx * 2 {
        return IVec2::new(anchor.x, point.y);
    }
    let d = adx.max(ady);
    IVec2::new(
        anchor.x + if dx >= 0 { d } else { -d },
        anchor.y + if dy >= 0 { d } else { -d },
    )
}

/// Triangle for an arrow head pointing at `end`: the tip followed by the two
/// wing points. `None` when the shaft is shorter than one pixel.
pub fn arrow_head(start: IVec2, end: IVec2, thickness: i32) -> Option<[IVec2; 3]> {
    let dx = f64::from(end.x - start.x);
    let dy = f64::from(end.y - start.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return None;
    }
    let ux = dx / len;
    let uy = dy / len;
    let head_len = f64::from((thickness * 4).max(8));
    let wing = f64::from((thickness * 2).max(5));
    let ex = f64::from(end.x);
    let ey = f64::from(end.y);
    let left = IVec2::new(
        (ex - ux * head_len - uy * wing).round() as i32,
        (ey - uy * head_len + ux * wing).round() as i32,
    );
    let right = IVec2::new(
        (ex - ux * head_len + uy * wing).round() as i32,
        (ey - uy * head_len - ux * wing).round() as i32,
    );
    Some([end, left, right])
}
