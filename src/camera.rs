//! Pan/zoom view onto the world canvas.
//!
//! Screen coordinates are logical viewport pixels with the origin at the top-left corner of a
//! square viewport of side `viewport`. World coordinates are where strokes live. At the home
//! position (camera on the viewport centre, zoom 1) both spaces coincide.

use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::math::clamp_finite;

pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 6.0;

/// World point shown at the viewport centre, and the zoom factor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

#[derive(Clone, Debug)]
pub struct CameraModel {
    camera: Camera,
    viewport: f64,
}

impl CameraModel {
    pub fn new(viewport: f64) -> Self {
        let viewport = if viewport.is_finite() && viewport > 0.0 {
            viewport
        } else {
            1.0
        };
        Self {
            camera: Self::home_for(viewport),
            viewport,
        }
    }

    fn home_for(viewport: f64) -> Camera {
        Camera {
            x: viewport / 2.0,
            y: viewport / 2.0,
            zoom: 1.0,
        }
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    pub fn center(&self) -> Point {
        Point::new(self.viewport / 2.0, self.viewport / 2.0)
    }

    pub fn is_home(&self) -> bool {
        self.camera == Self::home_for(self.viewport)
    }

    pub fn reset(&mut self) {
        self.camera = Self::home_for(self.viewport);
    }

    /// World to screen: translate to the centre, scale by zoom, translate by the negated camera.
    pub fn view_transform(&self) -> Affine {
        let c = self.camera;
        Affine::translate(self.center().to_vec2())
            * Affine::scale(c.zoom)
            * Affine::translate((-c.x, -c.y))
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        let c = self.camera;
        let rel = (screen - self.center()) / c.zoom;
        Point::new(rel.x + c.x, rel.y + c.y)
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.view_transform() * world
    }

    /// Zoom to `zoom` keeping the world point under `anchor` fixed on screen.
    ///
    /// Zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`; non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64, anchor: Point) -> bool {
        let Some(zoom) = clamp_finite(zoom, MIN_ZOOM, MAX_ZOOM) else {
            tracing::warn!(zoom, "ignoring non-finite zoom");
            return false;
        };
        if !(anchor.x.is_finite() && anchor.y.is_finite()) {
            return false;
        }
        let pinned = self.screen_to_world(anchor);
        let rel = (anchor - self.center()) / zoom;
        self.camera = Camera {
            x: pinned.x - rel.x,
            y: pinned.y - rel.y,
            zoom,
        };
        true
    }

    /// Multiply the zoom by `factor` around `anchor`.
    pub fn zoom_by(&mut self, factor: f64, anchor: Point) -> bool {
        self.set_zoom(self.camera.zoom * factor, anchor)
    }

    /// Drag the view by a screen-space delta; the content follows the pointer.
    pub fn pan_by(&mut self, screen_delta: Vec2) -> bool {
        if !(screen_delta.x.is_finite() && screen_delta.y.is_finite()) {
            return false;
        }
        self.camera.x -= screen_delta.x / self.camera.zoom;
        self.camera.y -= screen_delta.y / self.camera.zoom;
        true
    }

    /// Centre the view on a world point.
    pub fn set_pan(&mut self, world: Point) -> bool {
        if !(world.x.is_finite() && world.y.is_finite()) {
            return false;
        }
        self.camera.x = world.x;
        self.camera.y = world.y;
        true
    }
}

#[cfg(test)]
#[path = "../tests/unit/camera.rs"]
mod tests;
