/*!
Physics debug visualization.

Draws the collision geometry of every registered body through Rapier's
`DebugRenderPipeline`, into whatever graphics context the host provides via
[`RenderContext`]. Only runs during the physics-debug render pass.

Notes
- Rapier emits debug geometry in world space, so the context's per-entity world transform
  is forced to identity while drawing and restored afterwards by [`WorldTransformGuard`].
- One traversal per shader pass: the drawer looks each collider's parent body up in a
  style table built once per frame. Colliders of bodies missing from the table are skipped.
- Lines carry a [`LineStyle`] that only depends on whether the body is static or asleep.
*/

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use rapier3d::prelude::*;

use crate::types::Mat4;

/// HSLA color, as produced by Rapier's debug renderer.
pub type DebugColor = [f32; 4];

/// Draw style of a debug line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    /// Dynamic or kinematic body that is awake.
    Active,
    /// Fixed body, or a body the solver put to sleep.
    Inactive,
}

impl LineStyle {
    pub fn from_inactive(inactive: bool) -> Self {
        if inactive {
            LineStyle::Inactive
        } else {
            LineStyle::Active
        }
    }
}

/// Graphics-side capability consumed by the debug visualizer.
pub trait RenderContext {
    /// Is the active render pass the physics-debug pass?
    fn is_physics_debug_pass(&self) -> bool;

    /// Per-entity world transform currently bound on the device.
    fn world_transform(&self) -> Mat4;

    fn set_world_transform(&mut self, world: Mat4);

    /// Number of passes in the active shader technique.
    fn pass_count(&self) -> usize;

    /// Bind pass `index` of the active technique.
    fn apply_pass(&mut self, index: usize);

    /// Emit one world-space line segment.
    fn draw_line(&mut self, a: Point<Real>, b: Point<Real>, color: DebugColor, style: LineStyle);
}

/// Forces the context's world transform to identity; restores the saved one on drop.
pub struct WorldTransformGuard<'a, C: RenderContext + ?Sized> {
    ctx: &'a mut C,
    saved: Mat4,
}

impl<'a, C: RenderContext + ?Sized> WorldTransformGuard<'a, C> {
    pub fn identity(ctx: &'a mut C) -> Self {
        let saved = ctx.world_transform();
        ctx.set_world_transform(Mat4::identity());
        Self { ctx, saved }
    }
}

impl<C: RenderContext + ?Sized> Deref for WorldTransformGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctx
    }
}

impl<C: RenderContext + ?Sized> DerefMut for WorldTransformGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.ctx
    }
}

impl<C: RenderContext + ?Sized> Drop for WorldTransformGuard<'_, C> {
    fn drop(&mut self) {
        self.ctx.set_world_transform(self.saved);
    }
}

/// Line style of every body to draw, keyed by Rapier handle.
pub type BodyStyles = HashMap<RigidBodyHandle, LineStyle>;

/// Rapier debug backend forwarding the collider lines of the bodies in a [`BodyStyles`]
/// table to a context.
pub struct DebugDrawer<'a, C: RenderContext + ?Sized> {
    ctx: &'a mut C,
    styles: &'a BodyStyles,
    lines: usize,
}

impl<'a, C: RenderContext + ?Sized> DebugDrawer<'a, C> {
    pub fn new(ctx: &'a mut C, styles: &'a BodyStyles) -> Self {
        Self {
            ctx,
            styles,
            lines: 0,
        }
    }

    /// Number of line segments forwarded so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    fn style_of(&self, object: &DebugRenderObject) -> Option<LineStyle> {
        match object {
            DebugRenderObject::Collider(_, collider) => collider
                .parent()
                .and_then(|body| self.styles.get(&body).copied()),
            _ => None,
        }
    }
}

impl<C: RenderContext + ?Sized> DebugRenderBackend for DebugDrawer<'_, C> {
    fn filter_object(&self, object: DebugRenderObject) -> bool {
        self.style_of(&object).is_some()
    }

    fn draw_line(
        &mut self,
        object: DebugRenderObject,
        a: Point<Real>,
        b: Point<Real>,
        color: DebugColor,
    ) {
        let Some(style) = self.style_of(&object) else {
            return;
        };
        self.ctx.draw_line(a, b, color, style);
        self.lines += 1;
    }
}

/// Rapier debug pipeline configured to draw collider shapes only.
pub fn collider_pipeline() -> DebugRenderPipeline {
    DebugRenderPipeline::new(DebugRenderStyle::default(), DebugRenderMode::COLLIDER_SHAPES)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Recording context used by the visualizer and engine tests.
    pub(crate) struct RecordingContext {
        pub debug_pass: bool,
        pub world: Mat4,
        pub passes: usize,
        pub applied: Vec<usize>,
        pub lines: Vec<(Point<Real>, Point<Real>, LineStyle)>,
        pub world_during_draw: Vec<Mat4>,
    }

    impl RecordingContext {
        pub(crate) fn new(debug_pass: bool) -> Self {
            Self {
                debug_pass,
                world: Mat4::new_translation(&crate::types::Vec3::new(3.0, 4.0, 5.0)),
                passes: 1,
                applied: Vec::new(),
                lines: Vec::new(),
                world_during_draw: Vec::new(),
            }
        }
    }

    impl RenderContext for RecordingContext {
        fn is_physics_debug_pass(&self) -> bool {
            self.debug_pass
        }
        fn world_transform(&self) -> Mat4 {
            self.world
        }
        fn set_world_transform(&mut self, world: Mat4) {
            self.world = world;
        }
        fn pass_count(&self) -> usize {
            self.passes
        }
        fn apply_pass(&mut self, index: usize) {
            self.applied.push(index);
        }
        fn draw_line(
            &mut self,
            a: Point<Real>,
            b: Point<Real>,
            _color: DebugColor,
            style: LineStyle,
        ) {
            self.world_during_draw.push(self.world);
            self.lines.push((a, b, style));
        }
    }

    #[test]
    fn guard_sets_identity_and_restores_on_drop() {
        let mut ctx = RecordingContext::new(true);
        let saved = ctx.world;
        {
            let guard = WorldTransformGuard::identity(&mut ctx);
            assert_eq!(guard.world_transform(), Mat4::identity());
        }
        assert_eq!(ctx.world, saved);
    }

    fn two_body_scene() -> (RigidBodySet, ColliderSet, RigidBodyHandle, RigidBodyHandle) {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let crate_box = bodies.insert(RigidBodyBuilder::fixed().build());
        let ball = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(vector![5.0, 0.0, 0.0])
                .build(),
        );
        colliders.insert_with_parent(
            ColliderBuilder::cuboid(0.5, 0.5, 0.5).build(),
            crate_box,
            &mut bodies,
        );
        colliders.insert_with_parent(ColliderBuilder::ball(0.5).build(), ball, &mut bodies);
        (bodies, colliders, crate_box, ball)
    }

    #[test]
    fn drawer_skips_bodies_missing_from_the_table() {
        let (bodies, colliders, crate_box, _ball) = two_body_scene();
        let styles = BodyStyles::from([(crate_box, LineStyle::Inactive)]);

        let mut ctx = RecordingContext::new(true);
        let mut pipeline = collider_pipeline();
        let drawn = {
            let mut drawer = DebugDrawer::new(&mut ctx, &styles);
            pipeline.render_colliders(&mut drawer, &bodies, &colliders);
            drawer.lines()
        };

        assert!(drawn > 0);
        assert_eq!(ctx.lines.len(), drawn);
        // Every vertex of the unit cube at the origin stays within its half extents.
        let bound = 0.5 + 1.0e-4;
        assert!(ctx.lines.iter().all(|(a, b, style)| {
            *style == LineStyle::Inactive && a.coords.amax() <= bound && b.coords.amax() <= bound
        }));
    }

    #[test]
    fn single_traversal_styles_each_body() {
        let (bodies, colliders, crate_box, ball) = two_body_scene();
        let styles =
            BodyStyles::from([(crate_box, LineStyle::Inactive), (ball, LineStyle::Active)]);

        let mut ctx = RecordingContext::new(true);
        let mut drawer = DebugDrawer::new(&mut ctx, &styles);
        collider_pipeline().render_colliders(&mut drawer, &bodies, &colliders);

        assert!(ctx.lines.iter().any(|(_, _, style)| *style == LineStyle::Active));
        assert!(ctx.lines.iter().any(|(_, _, style)| *style == LineStyle::Inactive));
        assert!(ctx.lines.iter().all(|(a, _, style)| match style {
            LineStyle::Active => a.x > 4.0,
            LineStyle::Inactive => a.x < 1.0,
        }));
    }
}
