use glam::{Mat4, Vec2, Vec3};

use crate::camera::{Projected, SmoothCamera};
use crate::core::{Canvas, DisplayContext, DrawOp, LayerOutput, Rgba, ScreenLabel};
use crate::math::Color;
use crate::scene::{
    Fog, ImagePlane, LightRig, MapGroup, SceneGraph, SparkBurst, StationEntity, Trail, TrackTube,
    TrainEntity,
};

const SHADOW_COLOR: u32 = 0x01060F;
const HALO_COLOR: u32 = 0x1E3A8A;
const FRAME_COLOR: u32 = 0x2563EB;
const GRID_CENTER_COLOR: u32 = 0x1D4ED8;
const GRID_COLOR: u32 = 0x0F172A;
const SUPPORT_COLOR: u32 = 0x111827;
const PILLAR_COLOR: u32 = 0x0F172A;
const ROOF_COLOR: u32 = 0xCBD5F5;
const UNDERCARRIAGE_COLOR: u32 = 0x0F172A;
const SIDE_WINDOW_GLOW: u32 = 0x1D4ED8;
const FRONT_WINDOW_COLOR: u32 = 0x111C34;
const FRONT_WINDOW_GLOW: u32 = 0x2563EB;
const REAR_WINDOW_GLOW: u32 = 0x991B1B;
const TAIL_LIGHT_COLOR: u32 = 0xF87171;
const INTERIOR_GLOW: u32 = 0x38BDF8;

/// Segments used for horizontal discs (halo, station glow)
const DISC_SEGMENTS: usize = 32;
/// Tiles per side for the plain map planes, keeps fog and clipping local
const PLANE_TILES: u32 = 8;
/// Painter's bias for decals drawn on top of a surface at the same depth
const DECAL_BIAS: f32 = 0.05;

/// Screen-space draw op with the view depth it is sorted by
#[derive(Debug, Clone, Copy)]
struct Primitive {
    depth: f32,
    op: DrawOp,
}

struct View<'a> {
    camera: &'a SmoothCamera,
    view_projection: Mat4,
    context: &'a DisplayContext,
    lights: &'a LightRig,
    fog: Fog,
    eye: Vec3,
}

impl<'a> View<'a> {
    fn new(graph: &'a SceneGraph, context: &'a DisplayContext) -> Self {
        Self {
            camera: &graph.camera,
            view_projection: graph.camera.view_projection(),
            context,
            lights: &graph.lights,
            fog: graph.fog,
            eye: graph.camera.position(),
        }
    }

    fn project(&self, point: Vec3) -> Option<Projected> {
        self.camera.project_with(&self.view_projection, point, self.context)
    }

    fn project_all<const N: usize>(&self, points: [Vec3; N]) -> Option<[Projected; N]> {
        let mut out = [Projected {
            screen: Vec2::ZERO,
            depth: 0.0,
            scale: 0.0,
        }; N];
        for (slot, point) in out.iter_mut().zip(points) {
            *slot = self.project(point)?;
        }
        Some(out)
    }

    /// Fogged RGBA for a colour seen at `depth`
    fn finish(&self, color: Color, depth: f32, alpha: f32) -> Rgba {
        self.fog.apply(color, depth).to_rgba8(alpha)
    }

    /// Normal of a vertical surface turned toward the viewer
    fn facing_normal(&self, at: Vec3) -> Vec3 {
        let to_eye = self.eye - at;
        Vec3::new(to_eye.x, 0.0, to_eye.z).normalize_or(Vec3::Z)
    }
}

/// Software renderer: projects the scene graph through the camera and
/// rasterises it into an RGBA buffer.
///
/// The map stack is drawn first in fixed order (it lies under everything),
/// the rest is depth-sorted back to front.
pub struct SceneRenderer {
    canvas: Canvas,
    primitives: Vec<Primitive>,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self {
            canvas: Canvas::new(1, 1),
            primitives: Vec::new(),
        }
    }

    pub fn render(&mut self, graph: &SceneGraph, context: &DisplayContext) -> LayerOutput {
        self.canvas.resize(context.width, context.height);
        let view = View::new(graph, context);

        self.canvas.push(DrawOp::Clear(graph.fog.color.to_rgba8(1.0)));
        if let Some(map) = graph.map() {
            self.draw_map(&view, map);
        }

        self.primitives.clear();
        let emissive = graph.map().map_or(0.6, |m| m.track_emissive);
        let glow_opacity = graph.map().map_or(0.35, |m| m.rail_glow_opacity);
        if let Some(tube) = &graph.tube {
            self.collect_track(&view, tube, emissive, glow_opacity);
        }
        for station in graph.stations() {
            self.collect_station(&view, station);
        }
        if let Some(trail) = graph.trail() {
            let color = graph.tube.as_ref().map_or(Color::WHITE, |t| t.glow_color);
            self.collect_trail(&view, trail, color);
        }
        if let Some(train) = graph.train() {
            self.collect_train(&view, train);
        }
        if let Some(field) = graph.particles() {
            let color = field.color;
            for position in &field.positions {
                if let Some(p) = view.project(*position) {
                    let radius = (0.25 * field.size * p.scale).clamp(0.6, 4.0);
                    self.disc(p, radius, view.finish(color, p.depth, 0.75));
                }
            }
        }
        if let Some(sparks) = graph.sparks() {
            self.collect_sparks(&view, sparks);
        }

        // Far to near; stable so decals keep their order at equal depth
        self.primitives.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        for primitive in &self.primitives {
            self.canvas.push(primitive.op);
        }
        self.canvas.flush();

        LayerOutput::new(self.canvas.pixels().to_vec())
    }

    fn disc(&mut self, at: Projected, radius: f32, color: Rgba) {
        self.primitives.push(Primitive {
            depth: at.depth,
            op: DrawOp::Disc {
                center: at.screen,
                radius,
                color,
            },
        });
    }

    fn line(&mut self, a: Projected, b: Projected, width: f32, color: Rgba, bias: f32) {
        self.primitives.push(Primitive {
            depth: (a.depth + b.depth) * 0.5 - bias,
            op: DrawOp::Line {
                from: a.screen,
                to: b.screen,
                width,
                color,
            },
        });
    }

    fn quad(&mut self, corners: [Projected; 4], color: Rgba, bias: f32) {
        let depth = corners.iter().map(|c| c.depth).sum::<f32>() * 0.25 - bias;
        let [a, b, c, d] = corners.map(|c| c.screen);
        self.primitives.push(Primitive {
            depth,
            op: DrawOp::Triangle { a, b, c, color },
        });
        self.primitives.push(Primitive {
            depth,
            op: DrawOp::Triangle { a, b: c, c: d, color },
        });
    }

    /// Horizontal disc as a fan, pushed into `sink`
    fn horizontal_disc(view: &View, center: Vec3, radius: f32, color: Color, alpha: f32, sink: &mut Vec<Primitive>) {
        let Some(hub) = view.project(center) else {
            return;
        };
        let rgba = view.finish(color, hub.depth, alpha);
        let ring: Vec<Option<Projected>> = (0..DISC_SEGMENTS)
            .map(|i| {
                let angle = i as f32 / DISC_SEGMENTS as f32 * std::f32::consts::TAU;
                view.project(center + Vec3::new(angle.cos(), 0.0, angle.sin()) * radius)
            })
            .collect();
        for i in 0..DISC_SEGMENTS {
            if let (Some(a), Some(b)) = (ring[i], ring[(i + 1) % DISC_SEGMENTS]) {
                sink.push(Primitive {
                    depth: hub.depth,
                    op: DrawOp::Triangle {
                        a: hub.screen,
                        b: a.screen,
                        c: b.screen,
                        color: rgba,
                    },
                });
            }
        }
    }

    fn draw_map(&mut self, view: &View, map: &MapGroup) {
        let mut ops = Vec::new();

        let shadow = Color::from_hex(SHADOW_COLOR);
        Self::map_plane(view, map, (470.0, 320.0), MapGroup::SHADOW_HEIGHT, (PLANE_TILES, PLANE_TILES), |_, _| shadow, 0.3, &mut ops);

        Self::draw_map_grid(view, map, &mut ops);

        let mut halo = Vec::new();
        Self::horizontal_disc(
            view,
            map.to_world(Vec3::new(0.0, MapGroup::HALO_HEIGHT, 0.0)),
            MapGroup::HALO_RADIUS,
            Color::from_hex(HALO_COLOR),
            0.18,
            &mut halo,
        );
        ops.extend(halo.into_iter().map(|p| p.op));

        let normal = map.normal();
        let lit = view.lights.shade(map.base_color, map.to_world(Vec3::ZERO), normal);
        Self::map_plane(view, map, (map.width, map.depth), MapGroup::BASE_HEIGHT, (PLANE_TILES, PLANE_TILES), |_, _| lit, 0.96, &mut ops);

        if let Some(image) = &map.image {
            Self::draw_image(view, map, image, &mut ops);
        }

        let (hw, hd) = (map.width * 0.5, map.depth * 0.5);
        let corners = [
            Vec3::new(-hw, MapGroup::FRAME_HEIGHT, -hd),
            Vec3::new(hw, MapGroup::FRAME_HEIGHT, -hd),
            Vec3::new(hw, MapGroup::FRAME_HEIGHT, hd),
            Vec3::new(-hw, MapGroup::FRAME_HEIGHT, hd),
        ]
        .map(|c| map.to_world(c));
        let frame = Color::from_hex(FRAME_COLOR);
        for i in 0..4 {
            if let (Some(a), Some(b)) = (view.project(corners[i]), view.project(corners[(i + 1) % 4])) {
                ops.push(DrawOp::Line {
                    from: a.screen,
                    to: b.screen,
                    width: 1.5,
                    color: view.finish(frame, (a.depth + b.depth) * 0.5, 0.45),
                });
            }
        }

        for op in ops {
            self.canvas.push(op);
        }
    }

    fn draw_image(view: &View, map: &MapGroup, image: &ImagePlane, ops: &mut Vec<DrawOp>) {
        let normal = map.normal();
        let lights = view.lights;
        let origin = map.to_world(Vec3::ZERO);
        Self::map_plane(
            view,
            map,
            (map.width, map.depth),
            MapGroup::IMAGE_HEIGHT,
            (image.cols, image.rows),
            |col, row| {
                let cell = image.cells[(row * image.cols + col) as usize];
                // Imagery is mostly self-lit; lighting only tints it
                cell.lerp(lights.shade(cell, origin, normal), 0.35)
            },
            0.98,
            ops,
        );
    }

    /// Map-local rectangle centred on the group origin, tiled `cols` x `rows`,
    /// first row at the far edge
    #[allow(clippy::too_many_arguments)]
    fn map_plane(
        view: &View,
        map: &MapGroup,
        (width, depth): (f32, f32),
        height: f32,
        (cols, rows): (u32, u32),
        color_at: impl Fn(u32, u32) -> Color,
        alpha: f32,
        ops: &mut Vec<DrawOp>,
    ) {
        let stride = cols as usize + 1;
        let vertices: Vec<Option<Projected>> = (0..=rows)
            .flat_map(|row| (0..=cols).map(move |col| (col, row)))
            .map(|(col, row)| {
                let x = -width * 0.5 + width * col as f32 / cols as f32;
                let z = -depth * 0.5 + depth * row as f32 / rows as f32;
                view.project(map.to_world(Vec3::new(x, height, z)))
            })
            .collect();

        for row in 0..rows {
            for col in 0..cols {
                let i = row as usize * stride + col as usize;
                let corners = (vertices[i], vertices[i + 1], vertices[i + stride + 1], vertices[i + stride]);
                let (Some(a), Some(b), Some(c), Some(d)) = corners else {
                    continue;
                };
                let depth = (a.depth + b.depth + c.depth + d.depth) * 0.25;
                let color = view.finish(color_at(col, row), depth, alpha);
                ops.push(DrawOp::Triangle {
                    a: a.screen,
                    b: b.screen,
                    c: c.screen,
                    color,
                });
                ops.push(DrawOp::Triangle {
                    a: a.screen,
                    b: c.screen,
                    c: d.screen,
                    color,
                });
            }
        }
    }

    fn draw_map_grid(view: &View, map: &MapGroup, ops: &mut Vec<DrawOp>) {
        let divisions = map.grid_divisions.max(1);
        let half = map.grid_size * 0.5;
        let step = map.grid_size / divisions as f32;
        let (sin, cos) = std::f32::consts::FRAC_PI_4.sin_cos();
        let rotate = |x: f32, z: f32| Vec3::new(x * cos - z * sin, MapGroup::GRID_HEIGHT, x * sin + z * cos);

        for i in 0..=divisions {
            let offset = -half + step * i as f32;
            let color = Color::from_hex(if i * 2 == divisions { GRID_CENTER_COLOR } else { GRID_COLOR });
            for (from, to) in [
                (rotate(offset, -half), rotate(offset, half)),
                (rotate(-half, offset), rotate(half, offset)),
            ] {
                if let (Some(a), Some(b)) = (view.project(map.to_world(from)), view.project(map.to_world(to))) {
                    ops.push(DrawOp::Line {
                        from: a.screen,
                        to: b.screen,
                        width: 1.0,
                        color: view.finish(color, (a.depth + b.depth) * 0.5, 0.18),
                    });
                }
            }
        }
    }

    fn collect_track(&mut self, view: &View, tube: &TrackTube, emissive: f32, glow_opacity: f32) {
        let support_color = Color::from_hex(SUPPORT_COLOR);
        for support in &tube.supports {
            if let (Some(a), Some(b)) = (view.project(support.base), view.project(support.top)) {
                let width = (3.5 * (a.scale + b.scale) * 0.5).max(1.0);
                let lit = view.lights.shade(support_color, support.top, view.facing_normal(support.top));
                self.line(a, b, width, view.finish(lit, (a.depth + b.depth) * 0.5, 0.9), 0.0);
            }
        }

        let glow = emissive.max(0.0);
        let projected: Vec<Option<Projected>> = tube.samples.iter().map(|p| view.project(*p)).collect();
        let n = tube.samples.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let (Some(a), Some(b)) = (projected[i], projected[j]) else {
                continue;
            };
            let mid = (tube.samples[i] + tube.samples[j]) * 0.5;
            let normal = (view.facing_normal(mid) + Vec3::Y).normalize_or(Vec3::Y);
            let lit = view
                .lights
                .shade(tube.color, mid, normal)
                .add(tube.emissive.scale(glow));
            let width = (2.0 * tube.radius * (a.scale + b.scale) * 0.5).max(1.0);
            self.line(a, b, width, view.finish(lit, (a.depth + b.depth) * 0.5, 1.0), 0.0);
        }

        let lift = Vec3::Y * tube.radius;
        let projected: Vec<Option<Projected>> = tube
            .glow_samples
            .iter()
            .map(|p| view.project(*p + lift))
            .collect();
        let n = tube.glow_samples.len();
        for i in 0..n {
            if let (Some(a), Some(b)) = (projected[i], projected[(i + 1) % n]) {
                let color = view.finish(tube.glow_color, (a.depth + b.depth) * 0.5, glow_opacity);
                self.line(a, b, 1.2, color, DECAL_BIAS);
            }
        }
    }

    fn collect_station(&mut self, view: &View, station: &StationEntity) {
        let pillar_top = station.pillar_base + Vec3::Y * station.pillar_height;
        if let (Some(a), Some(b)) = (view.project(station.pillar_base), view.project(pillar_top)) {
            let width = (4.2 * (a.scale + b.scale) * 0.5).max(1.0);
            let lit = view.lights.shade(Color::from_hex(PILLAR_COLOR), pillar_top, view.facing_normal(pillar_top));
            self.line(a, b, width, view.finish(lit, (a.depth + b.depth) * 0.5, 0.9), 0.0);
        }

        Self::horizontal_disc(
            view,
            station.pillar_base + Vec3::Y * 0.15,
            station.glow_radius,
            station.color,
            0.28,
            &mut self.primitives,
        );

        if let Some(light) = view.project(station.light_position) {
            let radius = (2.0 + station.light_intensity * 1.5) * light.scale;
            let alpha = (0.08 + 0.06 * station.light_intensity).clamp(0.0, 0.45);
            self.disc(light, radius.max(1.0), view.finish(station.color, light.depth, alpha));
        }

        if let Some(marker) = view.project(station.marker) {
            let radius = (station.marker_radius * station.marker_scale * marker.scale).max(1.0);
            let lit = view
                .lights
                .shade(station.color, station.marker, view.eye - station.marker)
                .add(station.color.scale(0.5 + station.pulse));
            self.disc(marker, radius, view.finish(lit, marker.depth, 1.0));

            if station.pulse > 0.0 {
                let ring = radius * (1.5 + (1.0 - station.pulse) * 2.5);
                let color = station.color.lerp(Color::WHITE, 0.3);
                // Nudged back so the marker stays on top
                let mut behind = marker;
                behind.depth += DECAL_BIAS;
                self.disc(behind, ring, view.finish(color, marker.depth, 0.35 * station.pulse));
            }
        }
    }

    fn collect_trail(&mut self, view: &View, trail: &Trail, color: Color) {
        let lift = Vec3::Y * 3.0;
        let points: Vec<Vec3> = trail.points().map(|p| *p + lift).collect();
        let count = points.len().max(1) as f32;
        for (i, pair) in points.windows(2).enumerate() {
            if let (Some(a), Some(b)) = (view.project(pair[0]), view.project(pair[1])) {
                let fade = 1.0 - i as f32 / count;
                let width = (1.2 * (a.scale + b.scale) * 0.5).max(1.0);
                self.line(a, b, width, view.finish(color, a.depth, 0.45 * fade), 0.0);
            }
        }
    }

    fn collect_train(&mut self, view: &View, train: &TrainEntity) {
        let body = train.body_color;
        self.train_box(view, train, Vec3::new(0.0, 6.2, 0.0), Vec3::new(3.2, 3.4, 12.0), body);
        self.train_box(view, train, Vec3::new(0.0, 9.0, 0.0), Vec3::new(3.0, 0.8, 12.0), Color::from_hex(ROOF_COLOR));
        self.train_box(
            view,
            train,
            Vec3::new(0.0, 2.5, 0.0),
            Vec3::new(3.1, 0.6, 9.0),
            Color::from_hex(UNDERCARRIAGE_COLOR),
        );

        let side_glass = train.window_color.add(Color::from_hex(SIDE_WINDOW_GLOW).scale(0.35));
        for side in [-1.0f32, 1.0] {
            let x = 3.22 * side;
            self.train_panel(
                view,
                train,
                [
                    Vec3::new(x, 4.9, -8.0),
                    Vec3::new(x, 4.9, 8.0),
                    Vec3::new(x, 7.5, 8.0),
                    Vec3::new(x, 7.5, -8.0),
                ],
                Vec3::X * side,
                side_glass,
                0.8,
            );
        }

        let front_glass = Color::from_hex(FRONT_WINDOW_COLOR);
        for (z, glow, strength) in [(12.21f32, FRONT_WINDOW_GLOW, 0.4), (-12.21, REAR_WINDOW_GLOW, 0.3)] {
            self.train_panel(
                view,
                train,
                [
                    Vec3::new(-2.9, 4.4, z),
                    Vec3::new(2.9, 4.4, z),
                    Vec3::new(2.9, 7.8, z),
                    Vec3::new(-2.9, 7.8, z),
                ],
                Vec3::Z * z.signum(),
                front_glass.add(Color::from_hex(glow).scale(strength)),
                0.92,
            );
        }

        // Cabin light bleeding through the glass
        if let Some(mut cabin) = view.project(train.local_to_world(Vec3::new(0.0, 6.2, 0.0))) {
            cabin.depth -= 4.0;
            self.disc(cabin, 5.0 * cabin.scale, view.finish(Color::from_hex(INTERIOR_GLOW), cabin.depth, 0.1));
        }

        for (i, x) in [-1.2f32, 1.2].into_iter().enumerate() {
            let Some(lamp) = view.project(train.local_to_world(Vec3::new(x, 4.8, 12.6))) else {
                continue;
            };
            let strength = train.headlights[i] / 1.6;
            let mut front = lamp;
            front.depth -= DECAL_BIAS;
            self.disc(front, (0.6 * strength * lamp.scale).max(1.0), view.finish(train.headlight_color, lamp.depth, 1.0));
            self.disc(front, 3.0 * strength * lamp.scale, view.finish(train.headlight_color, lamp.depth, 0.22));
        }

        let tail = Color::from_hex(TAIL_LIGHT_COLOR);
        for x in [-1.1f32, 1.1] {
            if let Some(mut lamp) = view.project(train.local_to_world(Vec3::new(x, 4.7, -12.4))) {
                lamp.depth -= DECAL_BIAS;
                self.disc(lamp, (0.4 * lamp.scale).max(1.0), view.finish(tail, lamp.depth, 1.0));
            }
        }
    }

    /// Axis-aligned box in train space, back faces culled
    fn train_box(&mut self, view: &View, train: &TrainEntity, center: Vec3, half: Vec3, color: Color) {
        for axis in 0..3 {
            for sign in [-1.0f32, 1.0] {
                let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
                let mut normal = Vec3::ZERO;
                normal[axis] = sign;
                let mut du = Vec3::ZERO;
                du[u] = half[u];
                let mut dv = Vec3::ZERO;
                dv[v] = half[v];

                let face = center + normal * half[axis];
                self.train_panel(
                    view,
                    train,
                    [face - du - dv, face + du - dv, face + du + dv, face - du + dv],
                    normal,
                    color,
                    1.0,
                );
            }
        }
    }

    /// Flat quad in train space; skipped when facing away from the viewer
    #[allow(clippy::too_many_arguments)]
    fn train_panel(
        &mut self,
        view: &View,
        train: &TrainEntity,
        corners: [Vec3; 4],
        local_normal: Vec3,
        color: Color,
        alpha: f32,
    ) {
        let world = corners.map(|c| train.local_to_world(c));
        let normal = train.local_to_world(local_normal) - train.position;
        let center = (world[0] + world[1] + world[2] + world[3]) * 0.25;
        if normal.dot(view.eye - center) <= 0.0 {
            return;
        }
        let Some(projected) = view.project_all(world) else {
            return;
        };
        let lit = view.lights.shade(color, center, normal);
        let depth = projected.iter().map(|p| p.depth).sum::<f32>() * 0.25;
        // Panels sitting on a box face win the tie
        let bias = if alpha < 1.0 { DECAL_BIAS } else { 0.0 };
        self.quad(projected, view.finish(lit, depth, alpha), bias);
    }

    fn collect_sparks(&mut self, view: &View, sparks: &SparkBurst) {
        let color = sparks.color.lerp(Color::WHITE, 0.4);
        for spark in sparks.alive() {
            if let Some(p) = view.project(spark.position) {
                let radius = (0.9 * p.scale * spark.life).max(0.75);
                self.disc(p, radius, view.finish(color, p.depth, spark.life));
            }
        }
    }
}

/// Labels above each station marker; `highlight` is shown at full emphasis
pub fn station_labels(graph: &SceneGraph, context: &DisplayContext, highlight: Option<usize>) -> Vec<ScreenLabel> {
    let view_projection = graph.camera.view_projection();
    graph
        .stations()
        .filter_map(|station| {
            let anchor = station.marker + Vec3::Y * (station.marker_radius * station.marker_scale + 4.0);
            let p = graph.camera.project_with(&view_projection, anchor, context)?;
            let emphasis = if highlight == Some(station.index) {
                1.0
            } else {
                0.7 + 0.3 * station.pulse
            };
            let [r, g, b, _] = station.color.to_rgba8(1.0);
            Some(ScreenLabel {
                text: station.name.clone(),
                x: p.screen.x,
                y: p.screen.y,
                color: [r, g, b],
                emphasis,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::scene::SceneGraphBuilder;

    fn graph() -> SceneGraph {
        let mut config = SceneConfig::default();
        config.map.image = Default::default();
        SceneGraphBuilder::new(&config).build()
    }

    #[test]
    fn renders_full_opaque_frame() {
        let graph = graph();
        let ctx = DisplayContext::new(160, 90);
        let mut renderer = SceneRenderer::new();
        let output = renderer.render(&graph, &ctx);

        assert_eq!(output.pixels.len(), ctx.pixel_count());
        assert!(output.pixels.iter().all(|p| p[3] == 255));
    }

    #[test]
    fn scene_is_not_blank() {
        let graph = graph();
        let ctx = DisplayContext::new(160, 90);
        let output = SceneRenderer::new().render(&graph, &ctx);
        let background = graph.fog.color.to_rgba8(1.0);
        let drawn = output.pixels.iter().filter(|p| **p != background).count();
        assert!(drawn > ctx.pixel_count() / 20);
    }

    #[test]
    fn follows_resize() {
        let graph = graph();
        let mut renderer = SceneRenderer::new();
        renderer.render(&graph, &DisplayContext::new(64, 64));
        let output = renderer.render(&graph, &DisplayContext::new(32, 16));
        assert_eq!(output.pixels.len(), 32 * 16);
    }

    #[test]
    fn labels_for_visible_stations() {
        let graph = graph();
        let ctx = DisplayContext::new(1280, 720);
        let labels = station_labels(&graph, &ctx, Some(1));
        assert!(!labels.is_empty());
        assert!(labels.iter().all(|l| l.x.is_finite() && l.y.is_finite()));

        let highlighted = &graph.station(1).unwrap().name;
        for label in &labels {
            let expected = if &label.text == highlighted { 1.0 } else { 0.7 };
            assert_eq!(label.emphasis, expected);
        }
    }
}
