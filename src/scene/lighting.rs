use glam::Vec3;

use crate::config::FogConfig;
use crate::math::Color;

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Unit vector pointing from the surface toward the light
    pub direction: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn from_position(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            direction: position.normalize_or(Vec3::Y),
            color,
            intensity,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
}

/// Scene-wide lights: ambient, sky/ground hemisphere, key, rim and the blue
/// city glow hanging over the map
#[derive(Debug, Clone)]
pub struct LightRig {
    pub ambient: Color,
    pub ambient_intensity: f32,
    pub sky: Color,
    pub ground: Color,
    pub hemisphere_intensity: f32,
    pub key: DirectionalLight,
    pub rim: DirectionalLight,
    pub city_glow: PointLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: Color::from_hex(0x5B6CFF),
            ambient_intensity: 0.25,
            sky: Color::from_hex(0x4F9BFF),
            ground: Color::from_hex(0x020409),
            hemisphere_intensity: 0.6,
            key: DirectionalLight::from_position(Vec3::new(-160.0, 260.0, 140.0), Color::WHITE, 0.9),
            rim: DirectionalLight::from_position(Vec3::new(200.0, 180.0, -240.0), Color::from_hex(0x5BC0FF), 0.6),
            city_glow: PointLight {
                position: Vec3::new(0.0, 80.0, 0.0),
                color: Color::from_hex(0x2563EB),
                intensity: 0.8,
                range: 400.0,
            },
        }
    }
}

impl LightRig {
    /// Lambert shading of a surface with albedo `base`
    pub fn shade(&self, base: Color, position: Vec3, normal: Vec3) -> Color {
        let n = normal.normalize_or(Vec3::Y);

        let mut light = self.ambient.scale(self.ambient_intensity);
        let sky_share = n.y * 0.5 + 0.5;
        light = light.add(
            self.ground
                .lerp(self.sky, sky_share)
                .scale(self.hemisphere_intensity),
        );

        for dir in [&self.key, &self.rim] {
            let lambert = n.dot(dir.direction).max(0.0);
            light = light.add(dir.color.scale(dir.intensity * lambert));
        }

        let to_glow = self.city_glow.position - position;
        let distance = to_glow.length();
        if distance < self.city_glow.range {
            let falloff = (1.0 - distance / self.city_glow.range).powi(2);
            let lambert = n.dot(to_glow / distance.max(f32::EPSILON)).max(0.0);
            light = light.add(
                self.city_glow
                    .color
                    .scale(self.city_glow.intensity * falloff * lambert),
            );
        }

        base.modulate(light)
    }
}

/// Exponential-squared distance fog
#[derive(Debug, Clone, Copy)]
pub struct Fog {
    pub color: Color,
    pub density: f32,
}

impl Fog {
    pub fn from_config(config: &FogConfig) -> Self {
        Self {
            color: Color::from_hex(config.color),
            density: config.density,
        }
    }

    /// Share of fog colour at `distance`, in [0, 1]
    pub fn factor(&self, distance: f32) -> f32 {
        let d = self.density * distance.max(0.0);
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }

    pub fn apply(&self, color: Color, distance: f32) -> Color {
        color.lerp(self.color, self.factor(distance))
    }
}
