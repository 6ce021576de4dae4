//! Arena terrain generation using noise functions.
//!
//! **Seed-based determinism:** All noise is derived from `config.seed` so that
//! the same seed always produces the same heightmap at every (world_x, world_z).
//! A reset rebuilds the identical arena.

use noise::{NoiseFn, Perlin, Simplex};

/// Derive a deterministic u32 noise seed from a world seed and an offset.
/// Same (seed, offset) always gives the same result so terrain is reproducible.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Configuration for terrain generation.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Size of terrain in world units.
    pub size: f32,
    /// Number of height samples per side.
    pub resolution: u32,
    /// Maximum height of terrain.
    pub height_scale: f32,
    /// Noise frequency (lower = smoother).
    pub frequency: f64,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Lacunarity (frequency multiplier per octave).
    pub lacunarity: f64,
    /// Persistence (amplitude multiplier per octave).
    pub persistence: f64,
    /// Seed for random generation.
    pub seed: u64,
    /// World-space X of the terrain center.
    pub offset_x: f32,
    /// World-space Z of the terrain center.
    pub offset_z: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 256.0,
            resolution: 129,
            height_scale: 12.0,
            frequency: 0.015,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 0,
            offset_x: 0.0,
            offset_z: 0.0,
        }
    }
}

/// Generated terrain data.
#[derive(Debug, Clone)]
pub struct TerrainData {
    /// Row-major heights (index = z * resolution + x), world Y.
    pub heightmap: Vec<f32>,
    pub config: TerrainConfig,
}

impl TerrainData {
    /// Generate terrain from configuration.
    ///
    /// A `height_scale` of zero yields a flat arena at Y = 0.
    pub fn generate(config: TerrainConfig) -> Self {
        let config = TerrainConfig {
            resolution: config.resolution.max(2),
            ..config
        };
        let perlin = Perlin::new(deterministic_noise_seed(config.seed, 0));
        let simplex = Simplex::new(deterministic_noise_seed(config.seed, 1));

        let res = config.resolution as usize;
        let step = config.size / (config.resolution - 1) as f32;
        let mut heightmap = Vec::with_capacity(res * res);

        for z in 0..res {
            for x in 0..res {
                let world_x = x as f32 * step - config.size / 2.0 + config.offset_x;
                let world_z = z as f32 * step - config.size / 2.0 + config.offset_z;
                let height = Self::fractal_noise(
                    &perlin,
                    &simplex,
                    world_x as f64,
                    world_z as f64,
                    &config,
                );
                heightmap.push(height as f32 * config.height_scale);
            }
        }

        log::debug!(
            "Generated {}x{} terrain (seed {}, size {})",
            res,
            res,
            config.seed,
            config.size
        );

        Self { heightmap, config }
    }

    /// Grid resolution (samples per side).
    pub fn resolution(&self) -> usize {
        self.config.resolution as usize
    }

    /// Distance between neighbouring samples in world units.
    pub fn step(&self) -> f32 {
        self.config.size / (self.config.resolution - 1) as f32
    }

    /// Height of grid sample `(x, z)`.
    pub fn height_at_sample(&self, x: usize, z: usize) -> f32 {
        self.heightmap[z * self.resolution() + x]
    }

    /// Sample height at a world position.
    pub fn sample_height(&self, x: f32, z: f32) -> f32 {
        let res = self.resolution();
        let half_size = self.config.size / 2.0;
        let step = self.step();

        // Convert to grid coordinates (account for offset)
        let gx = (x - self.config.offset_x + half_size) / step;
        let gz = (z - self.config.offset_z + half_size) / step;

        let x0 = (gx.floor().max(0.0) as usize).min(res - 2);
        let z0 = (gz.floor().max(0.0) as usize).min(res - 2);

        let fx = (gx - x0 as f32).clamp(0.0, 1.0);
        let fz = (gz - z0 as f32).clamp(0.0, 1.0);

        // Heights at four corners of the grid cell
        let h00 = self.heightmap[z0 * res + x0]; // top-left
        let h10 = self.heightmap[z0 * res + x0 + 1]; // top-right
        let h01 = self.heightmap[(z0 + 1) * res + x0]; // bottom-left
        let h11 = self.heightmap[(z0 + 1) * res + x0 + 1]; // bottom-right

        // Triangle-based interpolation matching the heightfield triangulation.
        // Triangle 1: top-left, bottom-left, top-right  (when fx + fz <= 1)
        // Triangle 2: top-right, bottom-left, bottom-right (when fx + fz > 1)
        if fx + fz <= 1.0 {
            h00 + fx * (h10 - h00) + fz * (h01 - h00)
        } else {
            h11 + (1.0 - fx) * (h01 - h11) + (1.0 - fz) * (h10 - h11)
        }
    }

    /// Steepest slope (degrees) between grid sample `(x, z)` and its 4-neighbours.
    pub fn slope_degrees_at_sample(&self, x: usize, z: usize) -> f32 {
        let res = self.resolution();
        let step = self.step();
        let h = self.height_at_sample(x, z);
        let mut max_rise = 0.0_f32;
        let neighbours = [
            (x.wrapping_sub(1), z),
            (x + 1, z),
            (x, z.wrapping_sub(1)),
            (x, z + 1),
        ];
        for (nx, nz) in neighbours {
            if nx < res && nz < res {
                max_rise = max_rise.max((self.height_at_sample(nx, nz) - h).abs());
            }
        }
        (max_rise / step).atan().to_degrees()
    }

    fn fractal_noise(
        perlin: &Perlin,
        simplex: &Simplex,
        x: f64,
        z: f64,
        config: &TerrainConfig,
    ) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = config.frequency;
        let mut max_value = 0.0;

        for _ in 0..config.octaves.max(1) {
            // Mix Perlin and Simplex for variety
            let perlin_sample = perlin.get([x * frequency, z * frequency]);
            let simplex_sample = simplex.get([x * frequency + 1000.0, z * frequency + 1000.0]);

            value += (perlin_sample * 0.7 + simplex_sample * 0.3) * amplitude;
            max_value += amplitude;

            amplitude *= config.persistence;
            frequency *= config.lacunarity;
        }

        // Normalize to 0-1 range
        (value / max_value + 1.0) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same seed and config must produce identical heightmaps (reset replays the arena).
    #[test]
    fn terrain_deterministic_same_seed() {
        let config = TerrainConfig {
            size: 64.0,
            resolution: 24,
            height_scale: 15.0,
            seed: 98765,
            ..Default::default()
        };
        let a = TerrainData::generate(config.clone());
        let b = TerrainData::generate(config);
        assert_eq!(a.heightmap.len(), 24 * 24);
        assert_eq!(a.heightmap, b.heightmap);
    }

    /// Different seeds must produce different terrain.
    #[test]
    fn terrain_different_seed_different_heights() {
        let config_a = TerrainConfig {
            size: 64.0,
            resolution: 24,
            seed: 11111,
            ..Default::default()
        };
        let config_b = TerrainConfig {
            seed: 22222,
            ..config_a.clone()
        };
        let a = TerrainData::generate(config_a);
        let b = TerrainData::generate(config_b);
        assert_ne!(a.heightmap, b.heightmap);
    }

    #[test]
    fn flat_terrain_samples_zero_with_no_slope() {
        let terrain = TerrainData::generate(TerrainConfig {
            size: 32.0,
            resolution: 9,
            height_scale: 0.0,
            ..Default::default()
        });
        assert_eq!(terrain.sample_height(3.3, -7.1), 0.0);
        assert_eq!(terrain.slope_degrees_at_sample(4, 4), 0.0);
    }

    #[test]
    fn sample_height_matches_grid_samples() {
        let terrain = TerrainData::generate(TerrainConfig {
            size: 40.0,
            resolution: 11,
            height_scale: 10.0,
            seed: 7,
            ..Default::default()
        });
        // Sample (3, 5) sits at world (-20 + 3*4, -20 + 5*4).
        let expected = terrain.height_at_sample(3, 5);
        assert!((terrain.sample_height(-8.0, 0.0) - expected).abs() < 1e-4);
    }
}
