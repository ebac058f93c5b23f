use glam::Vec2;
use rand::Rng;

use crate::error::{GalleryError, Result};
use crate::math::ValueNoise;

/// Repeat factor applied to ground textures
pub const GROUND_REPEAT: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrap {
    #[default]
    Clamp,
    Repeat,
}

/// RGBA8 pixel data with sampling parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub wrap: Wrap,
    pub repeat: Vec2,
}

impl TextureData {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(GalleryError::decode(
                "texture",
                format!("expected {} bytes for {}x{}, got {}", expected, width, height, pixels.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
            wrap: Wrap::Clamp,
            repeat: Vec2::ONE,
        })
    }

    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: rgba.repeat(width as usize * height as usize),
            wrap: Wrap::Clamp,
            repeat: Vec2::ONE,
        }
    }

    pub fn with_repeat(mut self, x: f32, y: f32) -> Self {
        self.wrap = Wrap::Repeat;
        self.repeat = Vec2::new(x, y);
        self
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Nearest-neighbour sample; `uv` in [0, 1] before repeat and offset
    pub fn sample(&self, uv: Vec2, offset: Vec2) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0, 0, 0, 255];
        }
        let scaled = uv * self.repeat + offset;
        let (u, v) = match self.wrap {
            Wrap::Repeat => (scaled.x.rem_euclid(1.0), scaled.y.rem_euclid(1.0)),
            Wrap::Clamp => (scaled.x.clamp(0.0, 1.0), scaled.y.clamp(0.0, 1.0)),
        };
        let x = (u * self.width as f32) as u32;
        let y = (v * self.height as f32) as u32;
        self.pixel(x, y)
    }
}

/// Uniform random grey noise, alpha 255
pub fn noise_texture(size: u32) -> TextureData {
    noise_texture_with(size, &mut rand::thread_rng())
}

pub fn noise_texture_with<R: Rng + ?Sized>(size: u32, rng: &mut R) -> TextureData {
    let count = size as usize * size as usize;
    let texels: Vec<[u8; 4]> = (0..count)
        .map(|_| {
            let grey: u8 = rng.gen();
            [grey, grey, grey, 255]
        })
        .collect();
    let pixels = bytemuck::cast_slice(&texels).to_vec();
    TextureData::new(size, size, pixels)
        .unwrap_or_else(|_| TextureData::solid(size, size, [0, 0, 0, 255]))
        .with_repeat(1.0, 1.0)
}

/// Value-noise field remapped to [0, 255], alpha 255
pub fn smooth_noise_texture(size: u32, scale: f32) -> TextureData {
    smooth_noise_texture_with(size, scale, &mut rand::thread_rng())
}

pub fn smooth_noise_texture_with<R: Rng + ?Sized>(size: u32, scale: f32, rng: &mut R) -> TextureData {
    let noise = ValueNoise::new(rng);
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let value = noise.sample(x as f32 * scale, y as f32 * scale);
            let grey = ((value + 1.0) * 0.5 * 255.0).round().clamp(0.0, 255.0) as u8;
            pixels.extend_from_slice(&[grey, grey, grey, 255]);
        }
    }
    TextureData {
        width: size,
        height: size,
        pixels,
        wrap: Wrap::Repeat,
        repeat: Vec2::ONE,
    }
}

/// Smooth noise tinted green, repeated across large ground tiles
pub fn grass_texture<R: Rng + ?Sized>(size: u32, rng: &mut R) -> TextureData {
    let mut texture = smooth_noise_texture_with(size, 0.1, rng).with_repeat(GROUND_REPEAT, GROUND_REPEAT);
    for texel in texture.pixels.chunks_exact_mut(4) {
        let shade = texel[0] as f32 / 255.0;
        texel[0] = (40.0 + shade * 50.0) as u8;
        texel[1] = (110.0 + shade * 90.0) as u8;
        texel[2] = (30.0 + shade * 40.0) as u8;
    }
    texture
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_texture_size_and_alpha() {
        let texture = noise_texture(128);
        assert_eq!(texture.pixels.len(), 4 * 128 * 128);
        assert!(texture.pixels.chunks_exact(4).all(|p| p[3] == 255));
        assert!(texture.pixels.chunks_exact(4).all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let a = noise_texture_with(16, &mut StdRng::seed_from_u64(42));
        let b = noise_texture_with(16, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_smooth_noise_size_and_alpha() {
        let texture = smooth_noise_texture_with(64, 0.1, &mut StdRng::seed_from_u64(1));
        assert_eq!(texture.pixels.len(), 4 * 64 * 64);
        assert!(texture.pixels.chunks_exact(4).all(|p| p[3] == 255));
        assert_eq!(texture.wrap, Wrap::Repeat);
    }

    #[test]
    fn test_grass_repeats_forty_times() {
        let texture = grass_texture(32, &mut StdRng::seed_from_u64(9));
        assert_eq!(texture.repeat, Vec2::splat(GROUND_REPEAT));
        assert!(texture.pixels.chunks_exact(4).all(|p| p[1] > p[0] && p[1] > p[2]));
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(TextureData::new(2, 2, vec![0; 15]).is_err());
        assert!(TextureData::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_sample_wraps_when_repeating() {
        let mut texture = TextureData::solid(2, 1, [0, 0, 0, 255]).with_repeat(1.0, 1.0);
        texture.pixels[4..8].copy_from_slice(&[255, 255, 255, 255]);
        assert_eq!(texture.sample(Vec2::new(0.75, 0.0), Vec2::ZERO)[0], 255);
        assert_eq!(texture.sample(Vec2::new(1.25, 0.0), Vec2::ZERO)[0], 0);
        assert_eq!(texture.sample(Vec2::new(0.25, 0.0), Vec2::new(0.5, 0.0))[0], 255);
    }

    #[test]
    fn test_zero_size_texture() {
        let texture = noise_texture(0);
        assert!(texture.pixels.is_empty());
        assert_eq!(texture.sample(Vec2::ZERO, Vec2::ZERO), [0, 0, 0, 255]);
    }
}
