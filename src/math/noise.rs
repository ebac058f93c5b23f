use rand::Rng;

const LATTICE: usize = 256;

/// Lattice value noise in two dimensions
#[derive(Debug, Clone)]
pub struct ValueNoise {
    values: Vec<f32>,
    perm: Vec<usize>,
}

impl ValueNoise {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let values = (0..LATTICE).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        let mut perm: Vec<usize> = (0..LATTICE).collect();
        for i in (1..LATTICE).rev() {
            let j = rng.gen_range(0..=i);
            perm.swap(i, j);
        }
        Self { values, perm }
    }

    fn lattice(&self, x: i32, y: i32) -> f32 {
        let xi = x.rem_euclid(LATTICE as i32) as usize;
        let yi = y.rem_euclid(LATTICE as i32) as usize;
        self.values[self.perm[(self.perm[xi] + yi) % LATTICE]]
    }

    /// Smoothly interpolated sample in [-1, 1]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (sx, sy) = (smoothstep(fx), smoothstep(fy));
        let (ix, iy) = (x0 as i32, y0 as i32);

        let top = lerp(self.lattice(ix, iy), self.lattice(ix + 1, iy), sx);
        let bottom = lerp(self.lattice(ix, iy + 1), self.lattice(ix + 1, iy + 1), sx);
        lerp(top, bottom, sy)
    }
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_in_range() {
        let noise = ValueNoise::new(&mut StdRng::seed_from_u64(7));
        for i in 0..200 {
            let v = noise.sample(i as f32 * 0.37, i as f32 * 0.11);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_lattice_points_are_exact() {
        let noise = ValueNoise::new(&mut StdRng::seed_from_u64(3));
        assert_eq!(noise.sample(4.0, 9.0), noise.lattice(4, 9));
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = ValueNoise::new(&mut StdRng::seed_from_u64(11));
        let b = ValueNoise::new(&mut StdRng::seed_from_u64(11));
        assert_eq!(a.sample(1.5, 2.25), b.sample(1.5, 2.25));
    }
}
