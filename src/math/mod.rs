mod aabb;
mod color;
mod easing;
mod noise;
mod ray;

pub use aabb::AABB;
pub use color::{hex_to_rgb, hsv_to_rgb, parse_color, rgb_to_bytes};
pub use easing::{ease_out_cubic, exponential_in_out, lerp, quadratic_in_out, Easing};
pub use noise::ValueNoise;
pub use ray::{intersect_aabb, Ray};
