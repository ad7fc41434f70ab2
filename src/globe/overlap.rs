//! Marker de-cluttering.
//!
//! A short, fixed-length relaxation in screen space: every marker is pulled back towards its
//! anchor and pushed away from neighbours closer than `2 * radius + clearance`. Alpha cools each
//! step so the anchor pull fades while collisions keep resolving. Nothing is retained between
//! calls and nothing is random, so identical input gives identical output.

use eframe::egui::{Pos2, Vec2, vec2};

/// Golden angle in radians; spreads coincident pairs over distinct directions.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Separation used to split exactly coincident markers.
const JIGGLE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapResolver {
    /// Marker glyph radius in points
    pub radius: f32,
    /// Extra gap kept between neighbouring glyphs
    pub clearance: f32,
    /// Number of relaxation steps, run unconditionally
    pub iterations: usize,
    /// Spring constant pulling markers towards their anchors
    pub anchor_strength: f32,
    /// Fraction of an overlap corrected per step
    pub collide_strength: f32,
    /// Fraction of velocity lost per step
    pub velocity_decay: f32,
}

impl Default for OverlapResolver {
    fn default() -> Self {
        Self {
            radius: 6.0,
            clearance: 2.0,
            iterations: 120,
            anchor_strength: 0.1,
            collide_strength: 0.7,
            velocity_decay: 0.4,
        }
    }
}

impl OverlapResolver {
    pub fn min_distance(&self) -> f32 {
        2.0 * self.radius + self.clearance
    }

    /// Returns adjusted positions, index-aligned with `anchors`.
    pub fn resolve(&self, anchors: &[Pos2]) -> Vec<Pos2> {
        if anchors.len() < 2 {
            return anchors.to_vec();
        }

        let min_distance = self.min_distance();
        let alpha_min = 0.001_f32;
        let alpha_decay = 1.0 - alpha_min.powf(1.0 / 300.0);
        let mut alpha = 1.0_f32;

        let mut positions = anchors.to_vec();
        let mut velocities = vec![Vec2::ZERO; anchors.len()];

        for _ in 0..self.iterations {
            alpha -= alpha * alpha_decay;

            for ((velocity, position), anchor) in velocities.iter_mut().zip(&positions).zip(anchors) {
                *velocity += (*anchor - *position) * self.anchor_strength * alpha;
            }

            for i in 0..positions.len() {
                for j in (i + 1)..positions.len() {
                    let predicted_i = positions[i] + velocities[i];
                    let predicted_j = positions[j] + velocities[j];
                    let mut delta = predicted_j - predicted_i;
                    let mut distance = delta.length();
                    if distance >= min_distance {
                        continue;
                    }
                    if distance < JIGGLE {
                        delta = coincident_direction(i, j) * JIGGLE;
                        distance = JIGGLE;
                    }
                    let push = delta * ((min_distance - distance) / distance * self.collide_strength * 0.5);
                    velocities[i] -= push;
                    velocities[j] += push;
                }
            }

            for (position, velocity) in positions.iter_mut().zip(velocities.iter_mut()) {
                *velocity *= 1.0 - self.velocity_decay;
                *position += *velocity;
            }
        }

        positions
    }
}

fn coincident_direction(i: usize, j: usize) -> Vec2 {
    let angle = (i * 31 + j) as f32 * GOLDEN_ANGLE;
    vec2(angle.cos(), angle.sin())
}
