// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fault-line terrain generation.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tarn_data::HeightField;

/// Procedural terrain by repeated random fault lines.
///
/// Each step draws a random line across the grid and raises every cell on
/// one side by one unit while lowering the other side by one.
#[derive(Debug, Clone)]
pub struct FaultLineGenerator {
    seed: u64,
    rng: SmallRng,
}

impl FaultLineGenerator {
    /// A generator whose output is fully determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The seed this generator started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Produces a normalized `width` x `height` field after `steps` faults.
    ///
    /// Successive calls continue the same random sequence, so each
    /// regeneration yields new terrain.
    pub fn generate(&mut self, width: usize, height: usize, steps: u32) -> HeightField {
        let mut field = HeightField::new(width, height);
        if field.is_empty() {
            return field;
        }

        let (w, h) = (width as f32, height as f32);
        for _ in 0..steps {
            let x1 = self.rng.random::<f32>() * w;
            let z1 = self.rng.random::<f32>() * h;
            let x2 = self.rng.random::<f32>() * w;
            let z2 = self.rng.random::<f32>() * h;
            let (fault_x, fault_z) = (x2 - x1, z2 - z1);

            for x in 0..width {
                for z in 0..height {
                    let (to_x, to_z) = (x2 - x as f32, z2 - z as f32);
                    let side = fault_x * to_z - fault_z * to_x;
                    let step = if side > 0.0 { 1.0 } else { -1.0 };
                    if let Some(value) = field.get(x, z) {
                        field.set(x, z, value + step);
                    }
                }
            }
        }

        field.normalize();
        log::debug!(
            "Fault-line terrain {}x{} after {} steps, range {}",
            width,
            height,
            steps,
            field.high_value()
        );
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_terrain() {
        let a = FaultLineGenerator::new(7).generate(16, 16, 50);
        let b = FaultLineGenerator::new(7).generate(16, 16, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn successive_calls_differ() {
        let mut generator = FaultLineGenerator::new(7);
        let first = generator.generate(16, 16, 50);
        let second = generator.generate(16, 16, 50);
        assert_ne!(first, second);
    }

    #[test]
    fn output_is_normalized_and_integral() {
        let field = FaultLineGenerator::new(3).generate(12, 12, 40);
        assert_eq!(field.low_value(), 0.0);
        assert!(field
            .values()
            .iter()
            .all(|v| *v >= 0.0 && *v <= field.high_value() && v.fract() == 0.0));
        assert!(field.high_value() <= 80.0);
    }

    #[test]
    fn zero_steps_gives_a_flat_field() {
        let field = FaultLineGenerator::new(1).generate(4, 4, 0);
        assert!(field.values().iter().all(|v| *v == 0.0));
        assert!(FaultLineGenerator::new(1).generate(0, 4, 10).is_empty());
    }
}
