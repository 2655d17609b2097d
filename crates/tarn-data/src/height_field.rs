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

//! A 2D grid of elevation samples.

use tarn_core::math::normalize_range;

/// Rounds a grid dimension down to the nearest even number.
///
/// Heightmap sources truncate odd dimensions by one before sampling.
#[inline]
pub fn even_floor(dimension: usize) -> usize {
    dimension - dimension % 2
}

/// A `width` x `height` grid of scalar elevations and their value range.
///
/// Samples are addressed as `(x, z)` with `x` in `[0, width)` and `z` in
/// `[0, height)`. Storage is x-major: column `x` is contiguous.
///
/// After [`calculate_range`](Self::calculate_range) and
/// [`post_process`](Self::post_process) every sample lies in
/// `[0, high_value]` and `low_value` is `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    values: Vec<f32>,
    low_value: f32,
    high_value: f32,
}

impl HeightField {
    /// Creates a flat field with every sample at zero.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
            low_value: 0.0,
            high_value: 0.0,
        }
    }

    /// Creates a field by sampling `f(x, z)` for every cell.
    ///
    /// The range is not computed; call [`calculate_range`](Self::calculate_range).
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(width * height);
        for x in 0..width {
            for z in 0..height {
                values.push(f(x, z));
            }
        }
        Self {
            width,
            height,
            values,
            low_value: 0.0,
            high_value: 0.0,
        }
    }

    /// Grid extent along x.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid extent along z.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The lowest sample, as of the last range computation.
    #[inline]
    pub fn low_value(&self) -> f32 {
        self.low_value
    }

    /// The highest sample, as of the last range computation.
    #[inline]
    pub fn high_value(&self) -> f32 {
        self.high_value
    }

    /// Returns the sample at `(x, z)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> Option<f32> {
        if x < self.width && z < self.height {
            Some(self.values[x * self.height + z])
        } else {
            None
        }
    }

    /// Overwrites the sample at `(x, z)`. Out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, value: f32) {
        if x < self.width && z < self.height {
            self.values[x * self.height + z] = value;
        }
    }

    /// All samples in x-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Computes `low_value` and `high_value` over every sample.
    ///
    /// An empty field gets a `[0, 0]` range.
    pub fn calculate_range(&mut self) {
        if self.values.is_empty() {
            self.low_value = 0.0;
            self.high_value = 0.0;
            return;
        }
        let (low, high) = self
            .values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        self.low_value = low;
        self.high_value = high;
    }

    /// Shifts every sample so the minimum becomes zero.
    ///
    /// Relies on the range from the last [`calculate_range`](Self::calculate_range).
    pub fn post_process(&mut self) {
        let low = self.low_value;
        for v in &mut self.values {
            *v -= low;
        }
        self.high_value -= low;
        self.low_value = 0.0;
    }

    /// Runs [`calculate_range`](Self::calculate_range) then
    /// [`post_process`](Self::post_process).
    pub fn normalize(&mut self) {
        self.calculate_range();
        self.post_process();
    }

    /// The sample at `(x, z)` mapped into `[0, 1]` by the current range.
    pub fn normalized(&self, x: usize, z: usize) -> Option<f32> {
        self.get(x, z)
            .map(|v| normalize_range(v, self.low_value, self.high_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_dimensions_are_truncated() {
        assert_eq!(even_floor(257), 256);
        assert_eq!(even_floor(256), 256);
        assert_eq!(even_floor(1), 0);
    }

    #[test]
    fn samples_are_addressed_by_x_then_z() {
        let field = HeightField::from_fn(3, 2, |x, z| (x * 10 + z) as f32);
        assert_eq!(field.get(2, 1), Some(21.0));
        assert_eq!(field.get(0, 1), Some(1.0));
        assert_eq!(field.get(3, 0), None);
        assert_eq!(field.values()[..2], [0.0, 1.0]);
    }

    #[test]
    fn normalization_shifts_minimum_to_zero() {
        let mut field = HeightField::from_fn(4, 4, |x, z| x as f32 * 3.0 - z as f32 - 7.0);
        field.normalize();

        assert_eq!(field.low_value(), 0.0);
        assert_eq!(field.high_value(), 12.0);
        for &v in field.values() {
            assert!(v >= 0.0 && v <= field.high_value());
        }
    }

    #[test]
    fn normalization_of_all_positive_field_still_rebaselines() {
        let mut field = HeightField::from_fn(2, 2, |_, _| 50.0);
        field.set(1, 1, 80.0);
        field.normalize();

        assert_eq!(field.get(0, 0), Some(0.0));
        assert_eq!(field.get(1, 1), Some(30.0));
        assert_eq!(field.normalized(1, 1), Some(1.0));
    }

    #[test]
    fn empty_field_has_zero_range() {
        let mut field = HeightField::new(0, 0);
        field.normalize();
        assert!(field.is_empty());
        assert_eq!(field.high_value(), 0.0);
    }
}
