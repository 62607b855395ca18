//! Test data generators for synthetic elevation rasters.
//!
//! Grids are `Vec<f64>` in row-major order (row 0 first). Pixel buffers are
//! RGBA bytes in the same order, produced by an encoder written separately
//! from the library decoder so that round trips check both sides.

/// Packs an elevation into the RGB channels of a DEM pixel.
///
/// `packed = round(elevation / resolution)`; negative values wrap into the
/// upper half of the 24-bit range.
///
/// # Example
///
/// ```
/// use test_utils::encode_rgb;
///
/// assert_eq!(encode_rgb(0.0, 0.01), [0, 0, 0]);
/// assert_eq!(encode_rgb(2.56, 0.01), [0, 1, 0]);
/// assert_eq!(encode_rgb(-0.01, 0.01), [255, 255, 255]);
/// ```
pub fn encode_rgb(elevation: f64, resolution: f64) -> [u8; 3] {
    let units = (elevation / resolution).round() as i64;
    let packed = units.rem_euclid(1 << 24) as u32;
    [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8]
}

/// Encodes a grid into an opaque RGBA buffer.
pub fn encode_grid(values: &[f64], resolution: f64) -> Vec<u8> {
    let mut data = Vec::with_capacity(values.len() * 4);
    for &v in values {
        let [r, g, b] = encode_rgb(v, resolution);
        data.extend_from_slice(&[r, g, b, 255]);
    }
    data
}

/// Encodes a grid into RGBA, marking the samples where `no_data` is true
/// fully transparent.
pub fn encode_grid_with_mask(values: &[f64], no_data: &[bool], resolution: f64) -> Vec<u8> {
    let mut data = encode_grid(values, resolution);
    for (i, &masked) in no_data.iter().enumerate() {
        if masked {
            data[i * 4 + 3] = 0;
        }
    }
    data
}

/// Creates a grid with a single conical peak at its center.
///
/// `value = max(0, peak - distance_to_center)`.
///
/// # Example
///
/// ```
/// use test_utils::create_cone_grid;
///
/// let grid = create_cone_grid(9, 9, 4.5);
/// assert_eq!(grid.len(), 81);
/// assert_eq!(grid[4 * 9 + 4], 4.5);
/// ```
pub fn create_cone_grid(width: usize, height: usize, peak: f64) -> Vec<f64> {
    let cx = (width as f64 - 1.0) / 2.0;
    let cy = (height as f64 - 1.0) / 2.0;
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f64 - cx;
            let dy = row as f64 - cy;
            data.push((peak - (dx * dx + dy * dy).sqrt()).max(0.0));
        }
    }
    data
}

/// Creates a grid that steps from `low` to `high` across its anti-diagonal.
///
/// Samples with `col + row < size` are `low`, the rest are `high`.
pub fn create_diagonal_step_grid(size: usize, low: f64, high: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            data.push(if col + row < size { low } else { high });
        }
    }
    data
}

/// Creates a plane rising linearly from left to right.
///
/// `value = base + col * slope`.
pub fn create_ramp_grid(width: usize, height: usize, base: f64, slope: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for _row in 0..height {
        for col in 0..width {
            data.push(base + col as f64 * slope);
        }
    }
    data
}

/// Creates a smooth terrain-like field with several hills and valleys.
pub fn create_terrain_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let fx = col as f64 / width.max(1) as f64;
            let fy = row as f64 / height.max(1) as f64;

            let v1 = (fx * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v2 = (fy * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v3 = ((fx + fy) * std::f64::consts::PI * 2.0).sin() * 10.0;

            data.push(50.0 + v1 + v2 + v3);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_rgb_wraps_negative() {
        // -1.00 m -> 2^24 - 100
        let [r, g, b] = encode_rgb(-1.0, 0.01);
        let packed = (r as u32) << 16 | (g as u32) << 8 | b as u32;
        assert_eq!(packed, (1 << 24) - 100);
    }

    #[test]
    fn test_encode_grid_with_mask() {
        let data = encode_grid_with_mask(&[1.0, 2.0], &[false, true], 0.01);
        assert_eq!(data.len(), 8);
        assert_eq!(data[3], 255);
        assert_eq!(data[7], 0);
    }

    #[test]
    fn test_cone_grid_edges_are_low() {
        let grid = create_cone_grid(9, 9, 4.5);
        for i in 0..9 {
            assert!(grid[i] <= 0.5);
            assert!(grid[8 * 9 + i] <= 0.5);
            assert!(grid[i * 9] <= 0.5);
            assert!(grid[i * 9 + 8] <= 0.5);
        }
    }

    #[test]
    fn test_diagonal_step_grid() {
        let grid = create_diagonal_step_grid(3, 0.0, 10.0);
        assert_eq!(grid, vec![0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 10.0, 10.0]);
    }
}
