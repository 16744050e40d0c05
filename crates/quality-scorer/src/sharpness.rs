//! Laplacian sharpness

use camera_capture::GrayFrame;

/// 3x3 discrete Laplacian, row-major
pub const LAPLACIAN_KERNEL: [i32; 9] = [-1, -1, -1, -1, 8, -1, -1, -1, -1];

/// Convolve with [`LAPLACIAN_KERNEL`] using edge extension.
///
/// The kernel sums to zero so no normalization is applied. Responses are
/// clamped to the 8-bit range of the output plane.
pub fn laplacian(plane: &GrayFrame) -> Vec<u8> {
    let width = plane.width as i64;
    let height = plane.height as i64;
    let mut out = Vec::with_capacity(plane.pixel_count());

    for y in 0..height {
        for x in 0..width {
            let mut acc = 0i32;
            for ky in 0..3i64 {
                for kx in 0..3i64 {
                    let weight = LAPLACIAN_KERNEL[(ky * 3 + kx) as usize];
                    acc += weight * plane.get_clamped(x + kx - 1, y + ky - 1) as i32;
                }
            }
            out.push(acc.clamp(0, 255) as u8);
        }
    }
    out
}

/// Sample standard deviation of the Laplacian response, `None` for an empty plane
pub fn sharpness(plane: &GrayFrame) -> Option<f64> {
    if plane.is_empty() {
        return None;
    }
    let response = laplacian(plane);
    let n = response.len();
    if n < 2 {
        return Some(0.0);
    }

    let mean = response.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let m2: f64 = response
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();
    Some((m2 / (n - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: u32, cell: u32) -> GrayFrame {
        let mut data = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                data.push(if (x / cell + y / cell) % 2 == 0 { 200 } else { 60 });
            }
        }
        GrayFrame::new(data, size, size).unwrap()
    }

    #[test]
    fn test_flat_plane_has_zero_response() {
        let plane = GrayFrame::new(vec![90; 25], 5, 5).unwrap();
        assert!(laplacian(&plane).iter().all(|&v| v == 0));
        assert_eq!(sharpness(&plane), Some(0.0));
    }

    #[test]
    fn test_single_bright_pixel() {
        let mut data = vec![0u8; 9];
        data[4] = 10;
        let plane = GrayFrame::new(data, 3, 3).unwrap();
        let response = laplacian(&plane);
        assert_eq!(response[4], 80);
        // Neighbours see -10 and clamp to zero
        assert_eq!(response[0], 0);
    }

    #[test]
    fn test_fine_detail_is_sharper() {
        let fine = sharpness(&checkerboard(32, 2)).unwrap();
        let coarse = sharpness(&checkerboard(32, 16)).unwrap();
        assert!(fine > coarse);
    }

    #[test]
    fn test_single_pixel_plane() {
        let plane = GrayFrame::new(vec![42], 1, 1).unwrap();
        assert_eq!(sharpness(&plane), Some(0.0));
    }

    #[test]
    fn test_empty_plane() {
        let plane = GrayFrame::new(Vec::new(), 0, 4).unwrap();
        assert_eq!(sharpness(&plane), None);
    }
}
