/* Copyright 2020 @TwoCookingMice */

use crate::core::error::RenderError;
use crate::math::bitmap::Bitmap;

use exr::prelude::write_rgb_file;

// Write a rendered image as an RGB OpenEXR file
pub fn write_exr_to_file(image: &Bitmap, file_path: &str) -> Result<(), RenderError> {
    log::info!("Starting writing openexr image: {}.", file_path);

    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        log::error!("Refusing to write an empty {}x{} image to {}.", width, height, file_path);
        return Err(RenderError::ImageWrite {
            path: file_path.to_string(),
            message: format!("empty {}x{} image", width, height),
        });
    }

    write_rgb_file(file_path, width, height, |x, y| {
        let c = image[(x, y)];
        (c.x, c.y, c.z)
    })
    .map_err(|e| {
        log::error!("EXR write error for {}: {}.", file_path, e);
        RenderError::ImageWrite { path: file_path.to_string(), message: e.to_string() }
    })?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;

    #[test]
    fn test_write_small_image() {
        let mut image = Bitmap::new(4, 3);
        image[(1, 2)] = Vector3f::new(0.25, 0.5, 1.0);
        let path = std::env::temp_dir().join(format!("financier_exr_{}.exr", std::process::id()));
        let path = path.to_string_lossy().to_string();

        write_exr_to_file(&image, &path).unwrap();
        assert!(std::fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_empty_image_is_an_error() {
        let result = write_exr_to_file(&Bitmap::new(0, 0), "never_written.exr");
        assert!(matches!(result, Err(RenderError::ImageWrite { .. })));
    }

    #[test]
    fn test_bad_path_is_an_error() {
        let result = write_exr_to_file(&Bitmap::new(2, 2), "/nonexistent_dir_financier/out.exr");
        assert!(matches!(result, Err(RenderError::ImageWrite { .. })));
    }

    #[test]
    fn test_written_file_reads_back() {
        let mut image = Bitmap::new(2, 2);
        image[(1, 0)] = Vector3f::new(0.5, 0.25, 2.0);
        let path = std::env::temp_dir().join(format!("financier_exr_read_{}.exr", std::process::id()));
        let path = path.to_string_lossy().to_string();
        write_exr_to_file(&image, &path).unwrap();

        let loaded = exr::prelude::read_first_rgba_layer_from_file(
            &path,
            |resolution, _| vec![vec![(0.0f32, 0.0f32, 0.0f32); resolution.width()]; resolution.height()],
            |pixels, position, (r, g, b, _a): (f32, f32, f32, f32)| pixels[position.y()][position.x()] = (r, g, b),
        ).unwrap();
        let _ = std::fs::remove_file(&path);

        let pixels = &loaded.layer_data.channel_data.pixels;
        assert_eq!(pixels[0][1], (0.5, 0.25, 2.0));
        assert_eq!(pixels[1][1], (0.0, 0.0, 0.0));
    }
}
