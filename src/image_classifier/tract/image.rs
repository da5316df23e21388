use crate::device_camera::frame::letterbox;
use crate::error::PredictError;
use crate::image_classifier::models::model_config::{Normalization, TensorLayout};
use image::{DynamicImage, RgbImage};
use tract_onnx::prelude::*;

/// Letterboxes `image` to `size`x`size` and lays it out as a float tensor.
pub fn image_to_tensor(
    image: &RgbImage,
    size: u32,
    layout: TensorLayout,
    normalization: Normalization,
) -> Result<Tensor, PredictError> {
    if size == 0 {
        return Err(PredictError::Preprocess("input size is zero".to_string()));
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(PredictError::Preprocess("frame is empty".to_string()));
    }

    let rgb = if image.dimensions() == (size, size) {
        image.clone()
    } else {
        letterbox(&DynamicImage::ImageRgb8(image.clone()), size, size)
    };
    let side = size as usize;

    let tensor = match layout {
        TensorLayout::Nchw => {
            tract_ndarray::Array4::from_shape_fn((1, 3, side, side), |(_, c, y, x)| {
                normalization.apply(rgb.get_pixel(x as u32, y as u32)[c])
            })
            .into_tensor()
        }
        TensorLayout::Nhwc => {
            tract_ndarray::Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
                normalization.apply(rgb.get_pixel(x as u32, y as u32)[c])
            })
            .into_tensor()
        }
    };
    Ok(tensor)
}

pub fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return exps;
    }
    exps.iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_image_to_tensor_nchw() {
        let image = RgbImage::from_pixel(100, 100, Rgb([255, 0, 0]));

        let tensor =
            image_to_tensor(&image, 64, TensorLayout::Nchw, Normalization::ZeroToOne).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 64, 64]);

        let slice = tensor.as_slice::<f32>().unwrap();
        // red plane, then green, then blue
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[64 * 64], 0.0);
        assert_eq!(slice[2 * 64 * 64], 0.0);
    }

    #[test]
    fn test_image_to_tensor_nhwc() {
        let image = RgbImage::from_pixel(32, 32, Rgb([0, 255, 0]));

        let tensor =
            image_to_tensor(&image, 32, TensorLayout::Nhwc, Normalization::MinusOneToOne)
                .unwrap();
        assert_eq!(tensor.shape(), &[1, 32, 32, 3]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert_eq!(&slice[0..3], &[-1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_image_to_tensor_rectangle_is_centered() {
        let image = RgbImage::from_pixel(200, 100, Rgb([255, 0, 0]));

        let tensor =
            image_to_tensor(&image, 64, TensorLayout::Nchw, Normalization::ZeroToOne).unwrap();
        let slice = tensor.as_slice::<f32>().unwrap();

        assert_eq!(slice[32 * 64 + 32], 1.0);
        assert_eq!(slice[32], 0.0);
    }

    #[test]
    fn test_image_to_tensor_normalization() {
        let image = RgbImage::from_pixel(16, 16, Rgb([128, 128, 128]));

        let tensor =
            image_to_tensor(&image, 16, TensorLayout::Nchw, Normalization::ZeroToOne).unwrap();
        let slice = tensor.as_slice::<f32>().unwrap();

        let expected = 128.0 / 255.0;
        assert!((slice[0] - expected).abs() < 0.0001);
        assert!((slice[16 * 16] - expected).abs() < 0.0001);
    }

    #[test]
    fn test_image_to_tensor_rejects_empty_input() {
        let empty = RgbImage::new(0, 0);
        let image = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));

        assert!(matches!(
            image_to_tensor(&empty, 16, TensorLayout::Nchw, Normalization::ZeroToOne),
            Err(PredictError::Preprocess(_))
        ));
        assert!(matches!(
            image_to_tensor(&image, 0, TensorLayout::Nhwc, Normalization::ZeroToOne),
            Err(PredictError::Preprocess(_))
        ));
    }

    #[test]
    fn softmax_sums_to_one_and_keeps_order() {
        let probabilities = softmax(&[1.0, 3.0, 2.0]);

        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probabilities[1] > probabilities[2]);
        assert!(probabilities[2] > probabilities[0]);
    }
}
