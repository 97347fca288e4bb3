//! Scenario tests across warpfx crates.
//!
//! The fixtures below build small deterministic images; the tests drive them
//! through `warpfx-math` transforms and `warpfx-ops` kernels end to end.

use warpfx_core::{Image, Pixel, Rgba, Rgba32F};

/// Horizontal red ramp, vertical green ramp, constant blue, opaque.
pub fn gradient(width: u32, height: u32) -> Image<Rgba32F> {
    let sx = width.saturating_sub(1).max(1) as f32;
    let sy = height.saturating_sub(1).max(1) as f32;
    Image::from_fn(width, height, |x, y| Rgba::new(x as f32 / sx, y as f32 / sy, 0.25, 1.0))
}

/// Black and white checkerboard with `cell`-pixel squares.
pub fn checker(width: u32, height: u32, cell: u32) -> Image<Rgba32F> {
    let cell = cell.max(1);
    Image::from_fn(width, height, |x, y| {
        let v = ((x / cell + y / cell) % 2) as f32;
        Rgba::new(v, v, v, 1.0)
    })
}

/// Largest absolute channel difference between two same-sized images.
pub fn max_diff<P: Pixel>(a: &Image<P>, b: &Image<P>) -> f32 {
    assert_eq!(a.dimensions(), b.dimensions(), "image sizes differ");
    a.pixels()
        .iter()
        .zip(b.pixels())
        .map(|(p, q)| (p.to_vector4() - q.to_vector4()).abs().max_element())
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use warpfx_core::{Luma8, Rgba8};
    use warpfx_math::{Affine, Mat3, TaperCorner, TaperSide, Transform};
    use warpfx_ops::{
        transform, CancellationToken, Configuration, Filter, Lanczos3, OpsError, Resampler,
    };

    #[test]
    fn test_identity_4x4() {
        let src = gradient(4, 4);
        let mut dst = Image::new(4, 4);
        Lanczos3
            .apply_affine_transform(&Configuration::default(), &src, &mut dst, &Affine::IDENTITY)
            .unwrap();
        assert!(max_diff(&src, &dst) < 1e-5);
    }

    #[test]
    fn test_scale_2x2_to_4x4() {
        let src = Image::from_pixels(
            2,
            2,
            vec![
                Rgba::new(1.0, 0.0, 0.0, 1.0),
                Rgba::new(0.0, 1.0, 0.0, 1.0),
                Rgba::new(0.0, 0.0, 1.0, 1.0),
                Rgba::new(1.0, 1.0, 1.0, 1.0),
            ],
        )
        .unwrap();
        let dst = transform::affine(
            &Configuration::default(),
            &src,
            &Affine::scale(2.0, 2.0),
            4,
            4,
            &Lanczos3,
        )
        .unwrap();
        for (_, _, px) in dst.enumerate_pixels() {
            for c in px.to_array() {
                assert!(c.is_finite());
                assert!((0.0..=1.0).contains(&c));
            }
        }
        // even coordinates hit source pixels exactly
        for (dx, dy, sx, sy) in [(0, 0, 0, 0), (2, 0, 1, 0), (0, 2, 0, 1), (2, 2, 1, 1)] {
            let d = dst.pixel(dx, dy).to_vector4() - src.pixel(sx, sy).to_vector4();
            assert!(d.abs().max_element() < 1e-5);
        }
    }

    #[test]
    fn test_rotate_8x8_quarter_turn() {
        let src = gradient(8, 8);
        let t = Affine::rotation_about(90.0, 3.5, 3.5);
        let dst = transform::affine(&Configuration::default(), &src, &t, 8, 8, &Lanczos3).unwrap();
        // (x, y) -> (7 - y, x)
        for (x, y, px) in src.enumerate_pixels() {
            let q = dst.pixel(7 - y, x);
            assert_abs_diff_eq!(q.r, px.r, epsilon = 1e-5);
            assert_abs_diff_eq!(q.g, px.g, epsilon = 1e-5);
        }

        // same rotation into a larger canvas leaves its corners empty
        let shifted = t.then(&Affine::translation(4.0, 4.0));
        let config = Configuration::default();
        let big = transform::affine(&config, &src, &shifted, 16, 16, &Lanczos3).unwrap();
        for (x, y) in [(0, 0), (15, 0), (0, 15), (15, 15)] {
            assert!(big.pixel(x, y).is_transparent(), "corner ({x}, {y})");
        }
        assert_abs_diff_eq!(big.pixel(11, 4).r, src.pixel(0, 0).r, epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_8x8_quarter_turn_projective() {
        let src = gradient(8, 8);
        let m = Affine::rotation_about(90.0, 3.5, 3.5).to_mat3();
        let mut dst = Image::new(8, 8);
        Lanczos3
            .apply_projective_transform(&Configuration::default(), &src, &mut dst, &m)
            .unwrap();
        for (x, y, px) in src.enumerate_pixels() {
            let q = dst.pixel(7 - y, x);
            assert_abs_diff_eq!(q.r, px.r, epsilon = 1e-5);
            assert_abs_diff_eq!(q.g, px.g, epsilon = 1e-5);
            assert_abs_diff_eq!(q.a, 1.0, epsilon = 1e-5);
        }

        let shifted = m.then(&Affine::translation(4.0, 4.0).to_mat3());
        let big =
            transform::projective(&Configuration::default(), &src, &shifted, 16, 16, &Lanczos3)
                .unwrap();
        for (x, y) in [(0, 0), (15, 0), (0, 15), (15, 15)] {
            assert!(big.pixel(x, y).is_transparent(), "corner ({x}, {y})");
        }
        // corners of the source land on the rotated square's corners
        assert_abs_diff_eq!(big.pixel(11, 4).r, src.pixel(0, 0).r, epsilon = 1e-5);
        assert_abs_diff_eq!(big.pixel(11, 11).r, src.pixel(7, 0).r, epsilon = 1e-5);
        assert_abs_diff_eq!(big.pixel(4, 11).g, src.pixel(7, 7).g, epsilon = 1e-5);
        assert_abs_diff_eq!(big.pixel(4, 4).g, src.pixel(0, 7).g, epsilon = 1e-5);
    }

    #[test]
    fn test_radius_half_kernels_stay_finite() {
        let src = checker(9, 7, 2);
        let transforms = [
            Transform::from(Affine::rotation_about(37.0, 4.0, 3.0)),
            Transform::from(Affine::scale(0.37, 2.9)),
            Transform::from(Mat3::taper(8.0, 6.0, TaperSide::Bottom, TaperCorner::Both, 0.3)),
        ];
        for filter in [Filter::Box, Filter::Nearest] {
            for t in &transforms {
                let mut dst = Image::new(11, 11);
                warpfx_ops::resample(&Configuration::default(), &filter, &src, &mut dst, t)
                    .unwrap();
                for px in dst.pixels() {
                    let in_range = |c: &f32| c.is_finite() && (0.0..=1.0).contains(c);
                    assert!(px.to_array().iter().all(in_range));
                }
            }
        }
    }

    #[test]
    fn test_uniform_color_every_filter() {
        let color = Rgba::new(0.2, 0.7, 0.4, 0.9);
        let src = Image::filled(12, 12, color);
        let t = Affine::rotation_about(25.0, 5.5, 5.5);
        let inv = t.inverse().unwrap();
        for filter in Filter::ALL {
            let dst =
                transform::affine(&Configuration::default(), &src, &t, 12, 12, &filter).unwrap();
            for (x, y, px) in dst.enumerate_pixels() {
                let (sx, sy) = inv.transform_point(x as f32, y as f32);
                if (0.0..=11.0).contains(&sx) && (0.0..=11.0).contains(&sy) {
                    assert_abs_diff_eq!(px.g, 0.7, epsilon = 1e-4);
                    assert_abs_diff_eq!(px.a, 0.9, epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_integer_translation_u8() {
        let src: Image<Rgba8> =
            Image::from_fn(10, 10, |x, y| Rgba::new((x * 20) as u8, (y * 20) as u8, 7, 255));
        let mut dst = Image::new(10, 10);
        let shift = Affine::translation(3.0, 2.0);
        Lanczos3
            .apply_affine_transform(&Configuration::default(), &src, &mut dst, &shift)
            .unwrap();
        for y in 2..10 {
            for x in 3..10 {
                assert_eq!(dst.pixel(x, y), src.pixel(x - 3, y - 2));
            }
        }
    }

    #[test]
    fn test_luma_perspective() {
        let src: Image<Luma8> = Image::from_fn(16, 16, |x, _| Luma8::new((x * 16) as u8));
        let m = Mat3::taper(15.0, 15.0, TaperSide::Left, TaperCorner::Both, 0.6);
        let mut dst = Image::new(16, 16);
        Filter::MitchellNetravali
            .apply_projective_transform(&Configuration::default(), &src, &mut dst, &m)
            .unwrap();
        // right edge is fixed; values grow left to right along the middle row
        let row = dst.row(8);
        assert!(row.windows(2).all(|w| w[0].l <= w[1].l));
    }

    #[test]
    fn test_singular_transform_rejected() {
        let src = gradient(4, 4);
        let mut dst = Image::filled(4, 4, Rgba::new(0.3, 0.3, 0.3, 0.3));
        let before = dst.clone();
        let err = Lanczos3
            .apply_projective_transform(&Configuration::default(), &src, &mut dst, &Mat3::ZERO)
            .unwrap_err();
        assert!(matches!(err, OpsError::NonInvertible(_)));
        assert_eq!(dst, before);
    }

    #[test]
    fn test_cancellation() {
        let token = CancellationToken::new();
        let config = Configuration::default().with_cancellation(token.clone());
        let src = gradient(8, 8);
        assert!(transform::rotate(&config, &src, 30.0, &Lanczos3).is_ok());
        token.cancel();
        let err = transform::rotate(&config, &src, 30.0, &Lanczos3).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_parallel_equals_sequential() {
        let src = checker(64, 48, 5);
        let m = Mat3::taper(63.0, 47.0, TaperSide::Top, TaperCorner::RightOrBottom, 0.4);
        let seq =
            transform::projective(&Configuration::sequential(), &src, &m, 64, 48, &Lanczos3)
                .unwrap();
        for threads in [0, 2, 7] {
            let config = Configuration::default()
                .with_max_degree_of_parallelism(threads)
                .with_min_rows_per_task(1);
            let par = transform::projective(&config, &src, &m, 64, 48, &Lanczos3).unwrap();
            assert_eq!(seq, par);
        }
    }

    #[test]
    fn test_premultiplied_edges() {
        let src: Image<Rgba32F> = Image::from_fn(8, 8, |x, _| {
            if x < 4 { Rgba::new(0.0, 0.0, 1.0, 1.0) } else { Rgba::new(1.0, 0.0, 0.0, 0.0) }
        });
        let config = Configuration::default().with_premultiply_alpha(true);
        let dst = transform::rotate(&config, &src, 10.0, &Filter::CatmullRom).unwrap();
        for px in dst.pixels() {
            if px.a > 0.05 {
                // no red bleeds in from the transparent half
                assert!(px.r < 1e-3, "{px:?}");
            }
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let config = Configuration::default()
            .with_max_degree_of_parallelism(3)
            .with_premultiply_alpha(true)
            .with_cancellation(CancellationToken::new());
        let json = serde_json::to_string(&config).unwrap();
        let back: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_degree_of_parallelism, 3);
        assert!(back.premultiply_alpha);
        assert!(back.cancellation.is_none());

        let partial: Configuration = serde_json::from_str(r#"{"min_rows_per_task": 16}"#).unwrap();
        assert_eq!(partial.min_rows_per_task, 16);
        assert_eq!(partial.max_degree_of_parallelism, 0);

        assert_eq!(serde_json::to_string(&Filter::CatmullRom).unwrap(), "\"catmull-rom\"");
        let f: Filter = serde_json::from_str("\"lanczos5\"").unwrap();
        assert_eq!(f, Filter::Lanczos5);

        let t = Transform::from(Affine::rotation_about(30.0, 2.0, 2.0));
        let back: Transform = serde_json::from_str(&serde_json::to_string(&t).unwrap()).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_fixtures() {
        let g = gradient(5, 3);
        assert_eq!(g.pixel(4, 2).to_vector4().x, 1.0);
        assert_eq!(g.pixel(4, 2).to_vector4().y, 1.0);
        let c = checker(4, 4, 2);
        assert_eq!(c.pixel(0, 0).r, 0.0);
        assert_eq!(c.pixel(2, 0).r, 1.0);
        assert_eq!(max_diff(&c, &c), 0.0);
    }
}
