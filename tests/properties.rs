use camera_shake::{
    blur_image, generate_shake_kernel, rasterize, BlurError, Error, InputDefect, KernelError,
    Param, ShakeKernel, ShakeParams,
};
use nalgebra::Point2;
use ndarray::{Array2, Array3, Array4, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn random_kernels_are_normalized() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..50 {
        let params = ShakeParams::random(&mut rng);
        let kernel = generate_shake_kernel(&params, Some(rng.gen())).unwrap();
        assert_eq!(kernel.dim(), (params.size, params.size));
        assert!(kernel.iter().all(|&w| w >= 0.));
        assert!((kernel.sum() - 1.).abs() < 1e-5, "{params:?}");
    }
}

#[test]
fn same_seed_same_kernel_and_trajectory() {
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..10 {
        let params = ShakeParams::random(&mut rng);
        let seed = rng.gen();
        let a = ShakeKernel::builder(params).seed(seed).keep_trajectory().build().unwrap();
        let b = ShakeKernel::builder(params).seed(seed).keep_trajectory().build().unwrap();
        assert_eq!(a.kernel, b.kernel);
        assert_eq!(a.trajectory, b.trajectory);
    }
}

#[test]
fn trajectories_stay_on_the_grid() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..100 {
        let params = ShakeParams::random(&mut rng);
        let shake = ShakeKernel::with_rng(params, &mut rng, true).unwrap();
        let upper = params.size as f64 - 1.;
        let trajectory = shake.trajectory.unwrap();
        assert_eq!(trajectory.len(), params.steps);
        for p in trajectory.iter() {
            assert!((0f64..=upper).contains(&p.x), "{p:?} {params:?}");
            assert!((0f64..=upper).contains(&p.y), "{p:?} {params:?}");
        }
    }
}

#[test]
fn off_grid_trajectory_gives_center_impulse() {
    let size = 25;
    let trajectory: Vec<_> = (0..16)
        .map(|i| Point2::new(size as f64 + i as f64, -0.5))
        .collect();
    let kernel = rasterize(size, &trajectory);
    for ((i, j), &w) in kernel.indexed_iter() {
        let expected = if (i, j) == (size / 2, size / 2) { 1. } else { 0. };
        assert_eq!(w, expected);
    }
}

#[test]
fn center_impulse_is_identity() {
    let mut rng = StdRng::seed_from_u64(5);
    let image = Array3::from_shape_fn((37, 53, 3), |_| rng.gen::<u8>());
    for size in [5, 21, 45] {
        let mut kernel = Array2::<f64>::zeros((size, size));
        kernel[[size / 2, size / 2]] = 1.;
        let blurred = blur_image(image.view().into_dyn(), kernel.view().into_dyn()).unwrap();
        assert_eq!(blurred, image.clone().into_dyn());
    }
}

#[test]
fn uniform_image_stays_uniform_inside() {
    let mut rng = StdRng::seed_from_u64(99);
    for value in [0u8, 37, 255] {
        let params = ShakeParams::random(&mut rng);
        let kernel = generate_shake_kernel(&params, Some(rng.gen())).unwrap();
        let margin = params.size / 2;
        let (h, w) = (2 * params.size + 10, 2 * params.size + 20);
        let image = Array3::<u8>::from_elem((h, w, 3), value);
        let blurred = blur_image(image.view().into_dyn(), kernel.view().into_dyn()).unwrap();
        for ((i, j, _), &v) in blurred.into_dimensionality::<ndarray::Ix3>().unwrap().indexed_iter() {
            if (margin..h - margin).contains(&i) && (margin..w - margin).contains(&j) {
                assert!(v.abs_diff(value) <= 1, "{v} != {value} at ({i},{j})");
            } else {
                assert!(v <= value);
            }
        }
    }
}

#[test]
fn blur_preserves_shape() {
    let kernel = generate_shake_kernel(&ShakeParams::default().size(31), Some(1)).unwrap();
    let rgb = Array3::<u8>::from_elem((100, 150, 3), 64);
    let blurred = blur_image(rgb.view().into_dyn(), kernel.view().into_dyn()).unwrap();
    assert_eq!(blurred.shape(), &[100, 150, 3]);
    let gray = rgb.index_axis(Axis(2), 0);
    let blurred = blur_image(gray.into_dyn(), kernel.view().into_dyn()).unwrap();
    assert_eq!(blurred.shape(), &[100, 150]);
}

#[test]
fn even_size_names_the_field() {
    let err: Error = generate_shake_kernel(&ShakeParams::default().size(10), Some(0))
        .unwrap_err()
        .into();
    assert!(matches!(
        err,
        Error::Kernel(KernelError::InvalidParameter {
            param: Param::Size,
            ..
        })
    ));
}

#[test]
fn rank_errors() {
    let image = Array3::<u8>::zeros((8, 8, 3));
    let kernel = Array3::<f64>::ones((3, 3, 1));
    assert!(matches!(
        blur_image(image.view().into_dyn(), kernel.view().into_dyn()),
        Err(BlurError::InvalidInput(InputDefect::KernelRank(3)))
    ));
    let video = Array4::<u8>::zeros((2, 8, 8, 3));
    let kernel = Array2::<f64>::ones((3, 3));
    assert!(matches!(
        blur_image(video.view().into_dyn(), kernel.view().into_dyn()),
        Err(BlurError::InvalidInput(InputDefect::ImageRank(4)))
    ));
}
