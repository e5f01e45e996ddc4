use std::collections::HashSet;

use proptest::prelude::*;
use sph_dam_break::{
    geometry::{Cube, Object, Particle, Rect},
    vec3d,
};

fn unique_positions(points: &[Particle]) -> usize {
    points
        .iter()
        .map(|p| {
            let q = p.position * 1e9;
            (q.x.round() as i64, q.y.round() as i64, q.z.round() as i64)
        })
        .collect::<HashSet<_>>()
        .len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cube_fill_tracks_volume(dx in 0.01f64..0.05, fx in 10f64..25., fy in 10f64..25., fz in 10f64..25.) {
        let cube = Cube::axis_aligned(vec3d(0.1, -0.2, 0.3), vec3d(fx * dx, fy * dx, fz * dx));
        let mut points = Vec::new();
        let n = cube.fill(&mut points, dx, true);

        prop_assert_eq!(n, points.len());
        prop_assert_eq!(n, cube.fill_count(dx, true));
        prop_assert_eq!(unique_positions(&points), n);

        let ratio = n as f64 / (cube.volume() / dx.powi(3));
        prop_assert!(ratio > 0.9 && ratio < 1.4, "ratio {}", ratio);
    }

    #[test]
    fn cube_border_tracks_area(
        dx in 0.01f64..0.05,
        fx in 10f64..25.,
        fy in 10f64..25.,
        fz in 10f64..25.,
        close_top in any::<bool>(),
    ) {
        let cube = Cube::axis_aligned(vec3d(0., 0., 0.), vec3d(fx * dx, fy * dx, fz * dx));
        let mut points = Vec::new();
        let n = cube.fill_border(&mut points, dx, close_top);

        prop_assert_eq!(n, cube.fill_border_count(dx, close_top));
        prop_assert_eq!(unique_positions(&points), n);
        prop_assert!(points.iter().all(|p| cube.contains(p.position, 1e-9)));

        let ratio = n as f64 / (cube.surface_area(close_top) / (dx * dx));
        prop_assert!(ratio > 0.6 && ratio < 1.4, "ratio {}", ratio);
    }

    #[test]
    fn rect_fill_splits_into_inner_and_border(dx in 0.01f64..0.05, fx in 3f64..30., fy in 3f64..30.) {
        let rect = Rect::new(vec3d(0.43, 0., 0.), vec3d(0., fx * dx, 0.), vec3d(0., 0., fy * dx));

        let mut full = Vec::new();
        let mut inner = Vec::new();
        let mut border = Vec::new();
        rect.fill(&mut full, dx, true);
        rect.fill(&mut inner, dx, false);
        rect.fill_border(&mut border, dx);

        prop_assert_eq!(unique_positions(&border), border.len());
        prop_assert_eq!(full.len(), inner.len() + border.len());
    }
}
