#[cfg(test)]
mod scheduler {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use approx::assert_relative_eq;
    use ember::core::ember::Float;
    use ember::core::adaptive::AdaptiveSampling;
    use ember::core::buffers::RenderBuffers;
    use ember::core::camera::OrthographicCamera;
    use ember::core::closure::{Bsdf, ClosureStack, ShaderClosures};
    use ember::core::geometry::normal::Normal3f;
    use ember::core::geometry::point::{Point2i, Point3f};
    use ember::core::geometry::ray::Ray;
    use ember::core::geometry::vector::Vector3f;
    use ember::core::scene::{ClosureRegistry, Hit, SceneProvider};
    use ember::core::scheduler::{PathRenderer, RenderSettings};
    use ember::core::spectrum::Spectrum;
    use ember::closures::diffuse::DiffuseBsdf;
    use ember::closures::principled_diffuse::PrincipledDiffuseBsdf;

    // Horizontal plane under a constant sky. Every camera ray hits the
    // plane and the bounce ray escapes upward, so each path costs exactly
    // two intersection queries
    struct FlatScene {
        plane_z     : Float,
        sky         : Spectrum,
        queries     : AtomicUsize,
        cancel_after: Option<(usize, Arc<AtomicBool>)>
    }

    impl FlatScene {
        fn new(sky: Spectrum) -> Self {
            Self {
                plane_z: 0.0,
                sky,
                queries: AtomicUsize::new(0),
                cancel_after: None
            }
        }

        fn cancelling(sky: Spectrum, after: usize, flag: Arc<AtomicBool>) -> Self {
            Self {
                cancel_after: Some((after, flag)),
                ..Self::new(sky)
            }
        }
    }

    impl SceneProvider for FlatScene {
        fn intersect(&self, ray: &Ray) -> Option<Hit> {
            let count = self.queries.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some((after, flag)) = &self.cancel_after {
                if count == *after { flag.store(true, Ordering::SeqCst); }
            }

            if ray.d.z >= 0.0 { return None; }

            let t = (self.plane_z - ray.o.z) / ray.d.z;
            if t <= 0.0 || t >= ray.t_max { return None; }

            let n = Normal3f::new(0.0, 0.0, 1.0);

            Some(Hit {
                p: ray.find_point(t),
                t,
                uv: Default::default(),
                ns: n,
                ng: n,
                prim_id: 0
            })
        }

        fn environment(&self, _ray: &Ray) -> Spectrum {
            self.sky
        }
    }

    struct LambertMaterial;

    impl ClosureRegistry for LambertMaterial {
        fn closures_at(&self, hit: &Hit) -> ClosureStack {
            let mut bsdf = DiffuseBsdf::new(hit.ns, Spectrum::new(1.0));
            bsdf.setup();

            let mut stack = ClosureStack::new();
            stack.push(ShaderClosures::from(bsdf));
            stack
        }
    }

    struct PrincipledMaterial {
        roughness: Float
    }

    impl ClosureRegistry for PrincipledMaterial {
        fn closures_at(&self, hit: &Hit) -> ClosureStack {
            let mut bsdf =
                PrincipledDiffuseBsdf::new(hit.ns, Spectrum::new(1.0), self.roughness);
            bsdf.setup();

            let mut stack = ClosureStack::new();
            stack.push(ShaderClosures::from(bsdf));
            stack
        }
    }

    // Shading normal opposite the geometric one, so every sampled
    // continuation lands below the surface and gets rejected
    struct FlippedMaterial;

    impl ClosureRegistry for FlippedMaterial {
        fn closures_at(&self, hit: &Hit) -> ClosureStack {
            let mut bsdf = DiffuseBsdf::new(-hit.ng, Spectrum::new(1.0));
            bsdf.setup();

            let mut stack = ClosureStack::new();
            stack.push(ShaderClosures::from(bsdf));
            stack
        }
    }

    // No geometry at all; every path picks up the sky immediately
    struct OpenSky {
        sky: Spectrum
    }

    impl SceneProvider for OpenSky {
        fn intersect(&self, _ray: &Ray) -> Option<Hit> {
            None
        }

        fn environment(&self, _ray: &Ray) -> Spectrum {
            self.sky
        }
    }

    fn straight_down_camera(width: usize, height: usize) -> Arc<OrthographicCamera> {
        Arc::new(OrthographicCamera::new(
            Point3f::new(-1.0, -1.0, 1.0),
            Vector3f::new(2.0 / width as Float, 0.0, 0.0),
            Vector3f::new(0.0, 2.0 / height as Float, 0.0),
            Vector3f::new(0.0, 0.0, -1.0)))
    }

    fn make_renderer(
        scene: Arc<dyn SceneProvider>, registry: Arc<dyn ClosureRegistry>,
        width: usize, height: usize,
        settings: RenderSettings) -> (PathRenderer, Arc<RenderBuffers>) {
        let buffers = Arc::new(RenderBuffers::new(
            Point2i::new(width as isize, height as isize)));
        let renderer = PathRenderer::new(
            scene,
            registry,
            straight_down_camera(width, height),
            buffers.clone(),
            Arc::new(AtomicBool::new(false)),
            settings).unwrap();

        (renderer, buffers)
    }

    #[test]
    fn tiles_partition_frame() {
        // A resolution that is not a multiple of the tile size still has to
        // be covered exactly once
        let (renderer, _) = make_renderer(
            Arc::new(FlatScene::new(Spectrum::new(1.0))),
            Arc::new(LambertMaterial),
            37, 23,
            RenderSettings::default());

        let tiles = renderer.work_tiles(0, 4);
        assert_eq!(tiles.len(), 6);

        let area: isize = tiles.iter().map(|t| t.bounds().area()).sum();
        assert_eq!(area, 37 * 23);

        for (i, a) in tiles.iter().enumerate() {
            assert_eq!(a.stride, 37);
            assert_eq!(a.offset, a.y * 37 + a.x);
            assert_eq!(
                a.pixel_index(&Point2i::new(a.x as isize, a.y as isize)),
                a.offset);
            assert_eq!(a.start_sample, 0);
            assert_eq!(a.samples_num, 4);

            for b in tiles.iter().skip(i + 1) {
                assert!(!a.bounds().overlaps(&b.bounds()));
            }
        }
    }

    #[test]
    fn every_pixel_gets_the_dispatched_samples() {
        let (renderer, buffers) = make_renderer(
            Arc::new(FlatScene::new(Spectrum::new(1.0))),
            Arc::new(LambertMaterial),
            8, 8,
            RenderSettings::default());

        renderer.render_samples(0, 4);
        renderer.render_samples(4, 4);

        for p in &buffers.pixel_bounds() {
            assert_eq!(buffers.pixel(&p).samples(), 8);
        }
        assert_eq!(buffers.total_samples(), 8 * 8 * 8);
    }

    #[test]
    fn lambert_furnace_is_white() {
        // Under a unit sky a white Lambert surface reflects everything;
        // eval/pdf is identically one so the estimate has no variance
        let (renderer, buffers) = make_renderer(
            Arc::new(FlatScene::new(Spectrum::new(1.0))),
            Arc::new(LambertMaterial),
            1, 1,
            RenderSettings::default());

        renderer.render_samples(0, 1000);

        let stats = buffers.pixel(&Point2i::new(0, 0));
        assert_eq!(stats.samples(), 1000);
        assert_relative_eq!(stats.mean_luminance(), 1.0, max_relative = 0.02);
    }

    #[test]
    fn principled_furnace_matches_closed_form() {
        // Roughness zero under normal-incidence view leaves only the
        // outgoing Schlick term: E[1 - FL/2] over cosine-weighted
        // directions works out to 41/42
        let (renderer, buffers) = make_renderer(
            Arc::new(FlatScene::new(Spectrum::new(1.0))),
            Arc::new(PrincipledMaterial { roughness: 0.0 }),
            1, 1,
            RenderSettings::default());

        renderer.render_samples(0, 1000);

        let stats = buffers.pixel(&Point2i::new(0, 0));
        assert_eq!(stats.samples(), 1000);
        assert_relative_eq!(
            stats.mean_luminance(), 41.0 / 42.0, max_relative = 0.02);
    }

    #[test]
    fn invalid_directions_still_count_as_samples() {
        let (renderer, buffers) = make_renderer(
            Arc::new(FlatScene::new(Spectrum::new(1.0))),
            Arc::new(FlippedMaterial),
            2, 2,
            RenderSettings::default());

        renderer.render_samples(0, 16);

        for p in &buffers.pixel_bounds() {
            let stats = buffers.pixel(&p);
            assert_eq!(stats.samples(), 16);
            assert!(stats.mean_radiance().is_black());
            assert_eq!(stats.variance(), 0.0);
        }
    }

    #[test]
    fn non_finite_radiance_is_absorbed_as_black() {
        // Numerically failed paths contribute exactly black and the
        // sample still counts against the dispatched total
        for &sky in &[
            Spectrum::new(Float::NAN),
            Spectrum::new(Float::INFINITY),
            Spectrum::new(-1.0)
        ] {
            let (renderer, buffers) = make_renderer(
                Arc::new(OpenSky { sky }),
                Arc::new(LambertMaterial),
                2, 1,
                RenderSettings::default());

            renderer.render_samples(0, 8);

            for p in &buffers.pixel_bounds() {
                let stats = buffers.pixel(&p);
                assert_eq!(stats.samples(), 8);
                assert!(stats.mean_radiance().is_black());
                assert_eq!(stats.variance(), 0.0);
            }
        }
    }

    #[test]
    fn preset_cancellation_does_no_work() {
        let scene = Arc::new(FlatScene::new(Spectrum::new(1.0)));
        let (renderer, buffers) = make_renderer(
            scene.clone(),
            Arc::new(LambertMaterial),
            8, 8,
            RenderSettings::default());

        renderer.request_cancel();
        renderer.render_samples(0, 4);

        assert_eq!(buffers.total_samples(), 0);
        assert_eq!(scene.queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancellation_is_tile_granular() {
        // Four 16x16 tiles on one thread, dispatched in row-major order.
        // The scene raises the cancel flag on the last intersection query
        // of the first tile: that tile must finish with full, bit-exact
        // statistics while the remaining three are never started
        let spp = 4;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();

        let (cancelled, reference) = pool.install(|| {
            let flag = Arc::new(AtomicBool::new(false));
            let scene = Arc::new(FlatScene::cancelling(
                Spectrum::new(1.0), 16 * 16 * spp * 2, flag.clone()));
            let buffers = Arc::new(RenderBuffers::new(Point2i::new(32, 32)));
            let renderer = PathRenderer::new(
                scene,
                Arc::new(LambertMaterial),
                straight_down_camera(32, 32),
                buffers.clone(),
                flag,
                RenderSettings::default()).unwrap();
            renderer.render_samples(0, spp);

            let (full, full_buffers) = make_renderer(
                Arc::new(FlatScene::new(Spectrum::new(1.0))),
                Arc::new(LambertMaterial),
                32, 32,
                RenderSettings::default());
            full.render_samples(0, spp);

            (buffers, full_buffers)
        });

        for p in &cancelled.pixel_bounds() {
            let stats = cancelled.pixel(&p);

            if p.x < 16 && p.y < 16 {
                // Per-sample seeding makes the finished tile identical to
                // the uninterrupted render
                assert_eq!(stats.samples(), spp as u32);
                assert_eq!(
                    stats.mean_luminance(),
                    reference.pixel(&p).mean_luminance());
            } else {
                assert_eq!(stats.samples(), 0);
                assert!(stats.mean_radiance().is_black());
            }
        }
    }

    #[test]
    fn converged_pixels_are_skipped() {
        let scene = Arc::new(FlatScene::new(Spectrum::new(1.0)));
        let settings = RenderSettings {
            adaptive: AdaptiveSampling::new(0.1, 4),
            ..Default::default()
        };
        let (renderer, buffers) = make_renderer(
            scene.clone(), Arc::new(LambertMaterial), 2, 2, settings);

        renderer.render_samples(0, 8);
        assert!(renderer.converge_and_filter());

        // The whole frame is converged, so another round is a no-op
        let queries = scene.queries.load(Ordering::SeqCst);
        renderer.render_samples(8, 8);

        assert_eq!(buffers.total_samples(), 2 * 2 * 8);
        assert_eq!(scene.queries.load(Ordering::SeqCst), queries);

        for p in &buffers.pixel_bounds() {
            assert_eq!(buffers.pixel(&p).samples(), 8);
        }
    }
}
