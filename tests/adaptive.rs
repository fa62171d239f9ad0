#[cfg(test)]
mod adaptive {
    use ember::core::adaptive::AdaptiveSampling;
    use ember::core::buffers::RenderBuffers;
    use ember::core::geometry::point::Point2i;
    use ember::core::rng::RNG;
    use ember::core::spectrum::Spectrum;

    fn fill(buffers: &RenderBuffers, p: &Point2i, value: f32, count: usize) {
        for _ in 0..count {
            buffers.accumulate(p, Spectrum::new(value));
        }
    }

    #[test]
    fn zero_sample_pixels_never_converge() {
        let buffers = RenderBuffers::new(Point2i::new(2, 1));
        let filter = AdaptiveSampling::new(0.5, 4);

        // One pixel fully sampled and noiseless, one untouched
        fill(&buffers, &Point2i::new(0, 0), 1.0, 16);

        assert!(!filter.converge_and_filter(&buffers));

        let mask = buffers.unconverged_mask();
        assert!(!mask[0]);
        assert!(mask[1]);
    }

    #[test]
    fn minimum_sample_count_is_exclusive() {
        let buffers = RenderBuffers::new(Point2i::new(1, 1));
        let filter = AdaptiveSampling::new(0.5, 8);
        let p = Point2i::new(0, 0);

        // Exactly min_samples with zero variance must keep sampling
        fill(&buffers, &p, 1.0, 8);
        assert!(!filter.converge_and_filter(&buffers));
        assert!(!buffers.pixel(&p).is_converged());

        // One more sample and the zero-variance pixel may stop
        fill(&buffers, &p, 1.0, 1);
        assert!(filter.converge_and_filter(&buffers));
        assert!(buffers.pixel(&p).is_converged());
    }

    #[test]
    fn noisy_pixels_stay_unconverged() {
        let buffers = RenderBuffers::new(Point2i::new(1, 1));
        let filter = AdaptiveSampling::new(0.001, 4);
        let p = Point2i::new(0, 0);
        let mut rng = RNG::new(1);

        for _ in 0..64 {
            buffers.accumulate(&p, Spectrum::new(rng.uniform_float()));
        }

        assert!(!filter.converge_and_filter(&buffers));
    }

    #[test]
    fn standard_error_shrinks_with_sample_count() {
        // Not a strict per-step guarantee, but in expectation the reported
        // noise level must fall as samples accumulate
        let few = RenderBuffers::new(Point2i::new(1, 1));
        let many = RenderBuffers::new(Point2i::new(1, 1));
        let p = Point2i::new(0, 0);
        let mut rng = RNG::new(42);

        for i in 0..1000 {
            let v = Spectrum::new(rng.uniform_float());
            if i < 100 { few.accumulate(&p, v); }
            many.accumulate(&p, v);
        }

        let se = |b: &RenderBuffers| {
            let s = b.pixel(&p);
            (s.variance() / s.samples() as f32).sqrt()
        };

        assert!(se(&many) < se(&few));
    }

    #[test]
    fn converged_frame_reports_true() {
        let buffers = RenderBuffers::new(Point2i::new(2, 2));
        let filter = AdaptiveSampling::new(0.1, 4);

        for p in &buffers.pixel_bounds() {
            fill(&buffers, &p, 0.8, 16);
        }

        assert!(filter.converge_and_filter(&buffers));
        assert!(buffers.unconverged_mask().iter().all(|u| !u));
    }
}
