#[cfg(test)]
mod tests {
    use crate::decomposition::{gather, BandArena, DecompositionSchema};
    use crate::pheno::{
        detect, Detection, NoPeakReason, OutsideGiantPolicy, PhenoConfig, PhenoDetector, NO_PEAK,
    };
    use crate::series::TimeSeries;
    use crate::Result;

    /// Slices 0-2 point along x, slices 3-5 along y. 2 and 3 are the closest
    /// pair across the regimes.
    fn two_regimes() -> Vec<Vec<f32>> {
        vec![
            vec![1.0, 0.0],
            vec![1.0, 0.05],
            vec![1.0, 0.2],
            vec![0.2, 1.0],
            vec![0.05, 1.0],
            vec![0.0, 1.0],
        ]
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn config() -> PhenoConfig {
        PhenoConfig::new().with_min_giant_size(5).with_window_size(3)
    }

    #[test]
    fn test_peak_at_regime_boundary() -> Result<()> {
        init_tracing();
        let series = TimeSeries::from_slices(two_regimes())?;
        let detection = detect(&series, 0..6, &config());
        let Detection::Peak { index, score } = detection else {
            panic!("expected a peak, got {detection:?}");
        };
        assert!(index == 2 || index == 3, "peak {index} inside a regime");
        // Bridge node: betweenness 12/20 over clustering 1/3.
        assert!((score - 1.8).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_unreachable_target_has_no_peak() -> Result<()> {
        init_tracing();
        let series = TimeSeries::from_slices(vec![
            vec![1.0f32, 1.0],
            vec![1.0, 1.01],
            vec![1.01, 1.0],
            vec![1.0, 0.99],
        ])?;
        let detector = PhenoDetector::new(vec![series], config())?;
        let detections = detector.process();
        assert_eq!(
            detections[0],
            Detection::NoPeak(NoPeakReason::InsufficientConnectivity { target: 5 })
        );
        assert_eq!(detector.peak_indices(), vec![NO_PEAK]);
        Ok(())
    }

    #[test]
    fn test_empty_and_single_slice_series() -> Result<()> {
        let empty = TimeSeries::<f32>::new();
        let single = TimeSeries::from_slices(vec![vec![0.3f32, 0.4]])?;
        let detector = PhenoDetector::new(vec![empty, single], PhenoConfig::default())?;
        assert_eq!(detector.peak_indices(), vec![NO_PEAK, NO_PEAK]);
        Ok(())
    }

    #[test]
    fn test_isolated_slice_policies() -> Result<()> {
        // A zero slice in front never connects, so it is outside the giant.
        let mut slices = vec![vec![0.0f32, 0.0]];
        slices.extend(two_regimes());
        let series = TimeSeries::from_slices(slices)?;
        let base = PhenoConfig::new().with_min_giant_size(6).with_window_size(3);

        // Scoring stops at node 0, so the bridge nodes keep their raw
        // betweenness 12 / (6 * 5) instead of being divided by clustering.
        let Detection::Peak { index, score } = detect(&series, 0..7, &base) else {
            panic!("expected a peak");
        };
        assert_eq!(index, 3);
        assert!((score - 0.4).abs() < 1e-9, "score {score}");

        let Detection::Peak { index, score } = detect(
            &series,
            0..7,
            &base.with_outside_policy(OutsideGiantPolicy::SkipOutside),
        ) else {
            panic!("expected a peak");
        };
        assert_eq!(index, 3);
        assert!((score - 1.2).abs() < 1e-9, "score {score}");
        Ok(())
    }

    #[test]
    fn test_time_range_override() -> Result<()> {
        // Two leading slices resemble the first regime but sit outside the range.
        let mut slices = vec![vec![1.0f32, 0.0], vec![1.0, 0.0]];
        slices.extend(two_regimes());
        let series = TimeSeries::from_slices(slices)?;
        let config = PhenoConfig::new()
            .with_min_giant_size(6)
            .with_window_size(3)
            .with_outside_policy(OutsideGiantPolicy::SkipOutside);

        let detector = PhenoDetector::new(vec![series], config)?.with_time_range(0, 2..8)?;
        assert_eq!(detector.peak_indices(), vec![4]);
        Ok(())
    }

    #[test]
    fn test_results_keep_input_order() -> Result<()> {
        let good = TimeSeries::from_slices(two_regimes())?;
        let short = TimeSeries::from_slices(vec![vec![1.0f32, 0.0]; 2])?;
        let detector =
            PhenoDetector::new(vec![short.clone(), good.clone(), short, good], config())?;
        let peaks = detector.peak_indices();
        assert_eq!(peaks[0], NO_PEAK);
        assert_eq!(peaks[2], NO_PEAK);
        assert_eq!(peaks[1], peaks[3]);
        assert!(peaks[1] == 2 || peaks[1] == 3);
        Ok(())
    }

    #[test]
    fn test_integer_series() -> Result<()> {
        let slices: Vec<Vec<i32>> = vec![
            vec![100, 0],
            vec![100, 5],
            vec![100, 20],
            vec![20, 100],
            vec![5, 100],
            vec![0, 100],
        ];
        let series = TimeSeries::from_slices(slices)?;
        let index = detect(&series, 0..6, &config()).index();
        assert!(matches!(index, Some(2) | Some(3)));
        Ok(())
    }

    #[test]
    fn test_scatter_detect_gather() -> Result<()> {
        // 3 pixels × 6 slices × 2 bands; pixel 1 is flat and cannot connect.
        let regimes = two_regimes();
        let mut arena = BandArena::<f32>::new(6, 2, 3);
        for (t, slice) in regimes.iter().enumerate() {
            for band in 0..2 {
                let v = slice[band];
                arena.set_band(t, band, &[v, 0.0, v])?;
            }
        }

        let schema = DecompositionSchema::balanced(3, 2)?;
        let per_rank: Vec<Vec<usize>> = arena
            .scatter(&schema)?
            .into_iter()
            .map(|series| PhenoDetector::new(series, config()).map(|d| d.peak_indices()))
            .collect::<Result<_>>()?;

        let peaks = gather(&schema, &per_rank)?;
        assert_eq!(peaks.len(), 3);
        assert!(peaks[0] == 2 || peaks[0] == 3);
        assert_eq!(peaks[1], NO_PEAK);
        assert_eq!(peaks[0], peaks[2]);
        Ok(())
    }
}
