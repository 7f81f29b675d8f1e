use gravmon_core::MovingAverage;
use rstest::rstest;

#[test]
fn disabled_window_is_identity() {
    let mut f = MovingAverage::new(0);
    for v in [0.0, 1.5, -3.25, 1e6, -0.0001] {
        assert_eq!(f.filter(v), v);
        assert!(f.is_empty(), "disabled filter must keep no history");
    }
}

#[test]
fn window_three_reference_sequence() {
    // Average of the last <=3 readings seen so far, not a zero-padded window.
    let mut f = MovingAverage::new(3);
    assert_eq!(f.filter(1.0), 1.0);
    assert_eq!(f.filter(2.0), 1.5);
    assert_eq!(f.filter(3.0), 2.0);
    assert_eq!(f.filter(4.0), 3.0);
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(8)]
fn history_length_is_min_of_calls_and_window(#[case] window: usize) {
    let mut f = MovingAverage::new(window);
    for i in 0..window * 3 {
        let _ = f.filter(i as f64);
        assert_eq!(f.len(), usize::min(i + 1, window));
    }
}

#[test]
fn reset_then_single_sample_averages_to_itself() {
    let mut f = MovingAverage::new(4);
    for v in [3.0, -1.0, 10.0, 2.0, 8.0] {
        let _ = f.filter(v);
    }
    f.reset();
    assert_eq!(f.filter(-2.5), -2.5);
}

#[test]
fn window_one_tracks_input() {
    let mut f = MovingAverage::new(1);
    assert_eq!(f.filter(5.0), 5.0);
    assert_eq!(f.filter(-7.0), -7.0);
    assert_eq!(f.len(), 1);
}

#[test]
fn non_finite_input_poisons_until_reset() {
    let mut f = MovingAverage::new(2);
    let _ = f.filter(1.0);
    assert!(f.filter(f64::NAN).is_nan());
    // NaN stays in the running sum even once the sample itself is evicted.
    assert!(f.filter(2.0).is_nan());
    assert!(f.filter(3.0).is_nan());
    f.reset();
    assert_eq!(f.filter(2.0), 2.0);
}
