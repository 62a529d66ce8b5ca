extern crate hamcrest2;

#[cfg(test)]
mod validator_spec {
    use std::env;
    use hamcrest2::prelude::*;
    use log::info;
    use rstest::*;
    use crate::libs::channel_codec::crc::Polynomial;
    use crate::libs::channel_noise::burst_error::{BurstPolicy, InteriorFlips, TrailingEdge};
    use crate::libs::error::error::Error;
    use crate::libs::validator::validator::{run_experiment, run_trial, Experiment, ExperimentReport};

    #[ctor::ctor]
    fn before_each() {
        env::set_var("RUST_LOG", "info");
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[ctor::dtor]
    fn after_each() {}

    // 1648 message bits, plenty for a 1000-offset sweep of long bursts.
    fn message() -> Vec<u8> {
        "Mr. and Mrs. Dursley, of number four, Privet Drive, were proud to say that they were perfectly normal. "
            .repeat(2)
            .into_bytes()
    }

    #[fixture]
    fn experiment() -> Experiment {
        Experiment::new(&message(), Polynomial::default(), 4, BurstPolicy::default()).unwrap()
    }

    #[test]
    fn letter_a_burst_of_four_at_zero_is_detected() {
        let clean = run_trial(b"A", &Polynomial::default(), 4, 4, 0).unwrap();
        assert_that!(clean, equal_to(false));
    }

    #[test]
    fn trial_rejects_mismatched_crc_length() {
        match run_trial(b"A", &Polynomial::default(), 5, 4, 0) {
            Err(Error::LengthMismatch { left, right }) => {
                assert_that!(left, equal_to(5));
                assert_that!(right, equal_to(4));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    fn bursts_no_longer_than_the_degree_are_always_detected(experiment: Experiment, #[case] burst_len: usize) {
        let report = experiment.run(burst_len, 1000).unwrap();
        assert_that!(report.missed, equal_to(0));
        assert_that!(report.detected, equal_to(1000));
    }

    #[rstest]
    #[case(8)]
    #[case(16)]
    #[case(64)]
    fn long_bursts_sometimes_escape_detection(experiment: Experiment, #[case] burst_len: usize) {
        let report = experiment.run(burst_len, 1000).unwrap();
        info!("{}", report);
        assert_that!(report.total, equal_to(1000));
        assert_that!(report.missed, greater_than(0));
        assert_that!(report.missed, less_than(250));
        assert_that!(report.missed + report.detected, equal_to(report.total));
    }

    #[rstest]
    fn experiments_are_reproducible(experiment: Experiment) {
        let first = experiment.run(12, 500).unwrap();
        let second = experiment.run(12, 500).unwrap();
        assert_that!(first, equal_to(second));
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(7)]
    #[case(64)]
    fn parallel_run_matches_sequential_run(experiment: Experiment, #[case] workers: usize) {
        let sequential = experiment.run(10, 1000).unwrap();
        let parallel = experiment.run_parallel(10, 1000, workers).unwrap();
        assert_that!(parallel, equal_to(sequential));
    }

    #[test]
    fn free_function_counts_match_the_report() {
        let message = message();
        let (missed, total) = run_experiment(&message, &Polynomial::default(), 4, 10, 1000).unwrap();
        let report = Experiment::new(&message, Polynomial::default(), 4, BurstPolicy::default())
            .unwrap()
            .run(10, 1000)
            .unwrap();
        assert_that!(missed, equal_to(report.missed));
        assert_that!(total, equal_to(1000));
    }

    #[rstest]
    fn sweep_reports_every_burst_length(experiment: Experiment) {
        let reports = experiment.sweep(2..=9, 200, 4).unwrap();
        let lens: Vec<usize> = reports.iter().map(|r| r.burst_len).collect();
        assert_that!(lens, equal_to(vec![2, 3, 4, 5, 6, 7, 8, 9]));
        for report in reports.iter().take(3) {
            assert_that!(report.missed, equal_to(0));
        }
    }

    #[rstest]
    fn sweep_that_overruns_the_message_fails_whole_run(experiment: Experiment) {
        // codeword is 1652 bits; offsets up to 999 leave room for bursts up to 653
        assert_that!(experiment.sweep(652..=654, 1000, 2), err());
    }

    #[rstest]
    fn burst_too_long_for_the_offsets_fails_before_running(experiment: Experiment) {
        match experiment.run(700, 1000) {
            Err(Error::IndexOutOfRange { index, len }) => {
                assert_that!(index, equal_to(999 + 699));
                assert_that!(len, equal_to(1652));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_that!(experiment.run_parallel(700, 1000, 4), err());
    }

    #[rstest]
    fn burst_length_near_usize_max_is_out_of_range(experiment: Experiment) {
        match experiment.run(usize::MAX, 10) {
            Err(Error::IndexOutOfRange { len, .. }) => assert_that!(len, equal_to(1652)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[rstest]
    fn burst_shorter_than_two_is_rejected(experiment: Experiment) {
        match experiment.run(1, 10) {
            Err(Error::InvalidBurstLength(n)) => assert_that!(n, equal_to(1)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn fixed_interior_policy_with_beyond_edge_runs() {
        let policy = BurstPolicy { trailing_edge: TrailingEdge::InvertedFollowingBit, interior_flips: InteriorFlips::burst_minus_three(8) };
        let experiment = Experiment::new(&message(), Polynomial::default(), 4, policy).unwrap();
        let report = experiment.run(8, 1000).unwrap();
        assert_that!(report.total, equal_to(1000));
        // the last offset needs 999 + 9 bits
        assert_that!(experiment.codeword_len() >= 1008, equal_to(true));
    }

    #[test]
    fn zero_trials_report_nothing() {
        let experiment = Experiment::new(b"A", Polynomial::default(), 4, BurstPolicy::default()).unwrap();
        let report = experiment.run(4, 0).unwrap();
        assert_that!(report, equal_to(ExperimentReport { burst_len: 4, missed: 0, detected: 0, total: 0 }));
        assert_that!(report.miss_probability(), equal_to(0.0));
    }

    #[test]
    fn report_display() {
        let report = ExperimentReport { burst_len: 8, missed: 62, detected: 938, total: 1000 };
        assert_that!(report.miss_probability(), equal_to(0.062));
        assert_that!(report.to_string(), equal_to("Burst   8: missed 62 of 1000 trials (P(miss) = 0.062000)".to_string()));
    }
}
