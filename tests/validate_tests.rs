use proptest::prelude::*;
use sropt::loader::Preset;
use sropt::options::TrainOptions;
use sropt::validate::{check_options, validate_options, Severity};
use std::path::PathBuf;

fn options_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("options")
}

fn base_options() -> TrainOptions {
    TrainOptions::load(options_dir().join("4x_RealESRGAN.yml")).unwrap()
}

fn error_paths(opts: &TrainOptions) -> Vec<String> {
    check_options(opts, true)
        .errors()
        .map(|i| i.path.clone())
        .collect()
}

#[test]
fn test_valid_document_passes() {
    let opts = base_options();
    assert!(validate_options(&opts).is_ok());
}

#[test]
fn test_validate_options_reports_first_error() {
    let mut opts = base_options();
    opts.scale = 0;
    opts.degradation.gray_noise_prob = Some(2.0);

    let err = validate_options(&opts).unwrap_err();
    let message = format!("{}", err);
    assert!(message.contains("scale"), "unexpected message: {}", message);
}

#[test]
fn test_scale_out_of_range() {
    let mut opts = base_options();
    opts.scale = 0;
    assert_eq!(error_paths(&opts), ["scale"]);

    opts.scale = 16;
    assert_eq!(error_paths(&opts), ["scale"]);
}

#[test]
fn test_probability_array_must_sum_to_one() {
    let mut opts = base_options();
    opts.degradation.resize_prob = Some(vec![0.2, 0.7, 0.2]);
    assert_eq!(error_paths(&opts), ["resize_prob"]);
}

#[test]
fn test_reversed_range_is_rejected() {
    let mut opts = base_options();
    opts.degradation.noise_range = Some([30.0, 1.0]);
    assert_eq!(error_paths(&opts), ["noise_range"]);
}

#[test]
fn test_scalar_probability_bounds() {
    let mut opts = base_options();
    opts.degradation.second_blur_prob = Some(1.2);
    assert_eq!(error_paths(&opts), ["second_blur_prob"]);
}

#[test]
fn test_kernel_prob_length_must_match_kernel_list() {
    let mut opts = base_options();
    let dataset = opts.datasets.get_mut("train").unwrap();
    dataset.kernel_prob = Some(vec![0.5, 0.5]);
    assert_eq!(error_paths(&opts), ["datasets.train.kernel_prob"]);
}

#[test]
fn test_even_blur_kernel_size_is_rejected() {
    let mut opts = base_options();
    opts.datasets.get_mut("train").unwrap().blur_kernel_size = Some(20);
    assert_eq!(error_paths(&opts), ["datasets.train.blur_kernel_size"]);
}

#[test]
fn test_milestones_must_be_increasing() {
    let mut opts = base_options();
    let train = opts.train.as_mut().unwrap();
    train.scheduler.as_mut().unwrap().milestones = Some(vec![400_000, 200_000]);
    assert_eq!(error_paths(&opts), ["train.scheduler.milestones"]);
}

#[test]
fn test_negative_loss_weight_is_rejected() {
    let mut opts = base_options();
    let train = opts.train.as_mut().unwrap();
    train.pixel_opt.as_mut().unwrap().loss_weight = Some(-1.0);
    assert_eq!(error_paths(&opts), ["train.pixel_opt.loss_weight"]);
}

#[test]
fn test_invalid_port_is_rejected() {
    let mut opts = base_options();
    opts.dist_params.as_mut().unwrap().port = Some(0);
    assert_eq!(error_paths(&opts), ["dist_params.port"]);
}

#[test]
fn test_unknown_type_tag_severity() {
    let mut opts = base_options();
    opts.network_g.as_mut().unwrap().kind = "HATNet".to_string();

    // Strict: an unresolved tag is an error.
    assert_eq!(error_paths(&opts), ["network_g.type"]);
    assert!(validate_options(&opts).is_err());

    // Lenient: the same finding is only a warning.
    let report = check_options(&opts, false);
    assert!(report.is_clean());
    let warning = report.warnings().next().unwrap();
    assert_eq!(warning.severity, Severity::Warning);
    assert!(warning.message.contains("HATNet"));
}

#[test]
fn test_report_collects_every_issue() {
    let mut opts = base_options();
    opts.scale = 0;
    opts.degradation.gray_noise_prob = Some(2.0);
    opts.datasets.get_mut("train").unwrap().batch_size_per_gpu = Some(0);

    let report = check_options(&opts, true);
    assert_eq!(report.errors().count(), 3);
}

#[test]
fn test_discriminator_optimizer_without_network_d_warns() {
    let mut opts = TrainOptions::template(Preset::Span, 4).unwrap();
    let train = opts.train.as_mut().unwrap();
    train.optim_d = train.optim_g.clone();

    let report = check_options(&opts, true);
    assert!(report.is_clean());
    assert!(report.warnings().any(|i| i.path == "train.optim_d"));
}

proptest! {
    #[test]
    fn prop_normalized_distributions_pass(weights in prop::collection::vec(0.05f64..10.0, 1..8)) {
        let sum: f64 = weights.iter().sum();
        let normalized: Vec<f64> = weights.iter().map(|w| w / sum).collect();

        let mut opts = base_options();
        opts.degradation.resize_prob = Some(normalized);
        prop_assert!(!error_paths(&opts).contains(&"resize_prob".to_string()));
    }

    #[test]
    fn prop_ordered_ranges_pass_and_reversed_fail(lo in -100.0f64..100.0, delta in 0.001f64..100.0) {
        let hi = lo + delta;

        let mut opts = base_options();
        opts.degradation.poisson_scale_range = Some([lo, hi]);
        prop_assert!(!error_paths(&opts).contains(&"poisson_scale_range".to_string()));

        opts.degradation.poisson_scale_range = Some([hi, lo]);
        prop_assert!(error_paths(&opts).contains(&"poisson_scale_range".to_string()));
    }
}
