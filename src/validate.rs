use crate::constants::{degradation, limits};
use crate::error::{OptError, Result};
use crate::options::{
    DatasetOptions, LossOptions, NumGpu, OptimizerOptions, RangePair, SchedulerOptions,
    TrainOptions, TrainSection,
};
use crate::registry::{self, ComponentKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single finding, located by its dotted path into the document.
#[derive(Debug, Clone)]
pub struct Issue {
    pub path: String,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

/// Every issue found in one document.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.issues.iter().all(|i| i.severity != Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }
}

/// Checks every structural property of a document and reports all findings.
///
/// With `strict` set, a `type` tag that does not resolve against the
/// component registry is an error; otherwise it is a warning, so documents
/// written for newer framework builds still pass.
pub fn check_options(opts: &TrainOptions, strict: bool) -> Report {
    let mut c = Checker::new(strict);

    if opts.scale < limits::MIN_SCALE || opts.scale > limits::MAX_SCALE {
        c.error(
            "scale",
            format!(
                "must be between {} and {}, got {}",
                limits::MIN_SCALE,
                limits::MAX_SCALE,
                opts.scale
            ),
        );
    }
    if opts.num_gpu == NumGpu::Count(0) {
        c.error("num_gpu", "must be 'auto' or at least 1".to_string());
    }
    c.component("model_type", ComponentKind::Model, &opts.model_type);

    check_degradation(&mut c, opts);

    for (key, dataset) in &opts.datasets {
        check_dataset(&mut c, &format!("datasets.{}", key), dataset);
    }

    if let Some(net) = &opts.network_g {
        c.component("network_g.type", ComponentKind::NetworkG, &net.kind);
    }
    if let Some(net) = &opts.network_d {
        c.component("network_d.type", ComponentKind::NetworkD, &net.kind);
    }

    if let Some(train) = &opts.train {
        check_train(&mut c, opts, train);
    }

    if let Some(val) = &opts.val {
        if let Some(freq) = val.val_freq {
            if !(freq > 0.0) {
                c.error("val.val_freq", "must be positive".to_string());
            }
        }
        for (key, metric) in &val.metrics {
            c.component(
                &format!("val.metrics.{}.type", key),
                ComponentKind::Metric,
                &metric.kind,
            );
        }
    }

    if let Some(logger) = &opts.logger {
        if logger.print_freq == Some(0) {
            c.error("logger.print_freq", "must be at least 1".to_string());
        }
        if let Some(freq) = logger.save_checkpoint_freq {
            if !(freq > 0.0) {
                c.error("logger.save_checkpoint_freq", "must be positive".to_string());
            }
        }
    }

    if let Some(dist) = &opts.dist_params {
        c.component(
            "dist_params.backend",
            ComponentKind::DistBackend,
            &dist.backend,
        );
        if let Some(port) = dist.port {
            if port == 0 || port > limits::MAX_PORT {
                c.error("dist_params.port", format!("invalid port {}", port));
            }
        }
    }

    Report { issues: c.issues }
}

/// Strict single-result entry point: the first error found, as an `OptError`.
pub fn validate_options(opts: &TrainOptions) -> Result<()> {
    let report = check_options(opts, true);
    let first = report.errors().next().map(|issue| issue.to_string());
    match first {
        Some(message) => Err(OptError::Validation(message)),
        None => Ok(()),
    }
}

fn check_degradation(c: &mut Checker, opts: &TrainOptions) {
    let d = &opts.degradation;

    c.opt_prob_array("resize_prob", &d.resize_prob);
    c.opt_prob_array("resize_prob2", &d.resize_prob2);

    c.opt_probability("gaussian_noise_prob", d.gaussian_noise_prob);
    c.opt_probability("gray_noise_prob", d.gray_noise_prob);
    c.opt_probability("second_blur_prob", d.second_blur_prob);
    c.opt_probability("gaussian_noise_prob2", d.gaussian_noise_prob2);
    c.opt_probability("gray_noise_prob2", d.gray_noise_prob2);

    c.opt_range_pair("resize_range", &d.resize_range);
    c.opt_range_pair("noise_range", &d.noise_range);
    c.opt_range_pair("poisson_scale_range", &d.poisson_scale_range);
    c.opt_range_pair("jpeg_range", &d.jpeg_range);
    c.opt_range_pair("resize_range2", &d.resize_range2);
    c.opt_range_pair("noise_range2", &d.noise_range2);
    c.opt_range_pair("poisson_scale_range2", &d.poisson_scale_range2);
    c.opt_range_pair("jpeg_range2", &d.jpeg_range2);

    if opts.high_order_degradation.unwrap_or(false) && d.resize_prob2.is_none() {
        c.warning(
            "high_order_degradation",
            "enabled but no second-order degradation parameters are present".to_string(),
        );
    }
}

fn check_dataset(c: &mut Checker, path: &str, dataset: &DatasetOptions) {
    c.component(&format!("{}.type", path), ComponentKind::Dataset, &dataset.kind);

    if let Some(backend) = &dataset.io_backend {
        c.component(
            &format!("{}.io_backend.type", path),
            ComponentKind::IoBackend,
            &backend.kind,
        );
    }
    if let Some(mode) = &dataset.prefetch_mode {
        c.component(
            &format!("{}.prefetch_mode", path),
            ComponentKind::PrefetchMode,
            mode,
        );
    }

    c.opt_prob_array(&format!("{}.kernel_prob", path), &dataset.kernel_prob);
    c.opt_prob_array(&format!("{}.kernel_prob2", path), &dataset.kernel_prob2);
    c.opt_prob_array(&format!("{}.mixprob", path), &dataset.mixprob);

    c.opt_probability(&format!("{}.sinc_prob", path), dataset.sinc_prob);
    c.opt_probability(&format!("{}.sinc_prob2", path), dataset.sinc_prob2);
    c.opt_probability(&format!("{}.final_sinc_prob", path), dataset.final_sinc_prob);

    c.opt_range_pair(&format!("{}.blur_sigma", path), &dataset.blur_sigma);
    c.opt_range_pair(&format!("{}.betag_range", path), &dataset.betag_range);
    c.opt_range_pair(&format!("{}.betap_range", path), &dataset.betap_range);
    c.opt_range_pair(&format!("{}.blur_sigma2", path), &dataset.blur_sigma2);
    c.opt_range_pair(&format!("{}.betag_range2", path), &dataset.betag_range2);
    c.opt_range_pair(&format!("{}.betap_range2", path), &dataset.betap_range2);

    // The framework centres blur kernels, so sizes must be odd.
    for (key, size) in [
        ("blur_kernel_size", dataset.blur_kernel_size),
        ("blur_kernel_size2", dataset.blur_kernel_size2),
    ] {
        if let Some(size) = size {
            if size % 2 == 0 {
                c.error(&format!("{}.{}", path, key), format!("must be odd, got {}", size));
            }
        }
    }

    // A kernel distribution must cover exactly the listed kernels.
    if let (Some(list), Some(prob)) = (&dataset.kernel_list, &dataset.kernel_prob) {
        if list.len() != prob.len() {
            c.error(
                &format!("{}.kernel_prob", path),
                format!("has {} entries for {} kernels", prob.len(), list.len()),
            );
        }
    }
    if let (Some(list), Some(prob)) = (&dataset.kernel_list2, &dataset.kernel_prob2) {
        if list.len() != prob.len() {
            c.error(
                &format!("{}.kernel_prob2", path),
                format!("has {} entries for {} kernels", prob.len(), list.len()),
            );
        }
    }

    for (key, count) in [
        ("num_worker_per_gpu", dataset.num_worker_per_gpu),
        ("batch_size_per_gpu", dataset.batch_size_per_gpu),
        ("dataset_enlarge_ratio", dataset.dataset_enlarge_ratio),
    ] {
        if count == Some(0) {
            c.error(&format!("{}.{}", path, key), "must be at least 1".to_string());
        }
    }
}

fn check_train(c: &mut Checker, opts: &TrainOptions, train: &TrainSection) {
    if train.total_iter < limits::MIN_TOTAL_ITER {
        c.error("train.total_iter", "must be at least 1".to_string());
    }
    if let Some(warmup) = train.warmup_iter {
        if warmup < -1 {
            c.error(
                "train.warmup_iter",
                format!("must be -1 (disabled) or non-negative, got {}", warmup),
            );
        }
    }
    if let Some(decay) = train.ema_decay {
        if !(0.0..1.0).contains(&decay) {
            c.error("train.ema_decay", format!("must be in [0, 1), got {}", decay));
        }
    }

    if let Some(optim) = &train.optim_g {
        check_optimizer(c, "train.optim_g", optim);
    }
    if let Some(optim) = &train.optim_d {
        check_optimizer(c, "train.optim_d", optim);
    }
    if train.optim_d.is_some() && opts.network_d.is_none() {
        c.warning(
            "train.optim_d",
            "a discriminator optimizer is configured but network_d is absent".to_string(),
        );
    }

    if let Some(scheduler) = &train.scheduler {
        check_scheduler(c, "train.scheduler", scheduler);
    }

    for (key, loss) in [
        ("pixel_opt", &train.pixel_opt),
        ("perceptual_opt", &train.perceptual_opt),
        ("contextual_opt", &train.contextual_opt),
        ("color_opt", &train.color_opt),
        ("gan_opt", &train.gan_opt),
    ] {
        if let Some(loss) = loss {
            check_loss(c, &format!("train.{}", key), loss);
        }
    }

    if train.net_d_iters == Some(0) {
        c.error("train.net_d_iters", "must be at least 1".to_string());
    }
}

fn check_optimizer(c: &mut Checker, path: &str, optim: &OptimizerOptions) {
    c.component(&format!("{}.type", path), ComponentKind::Optimizer, &optim.kind);

    if !optim.lr.is_finite() || optim.lr <= 0.0 {
        c.error(&format!("{}.lr", path), format!("must be positive, got {}", optim.lr));
    }
    if let Some(decay) = optim.weight_decay {
        if !decay.is_finite() || decay < 0.0 {
            c.error(
                &format!("{}.weight_decay", path),
                format!("must be non-negative, got {}", decay),
            );
        }
    }
    if let Some([beta1, beta2]) = optim.betas {
        for (name, beta) in [("betas[0]", beta1), ("betas[1]", beta2)] {
            if !(0.0..1.0).contains(&beta) {
                c.error(
                    &format!("{}.{}", path, name),
                    format!("must be in [0, 1), got {}", beta),
                );
            }
        }
    }
}

fn check_scheduler(c: &mut Checker, path: &str, scheduler: &SchedulerOptions) {
    c.component(
        &format!("{}.type", path),
        ComponentKind::Scheduler,
        &scheduler.kind,
    );

    if let Some(gamma) = scheduler.gamma {
        if !(gamma > 0.0 && gamma <= 1.0) {
            c.error(
                &format!("{}.gamma", path),
                format!("must be in (0, 1], got {}", gamma),
            );
        }
    }
    if let Some(milestones) = &scheduler.milestones {
        if milestones.is_empty() {
            c.error(&format!("{}.milestones", path), "must not be empty".to_string());
        }
        if milestones.first() == Some(&0) {
            c.error(
                &format!("{}.milestones", path),
                "milestones must be positive".to_string(),
            );
        }
        if milestones.windows(2).any(|w| w[0] >= w[1]) {
            c.error(
                &format!("{}.milestones", path),
                "milestones must be strictly increasing".to_string(),
            );
        }
    }
}

fn check_loss(c: &mut Checker, path: &str, loss: &LossOptions) {
    c.component(&format!("{}.type", path), ComponentKind::Loss, &loss.kind);

    if let Some(weight) = loss.loss_weight {
        if !weight.is_finite() || weight < 0.0 {
            c.error(
                &format!("{}.loss_weight", path),
                format!("must be finite and non-negative, got {}", weight),
            );
        }
    }
    if let Some(reduction) = &loss.reduction {
        if !["none", "mean", "sum"].contains(&reduction.as_str()) {
            c.error(
                &format!("{}.reduction", path),
                format!("must be one of none/mean/sum, got '{}'", reduction),
            );
        }
    }
}

struct Checker {
    issues: Vec<Issue>,
    strict: bool,
}

impl Checker {
    fn new(strict: bool) -> Self {
        Checker {
            issues: Vec::new(),
            strict,
        }
    }

    fn error(&mut self, path: &str, message: String) {
        self.issues.push(Issue {
            path: path.to_string(),
            severity: Severity::Error,
            message,
        });
    }

    fn warning(&mut self, path: &str, message: String) {
        self.issues.push(Issue {
            path: path.to_string(),
            severity: Severity::Warning,
            message,
        });
    }

    fn component(&mut self, path: &str, kind: ComponentKind, name: &str) {
        if registry::is_known(kind, name) {
            return;
        }
        let message = format!("'{}' is not a known {} type", name, kind.label());
        if self.strict {
            self.error(path, message);
        } else {
            self.warning(path, message);
        }
    }

    /// A probability distribution: non-empty, non-negative, sums to 1.
    fn prob_array(&mut self, path: &str, values: &[f64]) {
        if values.is_empty() {
            self.error(path, "probability array must not be empty".to_string());
            return;
        }
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            self.error(path, "probabilities must be non-negative".to_string());
            return;
        }
        let sum: f64 = values.iter().sum();
        if (sum - 1.0).abs() > degradation::PROB_SUM_TOLERANCE {
            self.error(path, format!("probabilities sum to {}, expected 1.0", sum));
        }
    }

    fn opt_prob_array(&mut self, path: &str, values: &Option<Vec<f64>>) {
        if let Some(values) = values {
            self.prob_array(path, values);
        }
    }

    fn probability(&mut self, path: &str, p: f64) {
        if !(0.0..=1.0).contains(&p) {
            self.error(path, format!("must be in [0, 1], got {}", p));
        }
    }

    fn opt_probability(&mut self, path: &str, p: Option<f64>) {
        if let Some(p) = p {
            self.probability(path, p);
        }
    }

    /// A `[lower, upper]` pair must satisfy lower <= upper.
    fn range_pair(&mut self, path: &str, pair: &RangePair) {
        let [lower, upper] = *pair;
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            self.error(path, format!("invalid range [{}, {}]", lower, upper));
        }
    }

    fn opt_range_pair(&mut self, path: &str, pair: &Option<RangePair>) {
        if let Some(pair) = pair {
            self.range_pair(path, pair);
        }
    }
}
