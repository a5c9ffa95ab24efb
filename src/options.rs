use indexmap::IndexMap;
use serde_yaml::Value;
use std::convert::TryFrom;

/// A `[lower, upper]` pair as written in the option files.
pub type RangePair = [f64; 2];

/// One complete training-run option document.
///
/// The layout mirrors the YAML tree one-to-one: scalar run settings and the
/// degradation-pipeline parameters at the top level, then the nested
/// `datasets` / `network_*` / `path` / `train` / `val` / `logger` /
/// `dist_params` sections. Keys this crate does not model are retained in
/// order-preserving `extra` maps so a written-back document keeps everything
/// the external framework might read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOptions {
    /// Experiment name, used by the framework for checkpoint directories.
    pub name: String,

    /// External model class, e.g. `ESRGANModel` or `RealESRGANModel`.
    pub model_type: String,

    /// Upscaling factor.
    pub scale: u32,

    /// GPU count, or `auto` to use every visible device.
    pub num_gpu: NumGpu,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_seed: Option<u64>,

    /// Enables the two-stage synthetic degradation pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_order_degradation: Option<bool>,

    // Unsharp-mask sharpening of GT images, globally and per loss term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt_usm: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l1_gt_usm: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percep_gt_usm: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gan_gt_usm: Option<bool>,

    #[serde(flatten)]
    pub degradation: DegradationOptions,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_size: Option<u32>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub datasets: IndexMap<String, DatasetOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_g: Option<NetworkOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_d: Option<NetworkOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub train: Option<TrainSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<ValSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger: Option<LoggerSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_params: Option<DistParams>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl TrainOptions {
    pub fn high_order_degradation(&self) -> bool {
        self.high_order_degradation.unwrap_or(false)
    }

    /// The loss-term blocks present in `train`, paired with their option key.
    pub fn loss_terms(&self) -> Vec<(&'static str, &LossOptions)> {
        let mut terms = Vec::new();
        if let Some(train) = &self.train {
            let blocks = [
                ("pixel_opt", &train.pixel_opt),
                ("perceptual_opt", &train.perceptual_opt),
                ("contextual_opt", &train.contextual_opt),
                ("color_opt", &train.color_opt),
                ("gan_opt", &train.gan_opt),
            ];
            for (key, block) in blocks {
                if let Some(opt) = block {
                    terms.push((key, opt));
                }
            }
        }
        terms
    }
}

/// GPU count, with `auto` meaning "all visible devices".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NumGpuRepr", into = "NumGpuRepr")]
pub enum NumGpu {
    Auto,
    Count(u32),
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum NumGpuRepr {
    Count(u32),
    Label(String),
}

impl TryFrom<NumGpuRepr> for NumGpu {
    type Error = String;

    fn try_from(repr: NumGpuRepr) -> Result<Self, Self::Error> {
        match repr {
            NumGpuRepr::Count(n) => Ok(NumGpu::Count(n)),
            NumGpuRepr::Label(label) if label == "auto" => Ok(NumGpu::Auto),
            NumGpuRepr::Label(label) => Err(format!(
                "num_gpu must be an integer or 'auto', got '{}'",
                label
            )),
        }
    }
}

impl From<NumGpu> for NumGpuRepr {
    fn from(value: NumGpu) -> Self {
        match value {
            NumGpu::Auto => NumGpuRepr::Label("auto".to_string()),
            NumGpu::Count(n) => NumGpuRepr::Count(n),
        }
    }
}

/// Top-level degradation-pipeline parameters: the first-order stage and its
/// `*2` second-order twins. All fields are optional since paired-data
/// documents carry none of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DegradationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_prob: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_range: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaussian_noise_prob: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_range: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poisson_scale_range: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gray_noise_prob: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jpeg_range: Option<RangePair>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_blur_prob: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_prob2: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_range2: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaussian_noise_prob2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_range2: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poisson_scale_range2: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gray_noise_prob2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jpeg_range2: Option<RangePair>,
}

/// One entry under `datasets` (`train`, `val`, `val_2`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// External dataset class, e.g. `PairedImageDataset`.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataroot_gt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataroot_lq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_backend: Option<IoBackendOptions>,

    // Blur-kernel synthesis for on-the-fly degradation datasets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_kernel_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_list: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_prob: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sinc_prob: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_sigma: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub betag_range: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub betap_range: Option<RangePair>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_kernel_size2: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_list2: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_prob2: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sinc_prob2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_sigma2: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub betag_range2: Option<RangePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub betap_range2: Option<RangePair>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_sinc_prob: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt_size: Option<u32>,

    // Augmentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_hflip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_rot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixprob: Option<Vec<f64>>,

    // Data-loader parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_worker_per_gpu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size_per_gpu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_enlarge_ratio: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefetch_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_memory: Option<bool>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Storage backend for a dataset (`disk`, `lmdb`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoBackendOptions {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A `network_g` / `network_d` block: an external architecture name plus its
/// parameters, which this crate carries opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkOptions {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub params: IndexMap<String, Value>,
}

/// The `path` section: pretrained weights and resume state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretrain_network_g: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_key_g: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_load_g: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretrain_network_d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_key_d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_load_d: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiments_root: Option<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// The `train` section: optimizers, schedule, and loss terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_decay: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub optim_g: Option<OptimizerOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optim_d: Option<OptimizerOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerOptions>,

    pub total_iter: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup_iter: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_opt: Option<LossOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perceptual_opt: Option<LossOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_opt: Option<LossOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_opt: Option<LossOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gan_opt: Option<LossOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_d_iters: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_d_init_iters: Option<u32>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerOptions {
    #[serde(rename = "type")]
    pub kind: String,

    pub lr: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_decay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub betas: Option<RangePair>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerOptions {
    #[serde(rename = "type")]
    pub kind: String,

    /// Iteration checkpoints at which the learning rate is multiplied by
    /// `gamma` (milestone schedulers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One loss-term block (`pixel_opt`, `gan_opt`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossOptions {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction: Option<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// The `val` section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val_freq: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_img: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metrics: IndexMap<String, MetricOptions>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricOptions {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// The `logger` section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoggerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_freq: Option<u64>,

    /// Written with an explicit `!!float` tag in real documents (`5e3`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_checkpoint_freq: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tb_logger: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wandb: Option<WandbOptions>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WandbOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<String>,
}

/// The `dist_params` section selecting the collective-communication backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistParams {
    pub backend: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_gpu_auto_round_trip() {
        let auto: NumGpu = serde_yaml::from_str("auto").unwrap();
        assert_eq!(auto, NumGpu::Auto);
        assert_eq!(serde_yaml::to_string(&auto).unwrap().trim(), "auto");

        let count: NumGpu = serde_yaml::from_str("4").unwrap();
        assert_eq!(count, NumGpu::Count(4));
    }

    #[test]
    fn test_num_gpu_rejects_other_strings() {
        let result: Result<NumGpu, _> = serde_yaml::from_str("all");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_keys_are_retained() {
        let yaml = "type: RRDBNet\nnum_feat: 64\nnum_block: 23\n";
        let net: NetworkOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(net.kind, "RRDBNet");
        assert_eq!(net.params.len(), 2);
        assert_eq!(net.params["num_feat"], Value::from(64));

        let written = serde_yaml::to_string(&net).unwrap();
        let reparsed: NetworkOptions = serde_yaml::from_str(&written).unwrap();
        assert_eq!(reparsed, net);
    }

    #[test]
    fn test_range_pair_accepts_integers() {
        let yaml = "type: Adam\nlr: !!float 1e-4\nbetas: [0.9, 0.99]\nweight_decay: 0\n";
        let optim: OptimizerOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(optim.lr, 1e-4);
        assert_eq!(optim.betas, Some([0.9, 0.99]));
        assert_eq!(optim.weight_decay, Some(0.0));
    }

    #[test]
    fn test_loss_terms_in_declaration_order() {
        let yaml = "\
total_iter: 1000
pixel_opt:
  type: L1Loss
  loss_weight: 1.0
  reduction: mean
gan_opt:
  type: GANLoss
  gan_type: vanilla
  loss_weight: 0.1
";
        let train: TrainSection = serde_yaml::from_str(yaml).unwrap();
        let opts = TrainOptions {
            name: "t".to_string(),
            model_type: "ESRGANModel".to_string(),
            scale: 4,
            num_gpu: NumGpu::Count(1),
            manual_seed: None,
            high_order_degradation: None,
            gt_usm: None,
            l1_gt_usm: None,
            percep_gt_usm: None,
            gan_gt_usm: None,
            degradation: DegradationOptions::default(),
            gt_size: None,
            queue_size: None,
            datasets: IndexMap::new(),
            network_g: None,
            network_d: None,
            path: None,
            train: Some(train),
            val: None,
            logger: None,
            dist_params: None,
            extra: IndexMap::new(),
        };
        let terms = opts.loss_terms();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].0, "pixel_opt");
        assert_eq!(terms[0].1.kind, "L1Loss");
        assert_eq!(terms[1].0, "gan_opt");
        assert_eq!(terms[1].1.extra["gan_type"], Value::from("vanilla"));
    }
}
