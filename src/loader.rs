use crate::constants::template;
use crate::error::{OptError, Result};
use crate::options::TrainOptions;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use std::str::FromStr;

impl TrainOptions {
    /// Parses one option document from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads an option document from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OptError::FileNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = self.to_yaml_string()?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// A ready-to-edit document for a preset, with comments stripped.
    pub fn template(preset: Preset, scale: u32) -> Result<Self> {
        Self::from_yaml_str(&template_yaml(preset, scale))
    }
}

/// Parses YAML text into a raw key/value tree.
pub fn parse_value_tree(yaml: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Parses a document and re-serializes it in canonical form.
///
/// Verifies the format-preservation property on the way: re-parsing the
/// written text must yield the tree that was written.
pub fn normalize_str(yaml: &str) -> Result<String> {
    let opts = TrainOptions::from_yaml_str(yaml)?;
    let written = opts.to_yaml_string()?;
    let reparsed = TrainOptions::from_yaml_str(&written)?;
    if reparsed != opts {
        return Err(OptError::Serialization(
            "document did not survive a serialize/re-parse round trip".to_string(),
        ));
    }
    Ok(written)
}

/// The training-run templates `generate` can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Classic paired ESRGAN training (RRDB generator, UNet discriminator).
    Esrgan,
    /// Real-ESRGAN finetuning with the two-stage synthetic degradation
    /// pipeline.
    RealEsrgan,
    /// Lightweight SPAN training with a pixel loss only.
    Span,
}

impl Preset {
    pub fn label(self) -> &'static str {
        match self {
            Preset::Esrgan => "esrgan",
            Preset::RealEsrgan => "realesrgan",
            Preset::Span => "span",
        }
    }
}

impl FromStr for Preset {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "esrgan" => Ok(Preset::Esrgan),
            "realesrgan" => Ok(Preset::RealEsrgan),
            "span" => Ok(Preset::Span),
            other => Err(OptError::InvalidParameter(format!(
                "unknown preset: {}. Use 'esrgan', 'realesrgan' or 'span'",
                other
            ))),
        }
    }
}

/// Returns the commented template document for a preset.
pub fn template_yaml(preset: Preset, scale: u32) -> String {
    match preset {
        Preset::Esrgan => esrgan_template(scale),
        Preset::RealEsrgan => realesrgan_template(scale),
        Preset::Span => span_template(scale),
    }
}

fn esrgan_template(scale: u32) -> String {
    format!(
        r#"# Paired ESRGAN training: RRDB generator against a UNet discriminator.
name: {scale}x_ESRGAN
model_type: ESRGANModel
scale: {scale}
num_gpu: 1
manual_seed: 0

datasets:
  train:
    name: DF2K
    type: PairedImageDataset
    dataroot_gt: datasets/DF2K/GT
    dataroot_lq: datasets/DF2K/LQ
    io_backend:
      type: disk
    gt_size: {gt_size}
    use_hflip: true
    use_rot: true
    # Data-loader settings, per GPU.
    num_worker_per_gpu: {workers}
    batch_size_per_gpu: {batch}
    dataset_enlarge_ratio: 1
    prefetch_mode: ~
  val:
    name: Set5
    type: PairedImageDataset
    dataroot_gt: datasets/Set5/GT
    dataroot_lq: datasets/Set5/LQ
    io_backend:
      type: disk

network_g:
  type: RRDBNet
  num_in_ch: 3
  num_out_ch: 3
  num_feat: 64
  num_block: 23
  num_grow_ch: 32

network_d:
  type: UNetDiscriminatorSN
  num_in_ch: 3
  num_feat: 64
  skip_connection: true

path:
  # Set to a .pth file to start from pretrained weights.
  pretrain_network_g: ~
  strict_load_g: true
  resume_state: ~

train:
  ema_decay: {ema}
  optim_g:
    type: Adam
    lr: !!float {lr:e}
    weight_decay: 0
    betas: [0.9, 0.99]
  optim_d:
    type: Adam
    lr: !!float {lr:e}
    weight_decay: 0
    betas: [0.9, 0.99]
  scheduler:
    type: MultiStepLR
    milestones: [{half_iter}, {total_iter}]
    gamma: 0.5
  total_iter: {total_iter}
  warmup_iter: -1
  pixel_opt:
    type: L1Loss
    loss_weight: 1.0
    reduction: mean
  perceptual_opt:
    type: PerceptualLoss
    layer_weights:
      conv5_4: 1
    vgg_type: vgg19
    use_input_norm: true
    range_norm: false
    perceptual_weight: 1.0
    style_weight: 0
    criterion: l1
  gan_opt:
    type: GANLoss
    gan_type: vanilla
    real_label_val: 1.0
    fake_label_val: 0.0
    loss_weight: !!float 5e-3
  net_d_iters: 1
  net_d_init_iters: 0

val:
  val_freq: !!float 5e3
  save_img: false
  metrics:
    psnr:
      type: calculate_psnr
      crop_border: {scale}
      test_y_channel: false

logger:
  print_freq: 100
  save_checkpoint_freq: !!float 5e3
  use_tb_logger: true
  wandb:
    project: ~
    resume_id: ~

dist_params:
  backend: nccl
  port: {port}
"#,
        scale = scale,
        gt_size = scale * 32,
        workers = template::DEFAULT_NUM_WORKER_PER_GPU,
        batch = template::DEFAULT_BATCH_SIZE_PER_GPU,
        ema = template::DEFAULT_EMA_DECAY,
        lr = template::DEFAULT_LEARNING_RATE,
        half_iter = template::DEFAULT_TOTAL_ITER / 2,
        total_iter = template::DEFAULT_TOTAL_ITER,
        port = template::DEFAULT_DIST_PORT,
    )
}

fn realesrgan_template(scale: u32) -> String {
    format!(
        r#"# Real-ESRGAN finetuning with the two-stage synthetic degradation pipeline.
name: {scale}x_RealESRGAN
model_type: RealESRGANModel
scale: {scale}
num_gpu: auto
manual_seed: 0

# Sharpen GT images before loss computation, except for the GAN term.
gt_usm: true
l1_gt_usm: true
percep_gt_usm: true
gan_gt_usm: false

high_order_degradation: true

# First degradation stage.
resize_prob: [0.2, 0.7, 0.1]  # up, down, keep
resize_range: [0.15, 1.5]
gaussian_noise_prob: 0.5
noise_range: [1, 30]
poisson_scale_range: [0.05, 3]
gray_noise_prob: 0.4
jpeg_range: [30, 95]

# Second degradation stage.
second_blur_prob: 0.8
resize_prob2: [0.3, 0.4, 0.3]  # up, down, keep
resize_range2: [0.3, 1.2]
gaussian_noise_prob2: 0.5
noise_range2: [1, 25]
poisson_scale_range2: [0.05, 2.5]
gray_noise_prob2: 0.4
jpeg_range2: [30, 95]

gt_size: {gt_size}
queue_size: 180

datasets:
  train:
    name: DF2K+OST
    type: RealESRGANDataset
    dataroot_gt: datasets/DF2K
    meta_info: datasets/DF2K/meta_info/meta_info_DF2Kmultiscale_OST.txt
    io_backend:
      type: disk

    blur_kernel_size: 21
    kernel_list: ['iso', 'aniso', 'generalized_iso', 'generalized_aniso', 'plateau_iso', 'plateau_aniso']
    kernel_prob: [0.45, 0.25, 0.12, 0.03, 0.12, 0.03]
    sinc_prob: 0.1
    blur_sigma: [0.2, 3]
    betag_range: [0.5, 4]
    betap_range: [1, 2]

    blur_kernel_size2: 21
    kernel_list2: ['iso', 'aniso', 'generalized_iso', 'generalized_aniso', 'plateau_iso', 'plateau_aniso']
    kernel_prob2: [0.45, 0.25, 0.12, 0.03, 0.12, 0.03]
    sinc_prob2: 0.1
    blur_sigma2: [0.2, 1.5]
    betag_range2: [0.5, 4]
    betap_range2: [1, 2]

    final_sinc_prob: 0.8

    gt_size: {gt_size}
    use_hflip: true
    use_rot: false

    num_worker_per_gpu: {workers}
    batch_size_per_gpu: {batch}
    dataset_enlarge_ratio: 1
    prefetch_mode: ~

network_g:
  type: RRDBNet
  num_in_ch: 3
  num_out_ch: 3
  num_feat: 64
  num_block: 23
  num_grow_ch: 32

network_d:
  type: UNetDiscriminatorSN
  num_in_ch: 3
  num_feat: 64
  skip_connection: true

path:
  pretrain_network_g: ~
  param_key_g: params_ema
  strict_load_g: true
  pretrain_network_d: ~
  resume_state: ~

train:
  ema_decay: {ema}
  optim_g:
    type: Adam
    lr: !!float {lr:e}
    weight_decay: 0
    betas: [0.9, 0.99]
  optim_d:
    type: Adam
    lr: !!float {lr:e}
    weight_decay: 0
    betas: [0.9, 0.99]
  scheduler:
    type: MultiStepLR
    milestones: [{total_iter}]
    gamma: 0.5
  total_iter: {total_iter}
  warmup_iter: -1
  pixel_opt:
    type: L1Loss
    loss_weight: 1.0
    reduction: mean
  perceptual_opt:
    type: PerceptualLoss
    layer_weights:
      conv1_2: 0.1
      conv2_2: 0.1
      conv3_4: 1
      conv4_4: 1
      conv5_4: 1
    vgg_type: vgg19
    use_input_norm: true
    perceptual_weight: 1.0
    style_weight: 0
    range_norm: false
    criterion: l1
  gan_opt:
    type: GANLoss
    gan_type: vanilla
    real_label_val: 1.0
    fake_label_val: 0.0
    loss_weight: 0.1
  net_d_iters: 1
  net_d_init_iters: 0

logger:
  print_freq: 100
  save_checkpoint_freq: !!float 5e3
  use_tb_logger: true
  wandb:
    project: ~
    resume_id: ~

dist_params:
  backend: nccl
  port: {port}
"#,
        scale = scale,
        gt_size = template::DEFAULT_GT_SIZE,
        workers = template::DEFAULT_NUM_WORKER_PER_GPU,
        batch = template::DEFAULT_BATCH_SIZE_PER_GPU,
        ema = template::DEFAULT_EMA_DECAY,
        lr = template::DEFAULT_LEARNING_RATE,
        total_iter = template::DEFAULT_TOTAL_ITER,
        port = template::DEFAULT_DIST_PORT,
    )
}

fn span_template(scale: u32) -> String {
    format!(
        r#"# Lightweight SPAN training: pixel loss only, no discriminator.
name: {scale}x_SPAN
model_type: SRModel
scale: {scale}
num_gpu: 1
manual_seed: 0

datasets:
  train:
    name: DIV2K
    type: PairedImageDataset
    dataroot_gt: datasets/DIV2K/GT
    dataroot_lq: datasets/DIV2K/LQ
    io_backend:
      type: disk
    gt_size: {gt_size}
    use_hflip: true
    use_rot: true
    num_worker_per_gpu: {workers}
    batch_size_per_gpu: 32
    dataset_enlarge_ratio: 10
    prefetch_mode: ~
  val:
    name: Set14
    type: PairedImageDataset
    dataroot_gt: datasets/Set14/GT
    dataroot_lq: datasets/Set14/LQ
    io_backend:
      type: disk

network_g:
  type: SPAN
  num_in_ch: 3
  num_out_ch: 3
  feature_channels: 48

path:
  pretrain_network_g: ~
  strict_load_g: true
  resume_state: ~

train:
  ema_decay: {ema}
  optim_g:
    type: Adam
    lr: !!float 5e-4
    weight_decay: 0
    betas: [0.9, 0.99]
  scheduler:
    type: MultiStepLR
    milestones: [200000, 300000, 350000, 375000]
    gamma: 0.5
  total_iter: {total_iter}
  warmup_iter: -1
  pixel_opt:
    type: L1Loss
    loss_weight: 1.0
    reduction: mean

val:
  val_freq: !!float 5e3
  save_img: false
  metrics:
    psnr:
      type: calculate_psnr
      crop_border: {scale}
      test_y_channel: true
    ssim:
      type: calculate_ssim
      crop_border: {scale}
      test_y_channel: true

logger:
  print_freq: 100
  save_checkpoint_freq: !!float 5e3
  use_tb_logger: true
  wandb:
    project: ~
    resume_id: ~

dist_params:
  backend: nccl
  port: {port}
"#,
        scale = scale,
        gt_size = scale * 48,
        workers = template::DEFAULT_NUM_WORKER_PER_GPU,
        ema = template::DEFAULT_EMA_DECAY,
        total_iter = template::DEFAULT_TOTAL_ITER,
        port = template::DEFAULT_DIST_PORT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NumGpu;
    use crate::validate::check_options;
    use tempfile::TempDir;

    #[test]
    fn test_templates_parse_and_validate() {
        for preset in [Preset::Esrgan, Preset::RealEsrgan, Preset::Span] {
            let opts = TrainOptions::template(preset, 4)
                .unwrap_or_else(|e| panic!("{} template failed to parse: {}", preset.label(), e));
            let report = check_options(&opts, true);
            assert!(
                report.is_clean(),
                "{} template has issues: {:?}",
                preset.label(),
                report.issues
            );
        }
    }

    #[test]
    fn test_template_honors_scale() {
        let opts = TrainOptions::template(Preset::Span, 2).unwrap();
        assert_eq!(opts.scale, 2);
        assert_eq!(opts.name, "2x_SPAN");
        assert_eq!(opts.network_g.as_ref().unwrap().kind, "SPAN");
    }

    #[test]
    fn test_realesrgan_template_degradation_fields() {
        let opts = TrainOptions::template(Preset::RealEsrgan, 4).unwrap();
        assert_eq!(opts.num_gpu, NumGpu::Auto);
        assert_eq!(opts.high_order_degradation, Some(true));
        assert_eq!(
            opts.degradation.resize_prob.as_deref(),
            Some(&[0.2, 0.7, 0.1][..])
        );
        assert_eq!(opts.degradation.jpeg_range2, Some([30.0, 95.0]));
        let train_set = &opts.datasets["train"];
        assert_eq!(train_set.kernel_list.as_ref().unwrap().len(), 6);
        assert_eq!(train_set.final_sinc_prob, Some(0.8));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("train.yml");

        let opts = TrainOptions::template(Preset::Esrgan, 4).unwrap();
        opts.save(&path).unwrap();

        let loaded = TrainOptions::load(&path).unwrap();
        assert_eq!(loaded, opts);
    }

    #[test]
    fn test_load_missing_file() {
        let result = TrainOptions::load("/nonexistent/train.yml");
        assert!(matches!(result, Err(OptError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_failure_is_a_yaml_error() {
        let err = TrainOptions::from_yaml_str("name: [unclosed").unwrap_err();
        assert!(matches!(err, OptError::Yaml(_)));

        let err = parse_value_tree("a: [1, 2").unwrap_err();
        assert!(matches!(err, OptError::Yaml(_)));
    }

    #[test]
    fn test_normalize_round_trip() {
        let yaml = template_yaml(Preset::Esrgan, 4);
        let normalized = normalize_str(&yaml).unwrap();
        // Canonical form is stable under a second pass.
        assert_eq!(normalize_str(&normalized).unwrap(), normalized);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("realesrgan".parse::<Preset>().unwrap(), Preset::RealEsrgan);
        assert!("swinir".parse::<Preset>().is_err());
    }
}
