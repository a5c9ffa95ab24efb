use crate::error::{OptError, Result};

/// The section of an option file a `type` tag appears in.
///
/// Each tag names a component registered inside the external training
/// framework; this crate only knows the names, never the implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Model,
    Dataset,
    NetworkG,
    NetworkD,
    Optimizer,
    Scheduler,
    Loss,
    Metric,
    IoBackend,
    PrefetchMode,
    DistBackend,
}

const MODELS: &[&str] = &[
    "SRModel",
    "SRGANModel",
    "ESRGANModel",
    "RealESRNetModel",
    "RealESRGANModel",
];

const DATASETS: &[&str] = &[
    "PairedImageDataset",
    "SingleImageDataset",
    "RealESRGANDataset",
    "RealESRGANPairedDataset",
];

const GENERATORS: &[&str] = &[
    "MSRResNet",
    "RRDBNet",
    "RRDB2C2Net",
    "SRVGGNetCompact",
    "ECBSR",
    "SPAN",
];

const DISCRIMINATORS: &[&str] = &["UNetDiscriminatorSN", "VGGStyleDiscriminator"];

const OPTIMIZERS: &[&str] = &["Adam", "AdamW", "SGD"];

const SCHEDULERS: &[&str] = &["MultiStepLR", "CosineAnnealingRestartLR"];

// Loss names match the framework's loss registry, including the
// lower-case `colorloss` it registers.
const LOSSES: &[&str] = &[
    "L1Loss",
    "MSELoss",
    "CharbonnierLoss",
    "WeightedTVLoss",
    "PerceptualLoss",
    "ContextualLoss",
    "colorloss",
    "AverageLoss",
    "GANLoss",
    "MultiScaleGANLoss",
];

const METRICS: &[&str] = &["calculate_psnr", "calculate_ssim", "calculate_niqe"];

const IO_BACKENDS: &[&str] = &["disk", "lmdb", "memcached"];

const PREFETCH_MODES: &[&str] = &["cpu", "cuda"];

const DIST_BACKENDS: &[&str] = &["nccl", "gloo", "mpi"];

impl ComponentKind {
    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Model => "model",
            ComponentKind::Dataset => "dataset",
            ComponentKind::NetworkG => "generator network",
            ComponentKind::NetworkD => "discriminator network",
            ComponentKind::Optimizer => "optimizer",
            ComponentKind::Scheduler => "scheduler",
            ComponentKind::Loss => "loss",
            ComponentKind::Metric => "metric",
            ComponentKind::IoBackend => "io backend",
            ComponentKind::PrefetchMode => "prefetch mode",
            ComponentKind::DistBackend => "distributed backend",
        }
    }
}

/// Returns the known component names for a section kind.
pub fn known_names(kind: ComponentKind) -> &'static [&'static str] {
    match kind {
        ComponentKind::Model => MODELS,
        ComponentKind::Dataset => DATASETS,
        ComponentKind::NetworkG => GENERATORS,
        ComponentKind::NetworkD => DISCRIMINATORS,
        ComponentKind::Optimizer => OPTIMIZERS,
        ComponentKind::Scheduler => SCHEDULERS,
        ComponentKind::Loss => LOSSES,
        ComponentKind::Metric => METRICS,
        ComponentKind::IoBackend => IO_BACKENDS,
        ComponentKind::PrefetchMode => PREFETCH_MODES,
        ComponentKind::DistBackend => DIST_BACKENDS,
    }
}

/// Case-sensitive lookup, matching the external framework's registry.
pub fn is_known(kind: ComponentKind, name: &str) -> bool {
    known_names(kind).contains(&name)
}

pub fn check(kind: ComponentKind, name: &str) -> Result<()> {
    if is_known(kind, name) {
        Ok(())
    } else {
        Err(OptError::UnknownComponent {
            kind: kind.label(),
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_generator() {
        assert!(is_known(ComponentKind::NetworkG, "RRDB2C2Net"));
        assert!(is_known(ComponentKind::NetworkG, "SPAN"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(is_known(ComponentKind::Loss, "colorloss"));
        assert!(!is_known(ComponentKind::Loss, "ColorLoss"));
        assert!(!is_known(ComponentKind::NetworkG, "rrdbnet"));
    }

    #[test]
    fn test_check_unknown_component() {
        let err = check(ComponentKind::Optimizer, "Lion").unwrap_err();
        assert!(format!("{}", err).contains("Unknown optimizer type: Lion"));
    }
}
