use sropt::loader::{normalize_str, parse_value_tree};
use sropt::options::TrainOptions;
use std::fs;
use std::path::PathBuf;

fn options_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("options")
}

#[test]
fn test_shipped_documents_round_trip() {
    for entry in fs::read_dir(options_dir()).unwrap() {
        let path = entry.unwrap().path();
        let text = fs::read_to_string(&path).unwrap();

        let opts = TrainOptions::from_yaml_str(&text).unwrap();
        let written = opts.to_yaml_string().unwrap();
        let reparsed = TrainOptions::from_yaml_str(&written)
            .unwrap_or_else(|e| panic!("{} did not re-parse: {}", path.display(), e));
        assert_eq!(reparsed, opts, "{} changed across a round trip", path.display());

        // The written text re-parses to the identical raw key/value tree.
        let tree = parse_value_tree(&written).unwrap();
        let rewritten = reparsed.to_yaml_string().unwrap();
        assert_eq!(parse_value_tree(&rewritten).unwrap(), tree);
    }
}

#[test]
fn test_normalize_is_idempotent() {
    for entry in fs::read_dir(options_dir()).unwrap() {
        let path = entry.unwrap().path();
        let text = fs::read_to_string(&path).unwrap();

        let once = normalize_str(&text).unwrap();
        let twice = normalize_str(&once).unwrap();
        assert_eq!(once, twice, "{} is not stable under normalization", path.display());
    }
}

#[test]
fn test_unmodeled_keys_survive_round_trips() {
    let text = fs::read_to_string(options_dir().join("4x_SPAN.yml")).unwrap();
    // Keys this crate does not model are carried through untouched.
    let text = text.replace(
        "manual_seed: 0\n",
        "manual_seed: 0\nauto_resume: true\nfind_unused_parameters: false\n",
    );

    let opts = TrainOptions::from_yaml_str(&text).unwrap();
    assert_eq!(opts.extra["auto_resume"], serde_yaml::Value::from(true));
    assert_eq!(opts.extra["find_unused_parameters"], serde_yaml::Value::from(false));

    let written = opts.to_yaml_string().unwrap();
    let reparsed = TrainOptions::from_yaml_str(&written).unwrap();
    assert_eq!(reparsed.extra, opts.extra);
}

#[test]
fn test_network_params_preserve_declaration_order() {
    let opts = TrainOptions::load(options_dir().join("4x_RealESRGAN.yml")).unwrap();
    let params: Vec<&str> = opts
        .network_g
        .as_ref()
        .unwrap()
        .params
        .keys()
        .map(|k| k.as_str())
        .collect();
    assert_eq!(
        params,
        ["num_in_ch", "num_out_ch", "num_feat", "num_block", "num_grow_ch"]
    );
}
