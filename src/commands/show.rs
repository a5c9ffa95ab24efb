use crate::error::{OptError, Result};
use crate::options::{NumGpu, TrainOptions};
use clap::ArgMatches;

pub fn show(app_m: &ArgMatches) -> Result<()> {
    let path = app_m
        .value_of("CONFIG_FILE")
        .ok_or_else(|| OptError::InvalidParameter("no option file given".to_string()))?;

    let opts = TrainOptions::load(path)?;

    if app_m.is_present("JSON") {
        let json = serde_json::to_string_pretty(&opts)
            .map_err(|e| OptError::Serialization(format!("failed to render JSON: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    print_summary(&opts);
    Ok(())
}

fn print_summary(opts: &TrainOptions) {
    println!("name:        {}", opts.name);
    println!("model:       {}", opts.model_type);
    println!("scale:       {}x", opts.scale);
    match opts.num_gpu {
        NumGpu::Auto => println!("gpus:        auto"),
        NumGpu::Count(n) => println!("gpus:        {}", n),
    }
    if let Some(seed) = opts.manual_seed {
        println!("seed:        {}", seed);
    }
    println!(
        "degradation: {}",
        if opts.high_order_degradation() {
            "high-order (two stage)"
        } else {
            "none / paired data"
        }
    );

    if let Some(net) = &opts.network_g {
        println!("network_g:   {}", net.kind);
    }
    if let Some(net) = &opts.network_d {
        println!("network_d:   {}", net.kind);
    }

    for (key, dataset) in &opts.datasets {
        let mut details = vec![format!("type {}", dataset.kind)];
        if let Some(batch) = dataset.batch_size_per_gpu {
            details.push(format!("batch {}", batch));
        }
        if let Some(workers) = dataset.num_worker_per_gpu {
            details.push(format!("workers {}", workers));
        }
        println!("dataset {}: {}", key, details.join(", "));
    }

    if let Some(train) = &opts.train {
        println!("iterations:  {}", train.total_iter);
        if let Some(optim) = &train.optim_g {
            println!("optim_g:     {} lr {}", optim.kind, optim.lr);
        }
        if let Some(scheduler) = &train.scheduler {
            match &scheduler.milestones {
                Some(milestones) => println!(
                    "scheduler:   {} milestones {:?} gamma {}",
                    scheduler.kind,
                    milestones,
                    scheduler.gamma.unwrap_or(1.0)
                ),
                None => println!("scheduler:   {}", scheduler.kind),
            }
        }
        for (key, loss) in opts.loss_terms() {
            println!(
                "loss {}: {} weight {}",
                key,
                loss.kind,
                loss.loss_weight.unwrap_or(1.0)
            );
        }
    }

    if let Some(val) = &opts.val {
        let metrics: Vec<&str> = val.metrics.values().map(|m| m.kind.as_str()).collect();
        if !metrics.is_empty() {
            println!("metrics:     {}", metrics.join(", "));
        }
    }
    if let Some(dist) = &opts.dist_params {
        println!("dist:        {}", dist.backend);
    }
}
