//! Headless broad-phase demo
//!
//! Builds an octary space partition over a terrain sheet and a swarm of
//! spheres, then steps the simulation: kinematics first, partition update
//! second, broad-phase pairs last.
//!
//! Usage:
//! - `osp_demo [config.toml|config.ron]` runs the simulation
//! - `osp_demo --write-config <path>` writes the default settings and exits

mod config;
mod scene;

use osp_engine::prelude::*;
use std::time::Instant;

use crate::config::DemoConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    osp_engine::foundation::logging::init_with_level(log::LevelFilter::Info);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.as_slice() {
        [flag, path] if flag == "--write-config" => {
            DemoConfig::default().save_to_file(path)?;
            log::info!("Wrote default demo configuration to {path}");
            return Ok(());
        }
        [path] => {
            log::info!("Loading demo configuration from {path}");
            DemoConfig::load_from_file(path)?
        }
        [] => DemoConfig::default(),
        _ => return Err("usage: osp_demo [config.toml|config.ron] | --write-config <path>".into()),
    };
    config.validate()?;

    let mut tree = SpatialPartitionTree::new(config.osp.clone())?;
    let mut bodies = scene::build_scene(&config);

    let build_start = Instant::now();
    tree.generate_osp(&bodies);
    let stats = tree.stats();
    log::info!(
        "Initial build took {:.2?}: {} leaves, deepest {}",
        build_start.elapsed(),
        stats.leaf_count,
        stats.deepest_leaf
    );

    for tick in 0..config.ticks {
        let tick_start = Instant::now();

        scene::advance(&mut bodies, &config);
        let report = tree.update_osp(&bodies);
        let pairs = candidate_pairs(&tree);
        let contacts = scene::sphere_contacts(&bodies, &pairs);

        if tick % 30 == 0 || tick + 1 == config.ticks {
            log::info!(
                "Tick {tick}: {} spheres walked, +{} / -{} memberships, {} candidate pairs, {} contacts ({:.2?})",
                report.spheres_walked,
                report.added,
                report.removed,
                pairs.len(),
                contacts,
                tick_start.elapsed()
            );
        }
    }

    Ok(())
}
