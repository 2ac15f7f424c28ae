use std::path::Path;

use warpgrid_hostres::HostResourceConfig;

pub fn validate(path: &Path) -> anyhow::Result<()> {
    let config = HostResourceConfig::from_file(path)?;

    println!("✓ {} is valid", path.display());
    for set in &config.resource_sets {
        println!(
            "  {:<16} slots={:<4} sub_resources={}",
            set.name, set.slots, set.sub_resources
        );
    }
    Ok(())
}
