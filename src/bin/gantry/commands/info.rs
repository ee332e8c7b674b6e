//! `gantry info` command

use anyhow::Result;

use super::{GlobalArgs, Session};
use crate::cli::InfoArgs;
use gantry::core::layout::ArtifactLayout;
use gantry::ops::consumer_info::publish;
use gantry::ops::gantry_build::package_dir_for;

pub fn execute(args: InfoArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global)?;
    let recipe = &session.recipe;

    let explicit = args
        .package_dir
        .as_deref()
        .or(session.config.build.package_dir.as_deref());
    let package_dir = package_dir_for(recipe, explicit);

    if !package_dir.is_dir() {
        tracing::warn!(
            "{} does not exist; run `gantry build` or `gantry package` first",
            package_dir.display()
        );
    }

    let layout = ArtifactLayout::scan(
        &package_dir,
        &recipe.consumer.includedirs,
        &recipe.consumer.libdirs,
    )?;
    let info = publish(&recipe.consumer, &layout);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    for dir in &info.include_dirs {
        println!("includedir: {}", dir.display());
    }
    for dir in &info.lib_dirs {
        println!("libdir: {}", dir.display());
    }
    for lib in &info.libs {
        println!("lib: {}", lib);
    }

    Ok(())
}
