//! `gantry inspect` command

use anyhow::Result;

use super::{GlobalArgs, Session};
use crate::cli::InspectArgs;
use gantry::ops::evaluate;

pub fn execute(args: InspectArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global)?;

    let evaluation = evaluate(
        &session.recipe,
        args.eval.to_settings(),
        &session.signals,
        &session.config.version_resolver(),
        &args.eval.options,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
        return Ok(());
    }

    let desc = &evaluation.descriptor;
    let settings = desc.settings();

    println!("{} {}", desc.name(), desc.version());
    println!("  version source: {}", desc.resolved_version().source);
    if let Some(license) = desc.license() {
        println!("  license: {}", license);
    }
    if let Some(url) = desc.url() {
        println!("  url: {}", url);
    }
    println!(
        "  settings: os={} compiler={} build_type={} arch={}",
        settings.os, settings.compiler, settings.build_type, settings.arch
    );

    if !evaluation.values.is_empty() {
        println!("  options:");
        for (name, value) in evaluation.values.iter() {
            println!("    {} = {}", name, value);
        }
    }

    if !evaluation.requires.is_empty() {
        println!("  requires:");
        for req in &evaluation.requires {
            println!("    {}", req);
        }
    }

    Ok(())
}
