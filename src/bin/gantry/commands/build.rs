//! `gantry build` command

use anyhow::Result;

use super::{GlobalArgs, OutputArgs, Session};
use crate::cli::BuildArgs;
use gantry::builder::SystemRunner;
use gantry::ops::gantry_build::{package_outputs, prepare, run_native_build};
use gantry::util::shell::{format_duration, Shell, Status};

pub fn execute(args: BuildArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global)?;
    let shell = Shell::from_flags(global.verbose, args.json);

    let mut opts = session.build_options(
        &args.eval,
        OutputArgs {
            build_dir: args.build_dir.as_deref(),
            package_dir: args.package_dir.as_deref(),
            strict: args.strict,
        },
    );
    opts.package = !args.no_package;

    let recipe = &session.recipe;
    let prepared = prepare(
        recipe,
        &opts,
        &session.signals,
        &session.config.version_resolver(),
    )?;
    let desc = &prepared.evaluation.descriptor;

    let spinner = shell.spinner(
        Status::Building,
        format!("{} v{} ({})", desc.name(), desc.version(), desc.settings().build_type),
    );
    let mut runner = SystemRunner::new().stdout_to_stderr(shell.is_json());
    run_native_build(&prepared, opts.cmake.as_deref(), &mut runner)?;
    let elapsed = spinner.finish();

    shell.status(
        Status::Finished,
        format!("{} in {}", desc.name(), format_duration(elapsed)),
    );

    let layout = if opts.package {
        shell.status(
            Status::Packaging,
            format!("into {}", prepared.package_dir.display()),
        );
        let layout = package_outputs(recipe, &prepared, opts.copy_policy)?;
        if layout.is_empty() {
            shell.warn("package directory is empty");
        }
        shell.status(
            Status::Packaged,
            format!(
                "{} headers, {} libraries",
                layout.headers.len(),
                layout.libraries.len()
            ),
        );
        Some(layout)
    } else {
        shell.status(Status::Skipped, "packaging (--no-package)");
        None
    };

    if args.json {
        let fingerprint = layout.as_ref().map(|l| l.fingerprint()).transpose()?;
        let summary = serde_json::json!({
            "package": desc,
            "options": prepared.evaluation.values,
            "configure": prepared.invocation.configure_args(),
            "build": prepared.invocation.build_args(),
            "layout": layout,
            "fingerprint": fingerprint,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
