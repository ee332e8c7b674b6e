//! `gantry package` command

use anyhow::Result;

use super::{GlobalArgs, OutputArgs, Session};
use crate::cli::PackageArgs;
use gantry::ops::gantry_build::{package_outputs, prepare};
use gantry::util::shell::{Shell, Status};

pub fn execute(args: PackageArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global)?;
    let shell = Shell::from_flags(global.verbose, args.json);

    let opts = session.build_options(
        &args.eval,
        OutputArgs {
            build_dir: args.build_dir.as_deref(),
            package_dir: args.package_dir.as_deref(),
            strict: args.strict,
        },
    );

    let prepared = prepare(
        &session.recipe,
        &opts,
        &session.signals,
        &session.config.version_resolver(),
    )?;

    shell.status(
        Status::Packaging,
        format!(
            "{} from {}",
            session.recipe.name(),
            prepared.invocation.dirs().build_dir.display()
        ),
    );

    let layout = package_outputs(&session.recipe, &prepared, opts.copy_policy)?;
    let fingerprint = layout.fingerprint()?;

    if args.json {
        let summary = serde_json::json!({
            "layout": layout,
            "fingerprint": fingerprint,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if layout.is_empty() {
        shell.warn("package directory is empty");
    }
    shell.status(
        Status::Packaged,
        format!(
            "{} headers, {} libraries into {} ({})",
            layout.headers.len(),
            layout.libraries.len(),
            layout.root.display(),
            &fingerprint[..16]
        ),
    );

    Ok(())
}
