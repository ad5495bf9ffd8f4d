// o2s CLI entry point
use anyhow::{Context, Result};
use clap::Parser;
use o2s_cli::{build_cli_layer, get_version, load_base_config, logging, Cli, Commands, SwiftRewriter};
use o2s_objc::FileInputProvider;
use o2s_passes::DEFAULT_PASS_NAMES;
use o2s_writer::DiskWriterOutput;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Rewrite {
            inputs,
            output,
            config,
            log_level,
            passes,
            jobs,
        }) => {
            let layer = build_cli_layer(output.as_deref(), log_level, passes.as_deref(), jobs);
            let base = load_base_config(config.as_deref())?;
            logging::init(layer.log_level, base.logging.level)
                .map_err(|error| anyhow::anyhow!("failed to install logging: {}", error))?;
            let config = layer.apply(base);

            let mut writer_output =
                DiskWriterOutput::new(&config.output.directory, config.output.indent.clone());
            let input = FileInputProvider::new(inputs);
            let rewriter = SwiftRewriter::new(config);
            let summary = rewriter
                .rewrite(&input, &mut writer_output)
                .context("rewrite failed")?;

            for diagnostic in summary.diagnostics.iter() {
                eprintln!("{}", diagnostic);
            }
            for path in &summary.written_files {
                println!("{}", writer_output.root().join(path).display());
            }
            if summary.diagnostics.has_errors() {
                anyhow::bail!(
                    "rewrite finished with {} error(s)",
                    summary.diagnostics.errors().count()
                );
            }
        }
        Some(Commands::Passes) => {
            for name in DEFAULT_PASS_NAMES {
                println!("{}", name);
            }
        }
        Some(Commands::Version) => {
            println!("{}", get_version());
        }
        None => {
            println!("{}", get_version());
            println!("Run 'o2s --help' for usage information.");
        }
    }

    Ok(())
}
