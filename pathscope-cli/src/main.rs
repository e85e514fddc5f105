use clap::Parser;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "pathscope",
    version,
    about = "Prioritize pathway genes, build an interactome, and test mechanism enrichment"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Classify an error into a process exit code.
///
///   0: success
///   1: general/unknown error
///   2: configuration error (bad config, unknown condition)
///   3: the pathway has no genes
///   5: the pathway record could not be fetched
///   7: export failed
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    let msg = format!("{err:#}");
    let lower = msg.to_lowercase();

    if lower.contains("no genes found") {
        3
    } else if lower.contains("config") || lower.contains("unknown condition") {
        2
    } else if lower.contains("fetch error")
        || lower.contains("pathway api")
        || lower.contains("network error")
        || lower.contains("timed out")
        || lower.contains("cannot read record file")
    {
        5
    } else if lower.contains("export") || lower.contains("cannot write") {
        7
    } else {
        1
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // One fetch per run; no need for worker threads.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create runtime: {e}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(commands::run(cli.command)) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_no_genes() {
        let err = anyhow::anyhow!("No genes found for pathway hsa00000");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_config() {
        let err = anyhow::anyhow!("Cannot load config: pathscope.toml");
        assert_eq!(classify_exit_code(&err), 2);
        let err = anyhow::anyhow!("Unknown condition: Mystery");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_fetch() {
        let err = anyhow::anyhow!("Fetch error: Pathway API returned HTTP 404 for hsa99999");
        assert_eq!(classify_exit_code(&err), 5);
        let err = anyhow::anyhow!("Fetch error: Timed out after 10s fetching hsa05016");
        assert_eq!(classify_exit_code(&err), 5);
    }

    #[test]
    fn exit_code_export() {
        let err = anyhow::anyhow!("Cannot write exports to /ro: Export error: IO error: denied");
        assert_eq!(classify_exit_code(&err), 7);
    }

    #[test]
    fn exit_code_general() {
        let err = anyhow::anyhow!("Something unexpected happened");
        assert_eq!(classify_exit_code(&err), 1);
    }

    #[test]
    fn exit_code_from_typed_error_chain() {
        let err = anyhow::Error::from(pathscope_core::error::PathscopeError::from(
            pathscope_core::error::FetchError::Status {
                pathway_id: "hsa05016".into(),
                status: 503,
            },
        ));
        assert_eq!(classify_exit_code(&err), 5);
    }
}
