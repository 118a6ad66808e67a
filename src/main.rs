use clap::{Parser, Subcommand};
use site_config::utils::logger;
use site_config::{
    assemble_from_manifest, JobRequest, ProcessEnv, ResolvedEnv, SiteConfigError, SiteManifest,
    Validate, ValidationMode,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "site-config")]
#[command(about = "Resolve and check the CMS site configuration")]
struct Args {
    /// Path to a TOML site manifest (defaults to the built-in site layout)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Fail on the first configuration problem instead of warning
    #[arg(long)]
    strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the assembled configuration as JSON, secrets redacted
    Show,
    /// Check the configuration and exit non-zero on problems
    Validate,
    /// Evaluate the job-run access policy for a request
    CheckJob {
        /// Treat the request as coming from this authenticated user
        #[arg(long)]
        user: Option<String>,

        /// Value of the Authorization header
        #[arg(long)]
        authorization: Option<String>,
    },
    /// Send a HeadBucket request to the configured storage bucket
    #[cfg(feature = "s3")]
    ProbeStorage,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting site-config");

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }
}

async fn run(args: Args) -> Result<i32, SiteConfigError> {
    let env = ResolvedEnv::from_process_env();

    let manifest = match &args.manifest {
        Some(path) => {
            tracing::info!("📁 Loading manifest from: {}", path.display());
            SiteManifest::from_file(path, &ProcessEnv)?
        }
        None => SiteManifest::default(),
    };

    let mode = if args.strict {
        ValidationMode::Strict
    } else {
        env.validation_mode
    };

    let config = assemble_from_manifest(&manifest, &env);

    match args.command {
        Command::Show => {
            config.validate(mode)?;
            println!("{}", config.to_json_pretty()?);
            Ok(0)
        }
        Command::Validate => {
            // explicit validate command always fails on problems
            config.validate(ValidationMode::Strict)?;
            println!("✅ Configuration is valid");
            Ok(0)
        }
        Command::CheckJob {
            user,
            authorization,
        } => {
            let mut request = JobRequest::new();
            if let Some(user) = user {
                request = request.with_user(user);
            }
            if let Some(header) = authorization {
                request = request.with_header("Authorization", header);
            }

            let decision = config.jobs().access.decide(&request);
            println!("{}", decision.as_str());
            Ok(decision.exit_code())
        }
        #[cfg(feature = "s3")]
        Command::ProbeStorage => {
            config.validate(mode)?;
            for (slug, binding) in config.cloud_storage_bindings() {
                tracing::info!("Probing storage for collection '{}'", slug);
                site_config::probe_storage(&binding.adapter).await?;
            }
            println!("✅ Storage is reachable");
            Ok(0)
        }
    }
}
