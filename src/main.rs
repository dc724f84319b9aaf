use detective::cli::{Cli, Commands, commands, init};
use detective::investigation::Outcome;
use detective::utils::telemetry::{LogFormat, init_tracing};
use detective::utils::toml_config::ConfigManager;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = cli.output();

    // init runs before any configuration exists
    if let Some(Commands::Init {
        path,
        force,
        server_url,
        port,
    }) = &cli.command
    {
        let result = init::run(
            init::InitConfig {
                path: path.clone(),
                force: *force,
                server_url: server_url.clone(),
                port: *port,
            },
            &output,
        );
        return Ok(match result {
            init::InitResult::Success => ExitCode::SUCCESS,
            init::InitResult::AlreadyExists | init::InitResult::Error(_) => ExitCode::FAILURE,
        });
    }

    let manager = match ConfigManager::new(&cli.config) {
        Ok(manager) => manager,
        Err(e) => {
            output.error(&format!("Invalid configuration in {}: {}", cli.config.display(), e));
            return Ok(ExitCode::FAILURE);
        }
    };
    let config = manager.config();

    init_tracing(
        LogFormat::from_config(&config.server.log_format),
        &config.server.log_level,
        cli.verbose,
    );

    match cli.command {
        None => commands::serve(manager, false, &output).await?,
        Some(Commands::Serve { watch }) => commands::serve(manager, watch, &output).await?,
        Some(Commands::Investigate { query, pdf }) => {
            let outcome = commands::investigate(&config, &query, pdf.as_deref(), &output).await?;
            if outcome != Outcome::Accepted {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Render { file, out, image }) => {
            commands::render(&config, &file, out.as_deref(), image.as_deref(), &output)?;
        }
        Some(Commands::Config { validate }) => {
            commands::show_config(manager.path(), &config, validate, &output)?;
        }
        Some(Commands::Init { .. }) => unreachable!("handled above"),
    }

    Ok(ExitCode::SUCCESS)
}
