// ABOUTME: Main application orchestration for the sprig CLI
// ABOUTME: Resolves values, selects the template and streams the render to stdout

use anyhow::{anyhow, Result};
use std::io::{self, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::{Args, Config};
use crate::template::{select_source, Stdin, TemplateEngine, TemplateInput};
use crate::values::{EnvSource, Resolver};
use crate::VERSION;

pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Initialize logging based on configuration.
    ///
    /// Everything goes to stderr; stdout is reserved for the rendered template.
    pub fn init_logging(&self, verbose: bool) -> Result<()> {
        let log_level = if verbose {
            "debug"
        } else {
            &self.config.logging.level
        };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let installed = match self.config.logging.format.as_str() {
            "compact" => tracing_subscriber::fmt()
                .compact()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .with_target(false)
                .try_init(),
            _ => tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .with_target(false)
                .try_init(),
        };
        installed.map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub fn run(&self, args: Args) -> Result<()> {
        self.init_logging(args.verbose)?;
        info!("Starting sprig v{}", VERSION);

        let stdout = io::stdout();
        render(&args, &Resolver::new(), &mut Stdin, stdout.lock())
    }

    /// Create application from the environment
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }
}

/// Resolve values and render the selected template into `out`.
///
/// Value errors surface before any template input is read.
pub fn render<E, W>(
    args: &Args,
    resolver: &Resolver<E>,
    input: &mut dyn TemplateInput,
    mut out: W,
) -> Result<()>
where
    E: EnvSource,
    W: Write,
{
    let target = args.target()?;
    let values = resolver.resolve(&args.value_sources())?;
    debug!("Resolved {} top-level values", values.len());

    let source = select_source(input, target)?;
    let compiled = TemplateEngine::new().compile(&source)?;

    let result = compiled.execute(&values, &mut out);
    // whatever rendered before a failure still reaches the reader
    out.flush()?;
    result?;
    Ok(())
}
