use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use stencil_cli::Commands;
use stencil_cli::StencilCli;
use stencil_cli::build_slots;
use stencil_core::Engine;
use stencil_core::StencilConfig;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "STENCIL_LOG";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = StencilCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::List) => run_list(&args),
		Some(Commands::Show { name }) => run_show(&args, name),
		Some(Commands::Render { name, slot, slots }) => {
			run_render(&args, name, slots.as_deref(), slot)
		}
		None => {
			eprintln!("No subcommand specified. Run `stencil --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<stencil_core::StencilError>() {
			Ok(stencil_err) => {
				let report: miette::Report = (*stencil_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr so rendered output on stdout stays clean.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("debug")
		} else {
			EnvFilter::new("warn")
		}
	});

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init();
}

fn resolve_root(args: &StencilCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Load the project config (or the defaults) with the `--duplicates`
/// override applied.
fn load_config(args: &StencilCli) -> Result<(PathBuf, StencilConfig), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let mut config = match StencilConfig::load(&root)? {
		Some(config) => config,
		None => {
			tracing::debug!(root = %root.display(), "no config found, using defaults");
			StencilConfig::default()
		}
	};

	if let Some(duplicates) = args.duplicates {
		config.duplicates = duplicates.into();
	}

	Ok((root, config))
}

fn load_engine(args: &StencilCli) -> Result<(Engine, StencilConfig), Box<dyn std::error::Error>> {
	let (root, config) = load_config(args)?;
	let engine = config.build_engine(&root)?;
	tracing::debug!(
		templates = engine.library().len(),
		duplicates = %config.duplicates,
		"engine ready"
	);

	Ok((engine, config))
}

fn run_list(args: &StencilCli) -> Result<(), Box<dyn std::error::Error>> {
	let (engine, _) = load_engine(args)?;
	let names = engine.list_templates();

	if names.is_empty() {
		eprintln!("{}", colored!("No templates found.", dimmed));
		return Ok(());
	}

	for name in names {
		println!("{name}");
	}

	Ok(())
}

fn run_show(args: &StencilCli, name: &str) -> Result<(), Box<dyn std::error::Error>> {
	let (engine, _) = load_engine(args)?;
	let template = engine.get_template(name)?;
	println!("{}", template.body());

	Ok(())
}

fn run_render(
	args: &StencilCli,
	name: &str,
	json: Option<&str>,
	pairs: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
	let (engine, config) = load_engine(args)?;
	let slots = build_slots(&config.slots, json, pairs)?;
	let output = engine.render(name, &slots)?;
	println!("{output}");

	Ok(())
}
