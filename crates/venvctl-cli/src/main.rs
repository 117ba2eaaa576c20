use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use atty::Stream;
use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use serde_json::Value;
use venvctl_core::{
    format_status_message, list_environments, remove_environment, setup_environment,
    to_json_response, CommandContext, CommandInfo, CommandStatus, ExecutionOutcome, GlobalOptions,
    ListRequest, RemoveRequest, SetupRequest,
};

mod style;

use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let invocation = parse_invocation(env::args_os().collect());
    init_tracing(invocation.global.verbose);

    let ctx = CommandContext::new(&invocation.global).map_err(|err| eyre!("{err:?}"))?;
    let (info, outcome) = dispatch(&ctx, &invocation.command).map_err(|err| eyre!("{err:?}"))?;
    let code = emit_output(&invocation, info, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = format!("venvctl_cli={level},venvctl_core={level},venvctl_domain={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

struct Invocation {
    global: GlobalOptions,
    no_color: bool,
    command: CommandRequest,
}

enum CommandRequest {
    Create {
        name: Option<String>,
        base_dir: Option<PathBuf>,
        requirements: Option<PathBuf>,
    },
    List {
        base_dir: Option<PathBuf>,
        detailed: bool,
    },
    Remove {
        name: String,
        base_dir: Option<PathBuf>,
        force: bool,
    },
}

const SUBCOMMAND_TOKENS: [&str; 3] = ["create", "list", "remove"];

/// Two-schema argument parse.
///
/// The modern schema requires one of the `create`/`list`/`remove`
/// subcommands. Invocations that carry none of those tokens date from the
/// old single-mode interface and are reparsed under a flat, create-only
/// schema that ignores flags it does not recognize.
fn parse_invocation(raw: Vec<OsString>) -> Invocation {
    let has_subcommand = raw.iter().skip(1).any(|arg| {
        arg.to_str()
            .is_some_and(|token| SUBCOMMAND_TOKENS.contains(&token))
    });
    let wants_help_or_version = raw.iter().skip(1).any(|arg| {
        arg.to_str()
            .is_some_and(|token| matches!(token, "-h" | "--help" | "-V" | "--version"))
    });

    if has_subcommand || wants_help_or_version {
        return from_modern(VenvctlCli::parse_from(raw));
    }

    let legacy = LegacyCli::parse_from(raw);
    Invocation {
        global: GlobalOptions {
            quiet: false,
            verbose: legacy.verbose,
            json: false,
        },
        no_color: false,
        command: CommandRequest::Create {
            name: legacy.name,
            base_dir: legacy.base_dir,
            requirements: legacy.requirements,
        },
    }
}

fn from_modern(cli: VenvctlCli) -> Invocation {
    let (verbose, command) = match cli.command {
        SubcommandCli::Create(args) => (
            args.verbose,
            CommandRequest::Create {
                name: args.name,
                base_dir: args.base_dir,
                requirements: args.requirements,
            },
        ),
        SubcommandCli::List(args) => (
            0,
            CommandRequest::List {
                base_dir: args.base_dir,
                detailed: args.detailed,
            },
        ),
        SubcommandCli::Remove(args) => (
            0,
            CommandRequest::Remove {
                name: args.name,
                base_dir: args.base_dir,
                force: args.force,
            },
        ),
    };

    Invocation {
        global: GlobalOptions {
            quiet: cli.quiet,
            verbose,
            json: cli.json,
        },
        no_color: cli.no_color,
        command,
    }
}

fn dispatch(
    ctx: &CommandContext,
    command: &CommandRequest,
) -> anyhow::Result<(CommandInfo, ExecutionOutcome)> {
    match command {
        CommandRequest::Create {
            name,
            base_dir,
            requirements,
        } => {
            let info = CommandInfo::new("create");
            let request = SetupRequest {
                name: match name {
                    Some(name) => name.clone(),
                    None => ctx.default_environment_name()?,
                },
                base_dir: base_dir
                    .clone()
                    .unwrap_or_else(|| ctx.default_base_dir()),
                manifest: requirements
                    .clone()
                    .unwrap_or_else(|| ctx.default_manifest_path()),
            };
            Ok((info, setup_environment(ctx, &request)?))
        }
        CommandRequest::List { base_dir, detailed } => {
            let info = CommandInfo::new("list");
            let request = ListRequest {
                base_dir: base_dir
                    .clone()
                    .unwrap_or_else(|| ctx.default_base_dir()),
                detailed: *detailed,
            };
            Ok((info, list_environments(&request)?))
        }
        CommandRequest::Remove {
            name,
            base_dir,
            force,
        } => {
            let info = CommandInfo::new("remove");
            let request = RemoveRequest {
                name: name.clone(),
                base_dir: base_dir
                    .clone()
                    .unwrap_or_else(|| ctx.default_base_dir()),
                force: *force,
            };
            Ok((info, remove_environment(ctx, &request)?))
        }
    }
}

fn emit_output(
    invocation: &Invocation,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = outcome.status.exit_code();
    let style = Style::new(invocation.no_color, atty::is(Stream::Stdout));

    if invocation.global.json {
        let payload = to_json_response(info, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if !invocation.global.quiet {
        let message = format_status_message(info, &outcome.message);
        println!("{}", style.status(&outcome.status, &message));
        if let Some(hint) = hint_from_details(&outcome.details) {
            let hint_line = format!("Hint: {hint}");
            println!("{}", style.info(&hint_line));
        }
        if let Some(listing) = render_environment_listing(&style, &outcome.details) {
            println!("{listing}");
        }
        if info.name == "create" && outcome.status == CommandStatus::Ok {
            render_activation_hints(&style, &outcome.details);
        }
    }

    Ok(code)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}

fn render_activation_hints(style: &Style, details: &Value) {
    if let Some(activate) = details.get("activate").and_then(Value::as_str) {
        println!("{}", style.info(&format!("To activate: {activate}")));
    }
    if details.get("shell_script").and_then(Value::as_str).is_some() {
        println!(
            "{}",
            style.info("Run './venv_shell' to open a new shell with the environment active")
        );
    }
}

const DETAILED_PACKAGE_LIMIT: usize = 10;

fn render_environment_listing(style: &Style, details: &Value) -> Option<String> {
    let detailed = details.get("detailed")?.as_bool()?;
    let environments = details.get("environments")?.as_array()?;
    if environments.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    if detailed {
        for env in environments {
            lines.push(String::new());
            lines.push(style.heading(&format!("Name: {}", str_field(env, "name"))));
            lines.push(format!("Path: {}", str_field(env, "path")));
            lines.push(format!("Created: {}", str_field(env, "created")));
            lines.push(format!("Size: {}", str_field(env, "size")));
            lines.push(format!("Python: {}", str_field(env, "python_version")));
            lines.push(format!("Packages: {}", count_field(env)));
            let packages: Vec<&str> = env
                .get("packages")
                .and_then(Value::as_array)
                .map(|pkgs| pkgs.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            if !packages.is_empty() {
                lines.push("Installed packages:".to_string());
                for pkg in packages.iter().take(DETAILED_PACKAGE_LIMIT) {
                    lines.push(format!("  - {pkg}"));
                }
                if packages.len() > DETAILED_PACKAGE_LIMIT {
                    lines.push(format!(
                        "  ... and {} more",
                        packages.len() - DETAILED_PACKAGE_LIMIT
                    ));
                }
            }
            lines.push("-".repeat(40));
        }
    } else {
        for env in environments {
            lines.push(format!(
                "  {:<20} | {:<8} | {:<19} | {:>3} packages",
                str_field(env, "name"),
                str_field(env, "size"),
                str_field(env, "created"),
                count_field(env),
            ));
        }
        lines.push(String::new());
        lines.push(style.info("Use --detailed for more information"));
    }

    Some(lines.join("\n"))
}

fn str_field<'a>(env: &'a Value, key: &str) -> &'a str {
    env.get(key).and_then(Value::as_str).unwrap_or("unknown")
}

fn count_field(env: &Value) -> u64 {
    env.get("package_count")
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

#[derive(Parser, Debug)]
#[command(
    name = "venvctl",
    author,
    version,
    about = "Manage Python virtual environments with automatic package installation",
    after_help = "Examples:\n  venvctl create --name myproject\n  venvctl list --detailed\n  venvctl remove --name myproject --force\n\nRunning without a subcommand behaves like `create` (legacy interface)."
)]
struct VenvctlCli {
    #[arg(
        short,
        long,
        global = true,
        help = "Suppress human output (errors still print to stderr)"
    )]
    quiet: bool,
    #[arg(long, global = true, help = "Emit {status,message,details} JSON envelopes")]
    json: bool,
    #[arg(long, global = true, help = "Disable colored human output")]
    no_color: bool,
    #[command(subcommand)]
    command: SubcommandCli,
}

#[derive(Subcommand, Debug)]
enum SubcommandCli {
    #[command(
        about = "Create or update a virtual environment",
        after_help = "Examples:\n  venvctl create\n  venvctl create --name myproject --requirements reqs/dev.txt\n"
    )]
    Create(CreateArgs),
    #[command(
        about = "List virtual environments",
        after_help = "Examples:\n  venvctl list\n  venvctl list --detailed\n"
    )]
    List(ListArgs),
    #[command(
        about = "Remove a virtual environment",
        after_help = "Examples:\n  venvctl remove --name myproject\n  venvctl remove --name myproject --force\n"
    )]
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(
        short,
        long,
        help = "Environment name (default: current directory name)"
    )]
    name: Option<String>,
    #[arg(
        short,
        long,
        value_name = "DIR",
        help = "Base directory for environments (default: ~/virtual_environments)"
    )]
    base_dir: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Requirements file (default: ./requirements.txt)"
    )]
    requirements: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    verbose: u8,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(
        short,
        long,
        value_name = "DIR",
        help = "Base directory for environments (default: ~/virtual_environments)"
    )]
    base_dir: Option<PathBuf>,
    #[arg(short, long, help = "Show detailed information about each environment")]
    detailed: bool,
}

#[derive(Args, Debug)]
struct RemoveArgs {
    #[arg(short, long, help = "Name of the environment to remove")]
    name: String,
    #[arg(
        short,
        long,
        value_name = "DIR",
        help = "Base directory for environments (default: ~/virtual_environments)"
    )]
    base_dir: Option<PathBuf>,
    #[arg(short, long, help = "Remove without the confirmation prompt")]
    force: bool,
}

/// The pre-subcommand schema: flat create-only flags. `ignore_errors` keeps
/// it tolerant of newer flags it never learned about.
#[derive(Parser, Debug)]
#[command(name = "venvctl", version, ignore_errors = true)]
struct LegacyCli {
    #[arg(short, long)]
    name: Option<String>,
    #[arg(short, long)]
    base_dir: Option<PathBuf>,
    #[arg(short, long)]
    requirements: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}
