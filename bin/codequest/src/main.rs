//! CodeQuest - command-line front-end
//!
//! Runs snippets from files through the sandbox, awards XP for clean runs
//! and manages saved projects. Every invocation is one short session over
//! the persistent store.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use tracing::{debug, error, info};

use codequest::console::ConsoleEntry;
use codequest::{Config, Language, SessionController, SourceBundle};

/// Sub-command to execute
#[derive(Debug, PartialEq)]
enum Command {
    /// Run the given fragments and report the outcome
    Run(FragmentFiles),
    /// Print level and XP
    Status,
    /// Reset progress
    EndSession,
    /// Save the given fragments as a named project
    Save { name: Option<String>, files: FragmentFiles },
    /// List saved projects
    Projects,
    /// Print a saved project, optionally running it
    Load { id: i64, run: bool },
    /// Delete a saved project
    Delete { id: i64 },
    /// Print a beautified file
    Beautify { lang: Language, path: PathBuf },
}

/// Source files for the three fragments
#[derive(Debug, Default, PartialEq)]
struct FragmentFiles {
    html: Option<PathBuf>,
    css: Option<PathBuf>,
    js: Option<PathBuf>,
}

impl FragmentFiles {
    fn read(&self) -> Result<SourceBundle> {
        Ok(SourceBundle::new(
            read_optional(self.html.as_deref())?,
            read_optional(self.css.as_deref())?,
            read_optional(self.js.as_deref())?,
        ))
    }
}

fn read_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => Ok(String::new()),
    }
}

/// Application arguments
#[derive(Debug)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
    /// Print reports as JSON
    json: bool,
    command: Command,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> Result<Self> {
        Self::parse_from(env::args().skip(1).collect())
    }

    fn parse_from(args: Vec<String>) -> Result<Self> {
        let mut config_path = None;
        let mut debug = false;
        let mut json = false;
        let mut files = FragmentFiles::default();
        let mut positional = Vec::new();
        let mut run_after_load = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => config_path = Some(take_path(&args, &mut i)?),
                "--html" => files.html = Some(take_path(&args, &mut i)?),
                "--css" => files.css = Some(take_path(&args, &mut i)?),
                "--js" => files.js = Some(take_path(&args, &mut i)?),
                "--debug" | "-d" => debug = true,
                "--json" => json = true,
                "--run" => run_after_load = true,
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("CodeQuest v{}", codequest::VERSION);
                    process::exit(0);
                }
                arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
                arg => positional.push(arg.to_string()),
            }
            i += 1;
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            Some("run") => Command::Run(files),
            Some("status") | None => Command::Status,
            Some("end-session") => Command::EndSession,
            Some("save") => Command::Save {
                name: positional.next(),
                files,
            },
            Some("projects") => Command::Projects,
            Some("load") => Command::Load {
                id: parse_id(positional.next())?,
                run: run_after_load,
            },
            Some("delete") => Command::Delete {
                id: parse_id(positional.next())?,
            },
            Some("beautify") => {
                let lang = positional
                    .next()
                    .context("beautify needs a language (html, css or js)")?
                    .parse::<Language>()?;
                let path = positional
                    .next()
                    .context("beautify needs a file to format")?;
                Command::Beautify {
                    lang,
                    path: PathBuf::from(path),
                }
            }
            Some(other) => bail!("Unknown command: {}", other),
        };

        if let Some(extra) = positional.next() {
            bail!("Unexpected argument: {}", extra);
        }

        Ok(Self {
            config_path,
            debug,
            json,
            command,
        })
    }
}

/// Consume the value following the flag at `args[*i]`
fn take_path(args: &[String], i: &mut usize) -> Result<PathBuf> {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(PathBuf::from(value)),
        None => bail!("Missing value for {}", flag),
    }
}

fn parse_id(raw: Option<String>) -> Result<i64> {
    let raw = raw.context("Missing project id")?;
    raw.parse()
        .with_context(|| format!("Invalid project id: {}", raw))
}

/// Print help information
fn print_help() {
    println!("CodeQuest - learn-to-code playground");
    println!();
    println!("USAGE:");
    println!("    codequest [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    run                     Run the fragments given with --html/--css/--js");
    println!("    status                  Show level and XP (default)");
    println!("    end-session             Reset progress");
    println!("    save [NAME]             Save the fragments as a project");
    println!("    projects                List saved projects");
    println!("    load <ID> [--run]       Print a saved project, optionally running it");
    println!("    delete <ID>             Delete a saved project");
    println!("    beautify <LANG> <FILE>  Print FILE re-indented as html, css or js");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Path to configuration file");
    println!("        --html <PATH>      Markup fragment");
    println!("        --css <PATH>       Style fragment");
    println!("        --js <PATH>        Script fragment");
    println!("        --json             Print run reports as JSON");
    println!("    -d, --debug            Enable debug logging");
    println!("    -h, --help             Print this help message");
    println!("    -v, --version          Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    CodeQuest looks for config.toml, then config.json, in:");
    println!("    1. Path specified with --config");
    println!("    2. <platform config dir>/codequest/");
    println!("    3. $XDG_CONFIG_HOME/codequest/");
    println!("    4. ~/.codequest/");
    println!("    5. ~/.config/codequest/");
    println!("    6. ./.codequest.toml or ./.codequest.json");
    println!("    7. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    CODEQUEST_DEBUG        Enable debug logging (1 or true)");
    println!("    RUST_LOG               Set logging level (error, warn, info, debug, trace)");
}

fn init_logging(debug: bool) {
    let debug = debug
        || env::var("CODEQUEST_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
    let log_level = if debug { "debug" } else { "warn" };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn load_configuration(args: &AppArgs) -> Result<Config> {
    let config = match &args.config_path {
        Some(path) => codequest::init_with_config(path)?,
        None => codequest::init()?,
    };
    debug!("Using data directory {}", config.data_dir().display());
    Ok(config)
}

fn print_console<'a>(entries: impl Iterator<Item = &'a ConsoleEntry>) {
    for entry in entries {
        println!("{}", entry);
    }
}

fn print_status(session: &SessionController) {
    let progress = session.progress();
    println!(
        "Level {}  {}/{} XP ({:.0}%)",
        progress.level,
        progress.xp,
        progress.required_xp,
        progress.progress_percent()
    );
}

async fn execute(args: AppArgs, config: Config) -> Result<()> {
    let mut session = SessionController::open(&config)?;

    match args.command {
        Command::Run(files) => {
            let report = session.run_bundle(files.read()?).await?;
            // give late output a chance to show up
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            session.pump_messages();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_console(session.console().entries());
                print_status(&session);
            }
        }
        Command::Status => print_status(&session),
        Command::EndSession => {
            session.end_session();
            print_console(session.console().entries());
        }
        Command::Save { name, files } => {
            session.set_sources(files.read()?);
            let name = name.unwrap_or_else(|| session.default_project_name());
            let saved = session.save_project(&name)?;
            print_console(session.console().entries());
            if let Some(project) = saved {
                println!("id: {}", project.id);
            }
        }
        Command::Projects => {
            if session.projects().is_empty() {
                println!("No saved projects.");
            }
            for project in session.projects() {
                println!("{:>15}  {:<24}  {}", project.id, project.name, project.preview.replace('\n', " "));
            }
        }
        Command::Load { id, run } => {
            let Some(project) = session.load_project(id)? else {
                print_console(session.console().entries());
                process::exit(1);
            };
            if run {
                let report = session.run().await?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_console(session.console().entries());
                    print_status(&session);
                }
            } else {
                for lang in Language::ALL {
                    println!("--- {} ---", lang.label());
                    println!("{}", project.to_bundle().fragment(lang));
                }
            }
        }
        Command::Delete { id } => {
            session.delete_project(id)?;
            print_console(session.console().entries());
        }
        Command::Beautify { lang, path } => {
            let code = read_optional(Some(&path))?;
            session.set_fragment(lang, code);
            if session.beautify(lang) {
                print!("{}", session.fragment(lang));
            } else {
                print_console(session.console().entries());
            }
        }
    }

    Ok(())
}

fn main() {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_help();
        process::exit(2);
    });

    init_logging(args.debug);
    info!("🚀 Starting CodeQuest v{}", codequest::VERSION);

    let config = match load_configuration(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("💥 Configuration failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(execute(args, config)) {
        error!("💥 Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
