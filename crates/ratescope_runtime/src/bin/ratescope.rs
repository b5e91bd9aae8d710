//! Ratescope CLI entry point.

use ratescope_debug::TracerConfig;
use ratescope_runtime::{
    HttpTierService, LogFormat, Repl, RuntimeConfig, Session, StaticTokenAuth, logging,
};
use ratescope_storage::source::{builtin, from_json_file};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// Environment variable holding the access token.
const TOKEN_ENV_VAR: &str = "RATESCOPE_TOKEN";

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    data: Option<PathBuf>,
    tier_url: Option<String>,
    token: Option<String>,
    seed: Option<u64>,
    batch: Option<PathBuf>,
    show_help: bool,
    show_version: bool,
    trace: bool,
    json_log: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

/// Returns the value following flag `args[*i]`, advancing `i`.
fn flag_value(args: &[String], i: &mut usize) -> Result<String, Box<dyn std::error::Error>> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value").into())
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--trace" => config.trace = true,
            "--json-log" => config.json_log = true,
            "--data" => config.data = Some(PathBuf::from(flag_value(&args, &mut i)?)),
            "--tier-url" => config.tier_url = Some(flag_value(&args, &mut i)?),
            "--token" => config.token = Some(flag_value(&args, &mut i)?),
            "-b" | "--batch" => config.batch = Some(PathBuf::from(flag_value(&args, &mut i)?)),
            "--seed" => {
                let value = flag_value(&args, &mut i)?;
                config.seed = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid --seed value: {value}"))?,
                );
            }
            arg => return Err(format!("unknown option: {arg}").into()),
        }
        i += 1;
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(());
    }

    if cli.show_version {
        println!("ratescope {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logging::init(if cli.json_log {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    })?;

    let store = match &cli.data {
        Some(path) => from_json_file(path)?,
        None => builtin()?,
    };

    let mut config = RuntimeConfig::default();
    if let Some(url) = cli.tier_url {
        config = config.with_tier_url(url);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if cli.trace {
        config = config.with_tracer(TracerConfig::new().enabled().to_stderr());
    }

    let token = cli.token.or_else(|| env::var(TOKEN_ENV_VAR).ok());
    let auth = token.map_or_else(StaticTokenAuth::anonymous, StaticTokenAuth::new);
    let tiers = HttpTierService::new(config.tier_url.clone())?;
    let session = Session::with_services(store, config, Box::new(auth), Box::new(tiers))?;

    let mut repl = Repl::new(session)?;

    // Batch scripts control time with `wait`
    if let Some(script) = &cli.batch {
        repl = repl.without_banner().without_real_time();
        let transcript = repl.run_file(script)?;
        print!("{transcript}");
        return Ok(());
    }

    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mRatescope\x1b[0m - Rate limit lookup

\x1b[1mUSAGE:\x1b[0m
    ratescope [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help           Print help information
    -V, --version        Print version information
    --data <FILE>        Load rules from a JSON file instead of the built-in table
    --tier-url <URL>     Subscription endpoint queried after login
    --token <TOKEN>      Access token for login (or set {TOKEN_ENV_VAR})
    --seed <N>           Seed for simulated usage
    -b, --batch <FILE>   Run commands from FILE and exit

\x1b[1mDEBUG OPTIONS:\x1b[0m
    --trace              Print session events to stderr
    --json-log           Write log lines as JSON (filter with RUST_LOG)

\x1b[1mEXAMPLES:\x1b[0m
    ratescope                            Start interactive lookup
    ratescope --token $TOKEN             Start with login available
    ratescope -b lookup.txt --seed 7     Run a script deterministically

\x1b[1mREPL COMMANDS:\x1b[0m
    tier / api / type / method <value|->   Narrow the table
    search <text>, pick <n|path>           Search by path
    click <id>, copy <id>                  Select or copy a rule
    login, logout, override on|off         Account and tier
    wait <ms>                              Let usage samples arrive
    help                                   Full command list
    Ctrl+D                                 Exit"
    );
}
