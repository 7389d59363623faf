use clap::{Parser, Subcommand};
use env_logger::Env;
use serde_json::json;
use ssp::{Conf, ServerInfo, SspErr};
use std::time::Duration;

const UNKNOWN: &str = "Unknown";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address, either `ip` or `ip:port`
    address: String,

    /// Server port, used when the address has none
    #[arg(short = 'p', long, default_value = "7777")]
    port: u16,

    /// Attempts before reporting the server as not responding
    #[arg(short = 'a', long, default_value = "3")]
    attempts: u32,

    /// Timeout of a single attempt in milliseconds
    #[arg(short = 't', long, default_value = "3000")]
    timeout_ms: u64,

    /// Take the online count of `status` from the player list
    #[arg(short = 'r', long)]
    roster: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Hostname, gamemode, map and player counts
    Info,
    /// Connected players and their scores
    Players,
    /// Server rules
    Rules,
    /// Info merged with rules
    Status,
    /// Whether the server answers at all
    Online,
}

fn or_unknown(field: Option<&str>) -> &str {
    match field {
        Some(value) if !value.is_empty() => value,
        _ => UNKNOWN,
    }
}

fn present(info: &ServerInfo) -> serde_json::Value {
    json!({
        "hostname": or_unknown(info.hostname.as_deref()),
        "gamemode": or_unknown(info.gamemode.as_deref()),
        "mapname": or_unknown(info.mapname.as_deref()),
        "players": info.players,
        "max_players": info.max_players,
    })
}

fn run(args: &Args) -> Result<String, SspErr> {
    let mut conf = match args.address.contains(':') {
        true => Conf::create_from_str(&args.address)?,
        false => Conf::create_with_port(&args.address, args.port),
    };

    conf.socket_conf.max_attempts = args.attempts;
    conf.socket_conf.read_time_out = Duration::from_millis(args.timeout_ms);
    conf.roster_player_count = args.roster;

    log::info!("Querying {}", conf);

    let output = match args.command.unwrap_or(Command::Info) {
        Command::Info => present(&conf.get_server_info()?),
        Command::Players => json!({ "players": conf.get_players()? }),
        Command::Rules => json!({ "rules": conf.get_rules()? }),
        Command::Status => {
            let status = conf.get_server_status()?;
            let mut output = present(&status.info);

            output["version"] = json!(status.version.as_deref().unwrap_or(UNKNOWN));
            output["is_omp"] = json!(status.is_omp);
            output["passworded"] = json!(status.info.passworded);
            output["language"] = json!(status.info.language);
            output["rules"] = json!(status.rules);
            output
        }
        Command::Online => json!({ "online": conf.is_online()? }),
    };

    serde_json::to_string_pretty(&output).map_err(|err| SspErr::DataErr(err.to_string()))
}

fn main() -> Result<(), SspErr> {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));

    let args = Args::parse();

    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) => {
            if err.is_no_response() {
                log::error!("Server {} is not responding", args.address);
            }

            Err(err)
        }
    }
}
