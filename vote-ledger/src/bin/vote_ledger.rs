//! Line-oriented vote ledger front end
//!
//! Reads commands from stdin:
//!
//! ```text
//! candidate <name>
//! vote <voter_name>,<voter_id>,<candidate>[,<photo_path>]
//! tally
//! votes
//! validate
//! audit
//! ```

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use vote_ledger::{
    spawn_session_actor, Config, Error, Metrics, SessionHandle, VoteRequest, VotingSession,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => Config::from_env().context("loading config from environment")?,
    };

    init_tracing(&config);
    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        "Starting vote ledger"
    );

    let metrics = if config.metrics_enabled {
        Some(Metrics::new().map_err(|e| anyhow::anyhow!("creating metrics: {}", e))?)
    } else {
        None
    };

    let session = VotingSession::from_config(&config)?;
    let handle = spawn_session_actor(session, config.mailbox_capacity, metrics.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(e) = run_command(&handle, line).await {
            println!("error: {}", e);
        }
    }

    print_tally(&handle).await?;
    println!("chain valid: {}", handle.validate().await?);

    if let Some(metrics) = metrics {
        let text = metrics
            .render()
            .map_err(|e| anyhow::anyhow!("rendering metrics: {}", e))?;
        print!("{}", text);
    }

    let session = handle.shutdown().await?;
    tracing::info!(
        chain_length = session.ledger().len(),
        votes = session.votes().len(),
        "Vote ledger stopped"
    );
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_command(handle: &SessionHandle, line: &str) -> anyhow::Result<()> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "candidate" => {
            handle.register_candidate(rest).await?;
            println!("candidate '{}' registered", rest);
        }
        "vote" => {
            let request = parse_vote(rest)?;
            match handle.submit(request).await {
                Ok(vote) => println!(
                    "vote recorded: #{} {} ({}) -> {} [{}]",
                    vote.sequence_number,
                    vote.ballot.voter_name,
                    vote.ballot.voter_id,
                    vote.ballot.candidate,
                    vote.fingerprint
                ),
                Err(Error::InvalidCandidate(name)) => {
                    println!("{} is not a valid candidate", name)
                }
                Err(e) => return Err(e.into()),
            }
        }
        "tally" => print_tally(handle).await?,
        "votes" => {
            let votes = handle.votes().await?;
            println!("{}", serde_json::to_string_pretty(&votes)?);
        }
        "validate" => println!("chain valid: {}", handle.validate().await?),
        "audit" => match handle.audit().await {
            Ok(()) => println!("audit passed"),
            Err(e) => println!("audit failed: {}", e),
        },
        other => anyhow::bail!("unknown command: {}", other),
    }

    Ok(())
}

fn parse_vote(args: &str) -> anyhow::Result<VoteRequest> {
    let fields: Vec<&str> = args.split(',').map(str::trim).collect();
    match fields.as_slice() {
        [name, id, candidate] | [name, id, candidate, ""]
            if !name.is_empty() && !id.is_empty() && !candidate.is_empty() =>
        {
            Ok(VoteRequest::new(*name, *id, *candidate))
        }
        [name, id, candidate, photo]
            if !name.is_empty() && !id.is_empty() && !candidate.is_empty() =>
        {
            Ok(VoteRequest::new(*name, *id, *candidate).with_photo(*photo))
        }
        _ => anyhow::bail!("usage: vote <voter_name>,<voter_id>,<candidate>[,<photo_path>]"),
    }
}

async fn print_tally(handle: &SessionHandle) -> anyhow::Result<()> {
    println!("Candidate Votes:");
    for (name, votes) in handle.candidates().await? {
        println!("{}: {} votes", name, votes);
    }
    Ok(())
}
