//! Veilchat command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Key derivation and envelope encryption
//! veilchat derive-key --sender alice --recipient bob
//! veilchat encrypt --sender alice --recipient bob --message "hello world"
//! veilchat decrypt --sender alice --recipient bob --envelope <base64>
//!
//! # Face comparison of two encoded embeddings
//! veilchat verify-face --submitted <base64> --stored <base64>
//!
//! # Session tokens (secret from VEILCHAT_SECRET_KEY)
//! veilchat issue-token --subject alice
//!
//! # In-memory register, login, send and read walkthrough
//! veilchat demo
//! ```

use std::io::Write;

use base64::{Engine, engine::general_purpose::STANDARD};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use veilchat_auth::{DEFAULT_TOKEN_TTL_SECS, SessionIssuer, face_distance, matches};
use veilchat_crypto::{decrypt, derive_pair_key, encrypt};
use veilchat_server::{ChatService, Environment, MemoryStorage, ServiceConfig, SystemEnv};

/// Veilchat messaging tool
#[derive(Parser, Debug)]
#[command(name = "veilchat")]
#[command(about = "Face-authenticated encrypted messaging")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the hex pair key for (sender, recipient)
    DeriveKey(PairArgs),

    /// Encrypt a message for (sender, recipient)
    Encrypt {
        #[command(flatten)]
        pair: PairArgs,

        /// Plaintext message
        #[arg(short, long)]
        message: String,
    },

    /// Decrypt an envelope for (sender, recipient)
    Decrypt {
        #[command(flatten)]
        pair: PairArgs,

        /// Base64 envelope
        #[arg(short, long)]
        envelope: String,
    },

    /// Compare two encoded face embeddings
    VerifyFace {
        /// Submitted embedding (base64 JSON)
        #[arg(long)]
        submitted: String,

        /// Enrolled embedding (base64 JSON)
        #[arg(long)]
        stored: String,
    },

    /// Mint a session token for a subject
    IssueToken {
        /// Subject username
        #[arg(long)]
        subject: String,

        #[command(flatten)]
        token: TokenArgs,
    },

    /// Run an in-memory register, login, send and read walkthrough
    Demo {
        /// Token signing secret (random if omitted)
        #[arg(long, env = "VEILCHAT_SECRET_KEY", hide_env_values = true)]
        secret: Option<String>,
    },
}

#[derive(ClapArgs, Debug)]
struct PairArgs {
    /// Sending identity
    #[arg(short, long)]
    sender: String,

    /// Receiving identity
    #[arg(short, long)]
    recipient: String,
}

#[derive(ClapArgs, Debug)]
struct TokenArgs {
    /// Token signing secret (at least 32 bytes)
    #[arg(long, env = "VEILCHAT_SECRET_KEY", hide_env_values = true)]
    secret: String,

    /// Token lifetime in seconds
    #[arg(long, env = "VEILCHAT_TOKEN_TTL_SECS", default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    ttl_secs: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut out = std::io::stdout().lock();

    match args.command {
        Command::DeriveKey(pair) => {
            let key = derive_pair_key(&pair.sender, &pair.recipient);
            writeln!(out, "{}", hex::encode(key.as_bytes()))?;
        },

        Command::Encrypt { pair, message } => {
            let key = derive_pair_key(&pair.sender, &pair.recipient);
            writeln!(out, "{}", encrypt(&message, &key))?;
        },

        Command::Decrypt { pair, envelope } => {
            let key = derive_pair_key(&pair.sender, &pair.recipient);
            writeln!(out, "{}", decrypt(&envelope, &key)?)?;
        },

        Command::VerifyFace { submitted, stored } => {
            if let Ok(distance) = face_distance(&submitted, &stored) {
                tracing::info!(distance, "embedding distance");
            }
            let verdict = if matches(&submitted, &stored) { "match" } else { "no match" };
            writeln!(out, "{verdict}")?;
        },

        Command::IssueToken { subject, token } => {
            let env = SystemEnv::new();
            let config = ServiceConfig::new(token.secret, token.ttl_secs)?;
            let token = config.session_issuer().issue(&subject, env.wall_clock_secs())?;
            writeln!(out, "{}", token.access_token)?;
        },

        Command::Demo { secret } => run_demo(secret, &mut out)?,
    }

    Ok(())
}

/// Two users enroll, log in, exchange a message and read it back.
fn run_demo(
    secret: Option<String>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let env = SystemEnv::new();
    let config = match secret {
        Some(secret) => ServiceConfig::new(secret, DEFAULT_TOKEN_TTL_SECS)?,
        None => {
            tracing::warn!("No token secret provided - using an ephemeral random secret");
            ServiceConfig::ephemeral(&env)
        },
    };

    let service = ChatService::new(env, MemoryStorage::new(), config.session_issuer());

    let alice_face = demo_embedding(0.37);
    let bob_face = demo_embedding(1.91);

    service.register("alice", &encode_embedding(&alice_face))?;
    service.register("bob", &encode_embedding(&bob_face))?;

    // A fresh capture of the same face is close but not identical
    let alice_capture: Vec<f32> = alice_face.iter().map(|v| v + 0.005).collect();
    let alice = service.login("alice", &encode_embedding(&alice_capture))?;

    match service.login("bob", &encode_embedding(&alice_capture)) {
        Ok(_) => tracing::error!("bob's account accepted alice's face"),
        Err(e) => {
            writeln!(out, "login as bob with alice's face: {} ({})", e.detail(), e.status())?;
        },
    }

    let sent = service.send_message(&alice.access_token, "bob", "hello world")?;
    writeln!(out, "alice -> bob: message {} sent", sent.id)?;

    let bob = service.login("bob", &encode_embedding(&bob_face))?;
    for message in service.messages_for(&bob.access_token)? {
        writeln!(out, "bob reads from {}: {}", message.sender, message.content)?;
    }

    Ok(())
}

/// Deterministic 128-dimension face descriptor for the demo.
fn demo_embedding(phase: f32) -> Vec<f32> {
    (0..128).map(|i| ((i as f32) * 0.29 + phase).sin() * 0.1).collect()
}

/// Index-keyed JSON, the shape browser face descriptors serialize to.
fn encode_embedding(values: &[f32]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), serde_json::Value::from(f64::from(*v))))
        .collect();

    STANDARD.encode(serde_json::Value::Object(map).to_string())
}
