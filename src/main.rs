use anyhow::Context;
use clap::{Arg, Command};
use log::LevelFilter;
use phish_scorer::harvest::LinkHarvester;
use phish_scorer::{Config, EmailMessage, NativeMessagingHost, PhishingScorer, TransportConfig};
use std::io;
use std::process;

fn main() {
    let matches = Command::new("phish-scorer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Phishing-risk scoring for single email messages")
        .long_about(
            "Assigns a trust score and risk level to an email message described as JSON.\n\
             Runs as a mail-client native messaging host (--native-messaging) or scores\n\
             a single exported message (--test-email). Without a mode it exits quietly.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file with lookup tables and transport settings"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("native-messaging")
                .long("native-messaging")
                .help("Serve length-prefixed JSON requests on stdin/stdout until stdin closes")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("test-email")
                .long("test-email")
                .value_name("FILE")
                .help("Score one message JSON file and print the result")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("harvest-links")
                .long("harvest-links")
                .help("With --test-email, derive links and HTML text when the file has none")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging of every detected reason")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("parent-window")
                .long("parent-window")
                .hide(true)
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("host-args")
                .value_name("HOST_ARGS")
                .help("Arguments appended by the mail client (manifest path, extension id)")
                .num_args(0..)
                .trailing_var_arg(true),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // stdout is reserved for frames; env_logger writes to stderr
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config = match load_config(matches.get_one::<String>("config")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    if let Some(host_args) = matches.get_many::<String>("host-args") {
        log::debug!("Host arguments: {:?}", host_args.collect::<Vec<_>>());
    }

    let scorer = PhishingScorer::new(config.tables.clone());

    if let Some(email_file) = matches.get_one::<String>("test-email") {
        if let Err(e) = test_email_file(&scorer, email_file, matches.get_flag("harvest-links")) {
            eprintln!("Error scoring {email_file}: {e:#}");
            process::exit(1);
        }
        return;
    }

    if matches.get_flag("native-messaging") {
        run_native_messaging(scorer, &config.transport);
        return;
    }

    log::debug!("No run mode selected, exiting without scoring");
}

fn load_config(path: Option<&String>) -> anyhow::Result<Config> {
    match path {
        Some(path) if std::path::Path::new(path).exists() => Config::from_file(path)
            .with_context(|| format!("failed to read configuration '{path}'")),
        Some(path) => {
            log::warn!("Configuration file '{path}' not found, using default configuration");
            Ok(Config::default())
        }
        None => Ok(Config::default()),
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn test_email_file(scorer: &PhishingScorer, path: &str, harvest: bool) -> anyhow::Result<()> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).context("message file is not valid JSON")?;

    let mut message = EmailMessage::from_value(value);
    if harvest {
        LinkHarvester::new().complete(&mut message);
    }

    let result = scorer.score_email(&message);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_native_messaging(scorer: PhishingScorer, transport: &TransportConfig) {
    log::info!(
        "Native messaging host started (byte order: {:?})",
        transport.byte_order
    );

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut host = NativeMessagingHost::new(stdin, stdout, scorer, transport);

    if let Err(e) = host.run() {
        log::error!("Native messaging session ended: {e}");
        process::exit(1);
    }
}
