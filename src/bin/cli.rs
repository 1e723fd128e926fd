//! calcd CLI Client
//!
//! Sends expressions to a calcd server and prints the answers.

use std::io::{self, BufRead, Write};

use calcd::protocol::{is_bye, Response};
use calcd::Client;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// calcd CLI
#[derive(Parser, Debug)]
#[command(name = "calcd-cli")]
#[command(about = "CLI for the calcd arithmetic server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:9999")]
    server: String,

    /// Expressions to evaluate, e.g. "ADD 10 20" "24 + 42".
    /// Without any, reads expressions from stdin until `bye`.
    expressions: Vec<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();

    let client = match Client::connect(&args.server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Connection error: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = if args.expressions.is_empty() {
        println!("Connected to {}", args.server);
        interactive(client)
    } else {
        batch(client, &args.expressions)
    };

    if let Err(e) = outcome {
        eprintln!("Connection error: {}", e);
        std::process::exit(1);
    }
}

/// Evaluate each argument in order, then say bye
fn batch(mut client: Client, expressions: &[String]) -> calcd::Result<()> {
    for expression in expressions {
        let response = client.send(expression)?;
        println!("{}", render(&response));
    }
    client.bye()
}

/// Prompt on stdin until `bye` or end of input
fn interactive(mut client: Client) -> calcd::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Expression (ADD 10 20 or 24 + 42), 'bye' to exit >> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            return client.bye();
        };

        if is_bye(&line) {
            return client.bye();
        }

        let response = client.send(&line)?;
        println!("{}", render(&response));
    }
}

/// `Answer: <value>` on success, otherwise the error message (or reason)
fn render(response: &Response) -> String {
    if response.is_answer() {
        format!("Answer: {}", response.value.as_deref().unwrap_or_default())
    } else {
        let message = response
            .error_message
            .as_deref()
            .unwrap_or(response.reason.as_str());
        format!("Error message: {}", message)
    }
}
