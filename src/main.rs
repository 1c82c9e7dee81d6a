use std::env;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vtrace::{SourceCallback, TraceSource, VehicleDataSource, VehicleMessage};

/// Prints each payload, decoded as a measurement when it parses as one
struct StdoutSink;

impl SourceCallback for StdoutSink {
    fn receive(&self, payload: String) {
        match VehicleMessage::from_payload(&payload) {
            Ok(msg) => println!("{} = {}", msg.name, msg.value),
            Err(_) => println!("{}", payload.trim()),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let uri = match args.next() {
        Some(uri) => uri,
        None => bail!("usage: vtrace <trace-file> [seconds]"),
    };
    let run_for = args
        .next()
        .map(|s| s.parse::<u64>())
        .transpose()
        .map_err(|_| anyhow::anyhow!("seconds must be a whole number"))?;

    let source = TraceSource::new(&uri)?;
    source.set_callback(Arc::new(StdoutSink));

    match run_for {
        Some(seconds) => {
            info!("playing back {} for {}s", uri, seconds);
            thread::sleep(Duration::from_secs(seconds));
            source.stop();
        }
        None => {
            info!("playing back {}, ctrl-c to exit", uri);
            loop {
                thread::sleep(Duration::from_secs(60));
            }
        }
    }

    Ok(())
}
