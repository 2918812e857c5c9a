//! 20-level dimmer: continuous linear darkness scale, default level 10 (50%).

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dusk::opacity::OpacityScale;
use dusk::overlay;

fn main() -> Result<()> {
    // Initialize logging; diagnostics go to stderr so stdout stays quiet
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "dusk=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    // Non-numeric input parses as 0 and clamps to the minimum level
    let level_arg = args.get(1).map(|arg| arg.parse::<i64>().unwrap_or(0));

    overlay::run(OpacityScale::Linear { levels: 20 }, level_arg)
}
