//! Loopback HTTP listener that relays posted payloads into the target
//! window. Runs until Ctrl-C.

#[cfg(not(windows))]
fn main() {
    eprintln!("relay-serve drives Win32 windows and only runs on Windows");
    std::process::exit(1);
}

#[cfg(windows)]
fn main() {
    app::run();
}

#[cfg(windows)]
mod app {
    use std::sync::Arc;
    use std::time::Duration;

    use clap::Parser;
    use relay_core::config::{RelayConfig, Timings};
    use relay_core::desktop::Win32Desktop;
    use relay_core::server::{serve, RelayContext};

    #[derive(Parser)]
    #[command(
        name = "relay-serve",
        about = "Relay POSTed text into a target window via clipboard paste"
    )]
    struct Args {
        /// Process name of the target application (without .exe)
        #[arg(long, default_value = "weixin")]
        process_name: String,

        /// Exact window title to match
        #[arg(long)]
        window_title: String,

        /// Loopback port to listen on
        #[arg(long, default_value_t = 58080)]
        port: u16,

        /// Run the HTTP-triggered dispatch under the same single-flight
        /// guard as manual sends
        #[arg(long, default_value_t = false)]
        guard_http: bool,

        /// Settle wait after window activation, in milliseconds
        #[arg(long, default_value_t = 1000)]
        settle_ms: u64,

        /// Delay between acknowledging a POST and dispatching it, in
        /// milliseconds
        #[arg(long, default_value_t = 2000)]
        dispatch_delay_ms: u64,
    }

    #[tokio::main]
    pub async fn run() {
        tracing_subscriber::fmt::init();
        let args = Args::parse();

        let config = RelayConfig {
            process_name: args.process_name,
            window_title: args.window_title,
            port: args.port,
            guard_http_dispatch: args.guard_http,
            timings: Timings {
                activate_settle: Duration::from_millis(args.settle_ms),
                dispatch_delay: Duration::from_millis(args.dispatch_delay_ms),
            },
        };

        let desktop = Arc::new(Win32Desktop::new(&config.timings));
        let ctx = RelayContext::new(Arc::new(config), desktop);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("shutdown requested");
        };

        if let Err(err) = serve(ctx, shutdown).await {
            eprintln!("relay-serve: {err}");
            std::process::exit(1);
        }
    }
}
