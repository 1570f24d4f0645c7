//! One-shot manual send: stage a message on the clipboard and deliver
//! it to the target window. The CLI stand-in for the original admin
//! form's "test send" button.

#[cfg(not(windows))]
fn main() {
    eprintln!("relay-send drives Win32 windows and only runs on Windows");
    std::process::exit(1);
}

#[cfg(windows)]
fn main() {
    app::run();
}

#[cfg(windows)]
mod app {
    use std::time::Duration;

    use clap::Parser;
    use relay_core::config::Timings;
    use relay_core::desktop::Win32Desktop;
    use relay_core::dispatch::send_manual;
    use relay_core::guard::SendGuard;

    #[derive(Parser)]
    #[command(
        name = "relay-send",
        about = "Send one message into a target window via clipboard paste"
    )]
    struct Args {
        /// Process name of the target application (without .exe)
        #[arg(long, default_value = "weixin")]
        process_name: String,

        /// Exact window title to match
        #[arg(long)]
        window_title: String,

        /// Settle wait after window activation, in milliseconds
        #[arg(long, default_value_t = 1000)]
        settle_ms: u64,

        /// The message text to deliver
        message: String,
    }

    pub fn run() {
        tracing_subscriber::fmt::init();
        let args = Args::parse();

        let timings = Timings {
            activate_settle: Duration::from_millis(args.settle_ms),
            ..Timings::default()
        };
        let desktop = Win32Desktop::new(&timings);
        let guard = SendGuard::new();

        if !send_manual(
            &desktop,
            &guard,
            &args.process_name,
            &args.window_title,
            &args.message,
        ) {
            eprintln!("relay-send: nothing sent (empty message or another send in progress)");
            std::process::exit(1);
        }
    }
}
