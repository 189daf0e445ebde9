use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use bangerid::{config, error, server, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the web server (default)
    Serve(ServeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeOptions {
    /// Address to listen on [env: SERVER_ADDRESS]
    #[clap(long)]
    pub addr: Option<String>,

    /// Directory with templates/ and static/ [env: WEB_DIR]
    #[clap(long)]
    pub web_dir: Option<String>,

    /// Open the login page in the default browser once the server is up
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(ServeOptions::default())) {
        Command::Serve(opt) => serve(opt).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

async fn serve(opt: ServeOptions) {
    config::load_env().await;

    let oauth = match config::OAuthConfig::from_env() {
        Ok(oauth) => oauth,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    let addr = opt.addr.unwrap_or_else(config::server_addr);
    let web_dir = opt.web_dir.unwrap_or_else(config::web_dir);

    if opt.open {
        let login_url = format!("http://{}/login", addr);
        tokio::spawn(async move {
            // give the listener a moment to come up
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            if webbrowser::open(&login_url).is_err() {
                warning!(
                    "Failed to open browser. Please navigate to the following URL manually:\n{}",
                    login_url
                );
            }
        });
    }

    if let Err(e) = server::start_server(oauth, &addr, &web_dir).await {
        error!("Server failed: {}", e);
    }
}
