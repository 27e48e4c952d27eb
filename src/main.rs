use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::info;

mod cli;
mod config;
mod errors;
mod log;
mod profile;
mod prompt;
mod provider;
mod session;
mod ux;
mod wire;

use errors::CoachError;
use prompt::ResponseMode;
use provider::Provider;
use session::Session;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Submit(String),
    Mode(Result<ResponseMode, CoachError>),
    Modes,
    History,
    Profile,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    // A doubled slash sends the rest of the line as text, keeping one slash.
    if trimmed.starts_with("//") {
        return Command::Submit(trimmed[1..].to_string());
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Submit(line.trim_end_matches(['\r', '\n']).to_string());
    };
    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (rest, ""),
    };
    match cmd.to_lowercase().as_str() {
        "mode" => Command::Mode(arg.parse()),
        "modes" => Command::Modes,
        "history" => Command::History,
        "profile" => Command::Profile,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

struct App<'a> {
    cfg: &'a config::Config,
    args: &'a cli::Args,
    provider: &'a dyn Provider,
    session: Session,
    mode: ResponseMode,
}

impl App<'_> {
    async fn submit(&mut self, text: &str) -> Result<bool, CoachError> {
        let pb = ux::spinner(self.args.progress);
        let out = self
            .session
            .submit(
                self.mode,
                text,
                Some(&self.cfg.profile),
                self.provider,
                &self.cfg.model,
                self.args.debug,
            )
            .await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let Some(ex) = out? else { return Ok(false) };

        if self.args.debug {
            if let Err(e) = log::print_json_debug(&ex) {
                tracing::warn!(error = %e, "could not dump exchange json");
            }
        }
        if self.args.save_exchanges {
            match log::save_exchange(Path::new(&self.cfg.root), self.session.id(), &ex) {
                Ok(saved) if self.args.debug => log::print_saved_paths(&saved),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "could not save exchange artifacts"),
            }
        }
        if let Some(last) = self.session.transcript().snapshot().last() {
            println!("{}\n", ux::render_turn(last, Some(self.mode), &self.cfg.media));
        }
        Ok(true)
    }

    async fn repl(&mut self) -> anyhow::Result<()> {
        ux::print_banner(self.mode);
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("> ");
            io::stdout().flush().ok();
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            match parse_command(&line) {
                Command::Submit(text) => {
                    if let Err(e) = self.submit(&text).await {
                        ux::print_error(&e);
                    }
                }
                Command::Mode(Ok(m)) => {
                    self.mode = m;
                    if self.session.observe_mode(m) {
                        ux::print_mode_switched(m);
                    }
                }
                Command::Mode(Err(e)) => {
                    ux::print_error(&e);
                    ux::print_modes(self.session.current_mode());
                }
                Command::Modes => ux::print_modes(self.session.current_mode()),
                Command::History => ux::print_transcript(
                    self.session.transcript().snapshot(),
                    self.session.current_mode(),
                    &self.cfg.media,
                ),
                Command::Profile => ux::print_profile(&self.cfg.profile),
                Command::Quit => break,
                Command::Unknown(c) => println!("unknown command: /{c}"),
            }
        }
        info!(session = %self.session.id(), turns = self.session.transcript().len(), "session ended");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    log::init_tracing(args.debug);

    let cfg = config::Config::resolve(&args)?;
    let prov = provider::make_provider(&cfg)?;

    let session = Session::new();
    if args.debug {
        println!("debug: flag enabled");
        if args.save_exchanges {
            log::print_planned_paths(Path::new(&cfg.root), session.id());
        }
    }
    info!(session = %session.id(), provider = ?cfg.provider, model = %cfg.model, "session started");

    let mut app = App {
        cfg: &cfg,
        args: &args,
        provider: prov.as_ref(),
        session,
        mode: cfg.mode,
    };
    app.session.observe_mode(app.mode);

    if let Some(input) = args.input.clone() {
        return match app.submit(&input).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(anyhow::anyhow!("input is blank, nothing to send")),
            Err(e) => Err(e.into()),
        };
    }

    app.repl().await
}
