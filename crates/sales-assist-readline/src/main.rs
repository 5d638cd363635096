use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use sales_assist_application::{AssistantUseCase, TurnInput};
use sales_assist_core::speech::SpeechInput;
use sales_assist_core::{
    Attachment, BackendGateway, ChatState, ClientConfig, Domain, LoadingState, ToggleOutcome,
};
use sales_assist_interaction::HttpBackendGateway;

mod command;
mod helper;
mod render;

use command::Command;
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "sales-assist")]
#[command(about = "Terminal client for the Sales Assistant backend", long_about = None)]
struct Cli {
    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long)]
    backend_url: Option<String>,

    /// User id to log in with
    #[arg(long)]
    user: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// What the REPL does after a command.
enum Flow {
    Continue,
    Logout,
    Quit,
}

struct Repl {
    assistant: AssistantUseCase,
    editor: Editor<CliHelper, DefaultHistory>,
    attachment: Option<Attachment>,
    speech: SpeechInput,
    /// Text placed in the next prompt, e.g. a domain's starter question.
    prefill: Option<String>,
}

impl Repl {
    fn prompt(&self) -> String {
        let domain = self
            .assistant
            .state()
            .active_domain()
            .map(|d| d.as_str().to_string())
            .unwrap_or_else(|| "-".to_string());
        match &self.attachment {
            Some(attachment) => format!("{} [+{}]> ", domain, attachment.filename),
            None => format!("{}> ", domain),
        }
    }

    /// Prompts until a session is started. Returns `false` when the user gives up.
    async fn login(&mut self, mut user_id: Option<String>) -> Result<bool> {
        loop {
            let candidate = match user_id.take() {
                Some(user_id) => user_id,
                None => match self.editor.readline("User ID: ") {
                    Ok(line) => line,
                    Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(false),
                    Err(err) => return Err(err.into()),
                },
            };

            match self.assistant.login(&candidate).await {
                Ok(session) => {
                    println!(
                        "{}",
                        format!("Logged in as {}", session.user_id).bright_green()
                    );
                    return Ok(true);
                }
                Err(e) => render::error(&e),
            }
        }
    }

    async fn run(&mut self, mut default_user: Option<String>) -> Result<()> {
        'session: loop {
            if !self.login(default_user.take()).await? {
                break;
            }
            render::domains(None);

            loop {
                let prompt = self.prompt();
                let domain_selected = self.assistant.state().active_domain().is_some();
                if let Some(helper) = self.editor.helper_mut() {
                    helper.set_domain_selected(domain_selected);
                }
                let readline = match self.prefill.take() {
                    Some(text) => self.editor.readline_with_initial(&prompt, (text.as_str(), "")),
                    None => self.editor.readline(&prompt),
                };

                match readline {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = self.editor.add_history_entry(line.as_str());
                        }
                        match self.dispatch(Command::parse(&line)).await {
                            Flow::Continue => {}
                            Flow::Logout => continue 'session,
                            Flow::Quit => break 'session,
                        }
                    }
                    Err(ReadlineError::Interrupted) => {
                        println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                    }
                    Err(ReadlineError::Eof) => {
                        println!("{}", "CTRL-D detected. Exiting...".bright_green());
                        break 'session;
                    }
                    Err(err) => {
                        eprintln!("{}", format!("Error: {:?}", err).red());
                        break 'session;
                    }
                }
            }
        }

        if self.assistant.session().is_active() {
            if let Err(e) = self.assistant.logout().await {
                render::warn(&e);
            }
        }
        println!("{}", "Goodbye!".bright_green());
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> Flow {
        match command {
            Command::Empty => {
                // Enter on an empty line sends a pending attachment on its own.
                if self.attachment.is_some() {
                    self.send(TurnInput::default()).await;
                }
            }
            Command::Quit => return Flow::Quit,
            Command::Help => render::help(),
            Command::Domains | Command::Domain(None) => {
                render::domains(self.assistant.state().active_domain())
            }
            Command::Domain(Some(name)) => self.select_domain(&name).await,
            Command::Files => render::files(self.assistant.state()),
            Command::Refresh => match self.assistant.refresh_files().await {
                Ok(_) => render::files(self.assistant.state()),
                Err(e) => render::error(&e),
            },
            Command::Select(arg) => self.toggle_file(&arg),
            Command::Status(file_id) => match self.assistant.file_status(&file_id).await {
                Ok(status) => println!(
                    "{}: {} (embedding: {})",
                    file_id,
                    status.processing_status,
                    status.embedding_status.as_deref().unwrap_or("unknown")
                ),
                Err(e) => render::error(&e),
            },
            Command::Attach(path) => self.attach(&path).await,
            Command::Detach => {
                if let Some(attachment) = self.attachment.take() {
                    println!("{}", format!("Dropped {}", attachment.filename).bright_black());
                }
            }
            Command::History => match self.assistant.load_history().await {
                Ok(history) => render::history(&history),
                Err(e) => render::error(&e),
            },
            Command::Speak => {
                let was_listening = self.speech.is_listening();
                match self.speech.toggle() {
                    Ok(_) if was_listening => println!("{}", "Stopping...".bright_black()),
                    Ok(_) => println!("{}", "Listening...".bright_yellow()),
                    Err(e) => render::error(&e),
                }
            }
            Command::Health => match self.assistant.health().await {
                Ok(()) => println!("{}", "Backend is reachable.".bright_green()),
                Err(e) => render::error(&e),
            },
            Command::Logout => {
                if let Err(e) = self.assistant.logout().await {
                    render::warn(&e);
                }
                self.attachment = None;
                println!("{}", "Logged out.".bright_green());
                return Flow::Logout;
            }
            Command::Suggestion(index) => match self.assistant.send_suggestion(index).await {
                Ok(outcome) => render::outcome(self.assistant.state(), &outcome),
                Err(e) => render::error(&e),
            },
            Command::Message(text) => self.send(TurnInput::text(text)).await,
            Command::Unknown(input) => {
                println!(
                    "{}",
                    format!("Unknown command '{}'. Type /help.", input).bright_black()
                );
            }
        }
        Flow::Continue
    }

    async fn select_domain(&mut self, name: &str) {
        let domain: Domain = match name.parse() {
            Ok(domain) => domain,
            Err(_) => {
                println!("{}", format!("Unknown domain '{}'.", name).yellow());
                return;
            }
        };
        if let Err(e) = self.assistant.select_domain(domain).await {
            render::error(&e);
            return;
        }

        self.attachment = None;
        println!(
            "{}",
            format!("{}: {}", domain.label(), domain.description()).bright_magenta()
        );
        if domain.allows_file_actions() {
            render::files(self.assistant.state());
        }
        self.prefill = Some(domain.starter_prompt().to_string());
    }

    fn toggle_file(&mut self, arg: &str) {
        let file_id = resolve_file_id(self.assistant.state(), arg);
        match self.assistant.toggle_file(&file_id) {
            Ok(outcome) => {
                let verb = match outcome {
                    ToggleOutcome::Selected => "Selected",
                    ToggleOutcome::Deselected => "Deselected",
                };
                println!("{} {}", verb, file_id);
            }
            Err(e) => render::error(&e),
        }
    }

    async fn attach(&mut self, path: &str) {
        if let Err(e) = self.assistant.state().selection.require_file_actions() {
            render::error(&e);
            return;
        }
        match Attachment::from_path(path).await {
            Ok(attachment) => {
                println!(
                    "{}",
                    format!(
                        "Attached {} ({} bytes, {}). It will be uploaded with your next message.",
                        attachment.filename,
                        attachment.size(),
                        attachment.mime_type
                    )
                    .bright_black()
                );
                self.attachment = Some(attachment);
            }
            Err(e) => render::error(&e),
        }
    }

    async fn send(&mut self, mut input: TurnInput) {
        input.attachment = self.attachment.clone();
        match self.assistant.send(input).await {
            Ok(outcome) => {
                self.attachment = None;
                render::outcome(self.assistant.state(), &outcome);
            }
            Err(e) => render::error(&e),
        }
    }
}

/// Accepts a 1-based position in the file list or a raw file id.
fn resolve_file_id(state: &ChatState, arg: &str) -> String {
    let files = state.selection.available_files();
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 && n <= files.len() => files[n - 1].file_id.clone(),
        _ => arg.to_string(),
    }
}

fn typing_indicator(state: &ChatState) {
    if state.conversation.loading() == LoadingState::AwaitingResponse {
        println!("{}", "Assistant is typing...".bright_black().italic());
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    load_config_with(cli, |key| std::env::var(key).ok())
}

/// Config file and environment first, then command-line flags on top.
fn load_config_with<F>(cli: &Cli, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ClientConfig::load_with(cli.config.as_deref(), lookup)?;
    if let Some(url) = &cli.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = secs;
    }
    if let Some(user) = &cli.user {
        config.user_id = Some(user.clone());
    }
    Ok(config.validate()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let gateway: Arc<dyn BackendGateway> = Arc::new(HttpBackendGateway::from_config(&config)?);
    if let Err(e) = gateway.health().await {
        render::warn(&e);
    }

    let mut editor = Editor::new()?;
    editor.set_helper(Some(CliHelper::new()));

    let mut repl = Repl {
        assistant: AssistantUseCase::new(gateway).with_observer(Arc::new(typing_indicator)),
        editor,
        attachment: None,
        speech: SpeechInput::unsupported(),
        prefill: None,
    };

    render::banner();
    repl.run(config.user_id).await
}
