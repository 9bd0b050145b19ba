use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobfit_client::api::{chat, jobfit, resumes, review, search};
use jobfit_client::config::Config;
use jobfit_client::models::job::ResumeSearchRequest;
use jobfit_client::models::resume::ActiveResume;
use jobfit_client::models::review::ReviewParams;
use jobfit_client::models::user::RegisterRequest;
use jobfit_client::navigation::TracingNavigator;
use jobfit_client::{ClientError, ClientState};

/// jobfit - command-line front-end for the JobFit career-coaching backend
#[derive(Parser, Debug)]
#[command(name = "jobfit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Path to the persisted client state (overrides JOBFIT_STATE_FILE)
    #[arg(long)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Session ===
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },

    /// Sign out and forget all local state
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Confirm the stored token with the server
        #[arg(long)]
        revalidate: bool,
    },

    // === Résumés ===
    /// List résumés stored on the server
    #[command(alias = "ls")]
    Resumes,

    /// Make a résumé the active one
    Select { id: i64 },

    /// Clear the active résumé
    Clear,

    /// Show the active résumé
    Current {
        /// Print the full résumé text
        #[arg(long)]
        full: bool,
    },

    /// Upload a PDF and make it the active résumé
    Upload { path: PathBuf },

    /// Delete a résumé
    Delete { id: i64 },

    // === Analysis ===
    /// Review the active résumé
    Review {
        /// Show the last stored review instead of running a new one
        #[arg(long)]
        latest: bool,
    },

    /// Free-text job search
    Search {
        query: String,
        #[arg(short = 'n', long, default_value = "10")]
        limit: u32,
    },

    /// Jobs matching the active résumé
    Match {
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(short = 'n', long, default_value = "10")]
        limit: u32,
        #[arg(long, default_value = "0.6")]
        min_score: f64,
    },

    /// Show one job posting
    Job { id: String },

    /// Latest saved job-fit analysis for the active résumé
    Jobfit {
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Recompute the analysis on the server
        #[arg(long)]
        refresh: bool,
    },

    // === Agent ===
    /// Conversation history for the active résumé
    History,

    /// Ask the agent about the active résumé
    Chat { message: String },

    /// Check that the backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.base_url {
        config.api_base_url = url;
    }
    if let Some(path) = cli.state_file {
        config.state_file = path;
    }

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("jobfit={0},jobfit_client={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting jobfit v{}", env!("CARGO_PKG_VERSION"));

    let client = ClientState::from_config(&config, Arc::new(TracingNavigator))
        .context("Failed to initialize client state")?;
    let boot = client.bootstrap().await;
    info!(
        "Bootstrap: authenticated={}, resume={:?}",
        boot.authenticated,
        boot.resume.as_ref().map(|r| r.id)
    );

    if let Err(e) = run(&client, cli.command).await {
        let hint = e
            .downcast_ref::<ClientError>()
            .map(|err| (err.is_authentication(), err.user_message()));
        return match hint {
            Some((true, _)) => Err(e.context("Authentication required. Run `jobfit login` to sign in.")),
            Some((false, message)) => Err(e.context(message)),
            None => Err(e),
        };
    }
    Ok(())
}

impl Commands {
    fn needs_session(&self) -> bool {
        !matches!(
            self,
            Commands::Login { .. } | Commands::Register { .. } | Commands::Logout | Commands::Health
        )
    }
}

async fn run(client: &ClientState, command: Commands) -> Result<()> {
    if command.needs_session() {
        require_session(client)?;
    }

    match command {
        Commands::Login { email, password } => {
            let user = client.session.login(&email, &password).await?;
            println!("Signed in as {} <{}>", user.display_name(), user.email);
            if let Some(resume) = client.resumes.bootstrap().await {
                println!("Active resume: {} ({})", resume.display_name, resume.id);
            }
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let profile = RegisterRequest {
                email,
                password,
                first_name,
                last_name,
            };
            let user = client.session.register(&profile).await?;
            println!("Registered {} <{}>", user.display_name(), user.email);
        }
        Commands::Logout => {
            client.logout()?;
            println!("Signed out");
        }
        Commands::Health => {
            let status = jobfit_client::api::health::health(&client.api).await?;
            print_json(&status)?;
        }
        Commands::Whoami { revalidate } => {
            let user = if revalidate {
                client.session.revalidate().await?
            } else {
                client.session.user().context("No signed-in user")?
            };
            print_json(&user)?;
        }
        Commands::Resumes => {
            let list = resumes::list_resumes(&client.api).await?;
            let active = client.resumes.current().map(|r| r.id);
            for record in list {
                let marker = if Some(record.resume_id) == active { "*" } else { " " };
                println!(
                    "{marker} {:>6}  {}",
                    record.resume_id,
                    record.file_name.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Select { id } => {
            let selection = client.resumes.select_resume(Some(id)).await?;
            print_json(&selection)?;
        }
        Commands::Clear => {
            client.resumes.clear()?;
            println!("Active resume cleared");
        }
        Commands::Current { full } => match client.resumes.current() {
            Some(resume) if full => print_json(&resume)?,
            Some(resume) => print_summary(&resume),
            None => println!("No active resume"),
        },
        Commands::Upload { path } => {
            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "resume.pdf".to_string());
            let selection = client.upload_resume(&file_name, Bytes::from(data)).await?;
            print_json(&selection)?;
        }
        Commands::Delete { id } => {
            let ack = resumes::delete_resume(&client.api, id).await?;
            if client.resumes.current().map(|r| r.id) == Some(id) {
                client.resumes.clear()?;
            }
            println!("{}", ack.message);
        }
        Commands::Review { latest } => {
            let resume = active_resume(client)?;
            let response = if latest {
                review::latest_review(&client.api, resume.id).await?
            } else {
                review::review_resume(&client.api, resume.id, &resume.content, ReviewParams::default())
                    .await?
            };
            print_json(&response)?;
        }
        Commands::Search { query, limit } => {
            print_json(&search::search_jobs(&client.api, &query, limit).await?)?;
        }
        Commands::Match {
            role,
            location,
            limit,
            min_score,
        } => {
            let resume = active_resume(client)?;
            let mut request = ResumeSearchRequest::new(resume.content);
            request.resume_id = Some(resume.id);
            request.role = role;
            request.location = location;
            request.limit = limit;
            request.min_score = min_score;
            print_json(&search::search_jobs_from_resume(&client.api, &request).await?)?;
        }
        Commands::Job { id } => {
            print_json(&search::job_detail(&client.api, &id).await?)?;
        }
        Commands::Jobfit {
            role,
            location,
            refresh,
        } => {
            let resume = active_resume(client)?;
            let mut saved =
                jobfit::latest_analysis(&client.api, resume.id, role.as_deref(), location.as_deref())
                    .await?;
            if refresh {
                saved = jobfit::refresh_analysis(&client.api, saved.analysis_id).await?;
            }
            print_json(&saved)?;
        }
        Commands::History => {
            let resume = active_resume(client)?;
            for message in chat::chat_history(&client.api, resume.id).await? {
                println!("[{:?}] {}", message.role, message.content);
            }
        }
        Commands::Chat { message } => {
            let resume = active_resume(client)?;
            let reply = chat::send_chat_message(&client.api, resume.id, &message).await?;
            println!("{}", reply.response);
        }
    }
    Ok(())
}

fn require_session(client: &ClientState) -> Result<()> {
    if !client.session.is_authenticated() {
        bail!("Not signed in. Run `jobfit login` first.");
    }
    Ok(())
}

fn active_resume(client: &ClientState) -> Result<ActiveResume> {
    client
        .resumes
        .current()
        .context("No active resume. Upload one or run `jobfit select <id>`.")
}

fn print_summary(resume: &ActiveResume) {
    println!("{} ({})", resume.display_name, resume.id);
    println!("  version:       {}", resume.version);
    println!("  last modified: {}", resume.last_modified.to_rfc3339());
    println!("  length:        {} chars", resume.content.chars().count());
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
