use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{self, SessionState};
use crate::cli::utils::{output_success, ApiClient};
use crate::cli::OutputFormat;
use crate::database::models::UserBody;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account and open a session")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Log in and store the session")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Log out and clear the stored session")]
    Logout,

    #[command(about = "Show the current authenticated user")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    server: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut state = config::load_session()?;
    let server = config::resolve_server(server, &state);

    match cmd {
        AuthCommands::Register { name, email, password } => {
            let password = password_or_prompt(password)?;
            let client = ApiClient::new(&server, None);

            let (body, token) = client
                .post_json(
                    "/api/v1/auth/register",
                    &json!({ "name": name, "email": email, "password": password }),
                )
                .await?;

            open_session(&mut state, server, token, &body)?;
            output_success(
                &output_format,
                &format!("Registered {}", email),
                Some(json!({ "user": body["data"] })),
            )
        }

        AuthCommands::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let client = ApiClient::new(&server, None);

            let (body, token) = client
                .post_json(
                    "/api/v1/auth/login",
                    &json!({ "email": email, "password": password }),
                )
                .await?;

            open_session(&mut state, server, token, &body)?;
            output_success(
                &output_format,
                &format!("Logged in as {}", email),
                Some(json!({ "user": body["data"] })),
            )
        }

        AuthCommands::Logout => {
            let client = ApiClient::new(&server, state.token.clone());
            client.get("/api/v1/auth/logout").await?;

            state.token = None;
            config::save_session(&state)?;
            config::clear_cached_user()?;

            output_success(&output_format, "Logged out successfully", None)
        }

        AuthCommands::Whoami => {
            let client = ApiClient::new(&server, state.token.clone());
            let body = client.get("/api/v1/me").await?;

            let user: UserBody = serde_json::from_value(body["data"].clone())?;
            config::save_cached_user(&user)?;

            output_success(
                &output_format,
                &format!("{} <{}> ({} posts)", user.name, user.email, user.posts.len()),
                Some(json!({ "user": body["data"] })),
            )
        }
    }
}

/// Persist the session cookie and cache the user snapshot after a
/// successful register/login.
fn open_session(
    state: &mut SessionState,
    server: String,
    token: Option<String>,
    body: &serde_json::Value,
) -> anyhow::Result<()> {
    state.server = server;
    state.token = token;
    config::save_session(state)?;

    let user: UserBody = serde_json::from_value(body["data"].clone())?;
    config::save_cached_user(&user)?;

    Ok(())
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => {
            eprint!("Password: ");
            io::stderr().flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line.trim_end().to_string())
        }
    }
}
