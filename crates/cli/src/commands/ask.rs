//! `parley ask` — Send a single message to the agent and print the reply.
//!
//! Builds the full pipeline in-process (no HTTP involved), so it works
//! without a running gateway. Each invocation starts a fresh session
//! unless `--session` names one to continue; since the store is process
//! local, continuing a session only matters within scripted multi-turn
//! use of the library, but the id is printed for symmetry with the API.

use parley_config::AppConfig;
use uuid::Uuid;

pub async fn run(message: String, session: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());
    let state = parley_gateway::build_state(&config);

    let reply = state.orchestrator.handle(&session_id, &message).await?;

    println!("{}", reply.response);
    eprintln!("(session: {})", reply.session_id);

    Ok(())
}
