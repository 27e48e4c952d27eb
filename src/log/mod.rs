use crate::session::Exchange;
use crate::wire::ExchangeRecord;
use chrono::Utc;
use fs_err as fs;
use serde_json::to_string_pretty;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: PathBuf,
    pub response: PathBuf,
}

/// Install the stderr subscriber. `RUST_LOG` wins over the `--debug` default.
pub fn init_tracing(debug: bool) {
    let fallback = if debug { "wellbeing_coach=debug,info" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .try_init();
}

fn session_dir(root: &Path, session: Uuid) -> PathBuf {
    root.join(".coach").join("sessions").join(session.to_string())
}

/// Write the request and reply of one exchange as pretty JSON. Write-only:
/// nothing in the crate reads these back.
pub fn save_exchange(root: &Path, session: Uuid, ex: &Exchange) -> anyhow::Result<SavedPaths> {
    let dir = session_dir(root, session);
    fs::create_dir_all(&dir)?;
    let now = Utc::now();

    let request = dir.join(format!("{:03}.request.json", ex.seq));
    let req_record = ExchangeRecord { session, seq: ex.seq, timestamp: now, body: &ex.request };
    fs::write(&request, to_string_pretty(&req_record)?)?;

    let response = dir.join(format!("{:03}.response.json", ex.seq));
    let resp_record = ExchangeRecord {
        session,
        seq: ex.seq,
        timestamp: now,
        body: serde_json::json!({
            "mode": ex.mode,
            "reply": ex.reply.text,
            "explanation": ex.explanation,
        }),
    };
    fs::write(&response, to_string_pretty(&resp_record)?)?;

    Ok(SavedPaths { dir, request, response })
}

pub fn print_planned_paths(root: &Path, session: Uuid) {
    let dir = session_dir(root, session);
    println!("debug: planned artifacts directory: {}", dir.display());
    std::io::stdout().flush().ok();
}

pub fn print_saved_paths(saved: &SavedPaths) {
    println!("debug: artifacts directory: {}", saved.dir.display());
    println!("debug: request saved at: {}", saved.request.display());
    println!("debug: response saved at: {}", saved.response.display());
    std::io::stdout().flush().ok();
}

pub fn print_json_debug(ex: &Exchange) -> anyhow::Result<()> {
    let req_json = to_string_pretty(&ex.request)?;
    let resp_json = to_string_pretty(&ex.reply)?;
    eprintln!("\n===== DEBUG [{}]: REQUEST JSON =====\n{}\n", ex.seq, req_json);
    eprintln!("===== DEBUG [{}]: RESPONSE JSON =====\n{}\n", ex.seq, resp_json);
    std::io::stderr().flush().ok();
    Ok(())
}
