use anyhow::Context;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_client::ApiClient;
use labora_core::config::core_config_from_env_values;
use labora_core::{
    CategoryFilter, EmailAddress, FilteredMaterials, MaterialCard, MaterialListView, MaterialStats,
    Secret, SessionContext, UnknownTagOrder, delete_prompt, is_confirmation,
};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

const HELP: &str = "\
Ketik untuk mencari nama material. Perintah:
  /category <Semua|Diet|Otot|Jantung|Diabetes>
  /mine         hanya material saya
  /all          semua material
  /stats        ringkasan
  /delete <id>  hapus material
  /quit";

/// One line of dashboard input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Search(String),
    Category(String),
    Mine,
    All,
    Stats,
    Delete(String),
    Help,
    Quit,
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Search(line.to_string());
    };
    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((command, ""));
    match name {
        "category" | "kategori" => Input::Category(arg.to_string()),
        "mine" => Input::Mine,
        "all" => Input::All,
        "stats" => Input::Stats,
        "delete" | "hapus" if !arg.is_empty() => Input::Delete(arg.to_string()),
        "quit" | "exit" => Input::Quit,
        _ => Input::Help,
    }
}

fn render_pass(pass: &FilteredMaterials) -> String {
    let mut out = format!(
        "== {} material (cari: \"{}\", kategori: {}) ==",
        pass.materials.len(),
        pass.query.search_term.trim(),
        pass.query.category
    );
    for material in &pass.materials {
        out.push_str("\n\n");
        out.push_str(&MaterialCard::new(material, UnknownTagOrder::default()).to_string());
    }
    out
}

fn render_stats(stats: &MaterialStats) -> String {
    format!(
        "Total material: {} | Material saya: {} | Baru: {} | Kategori: {}",
        stats.total_materials, stats.my_materials, stats.new_materials, stats.total_material_category
    )
}

/// Logs in with LABORA_EMAIL/LABORA_PASSWORD, or falls back to LABORA_TOKEN.
async fn sign_in(client: &ApiClient) -> anyhow::Result<SessionContext> {
    let mut session = SessionContext::new();
    match (std::env::var("LABORA_EMAIL"), std::env::var("LABORA_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            let email = EmailAddress::parse(&email)?;
            let user = client.login(&email, &Secret::new(password)).await?;
            session.begin(user);
        }
        _ => {
            let token = std::env::var("LABORA_TOKEN")
                .context("set LABORA_EMAIL and LABORA_PASSWORD, or LABORA_TOKEN")?;
            session = SessionContext::from_token(token);
            if !session.is_authenticated() {
                anyhow::bail!("LABORA_TOKEN is empty");
            }
        }
    }
    Ok(session)
}

async fn load_materials(
    client: &ApiClient,
    session: &SessionContext,
    view: &mut MaterialListView,
    mine: bool,
) {
    let fetch = async {
        if mine {
            client.my_materials(session).await
        } else {
            client.list_materials(session).await
        }
    };
    match view.guard(fetch).await {
        Some(Ok(materials)) => view.replace_materials(materials),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "failed to load materials");
            eprintln!("{}", e.user_message());
        }
        None => tracing::debug!("view torn down before materials arrived"),
    }
}

/// Interactive Labora dashboard.
///
/// Signs in, loads materials and statistics concurrently and then re-renders the debounced
/// card list as search terms and category selections arrive on stdin.
///
/// # Environment Variables
/// - `LABORA_API_URL`: backend base URL (default: "http://localhost:5000")
/// - `LABORA_DEBOUNCE_MS`: filter quiet period in milliseconds (default: 300)
/// - `LABORA_REQUEST_TIMEOUT_SECS`: per-request timeout (default: 30)
/// - `LABORA_EMAIL`/`LABORA_PASSWORD` or `LABORA_TOKEN`: credentials
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("labora=info".parse()?)
                .add_directive("api_client=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run());
    // A blocking stdin read cannot be cancelled; do not wait for it on exit.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn run() -> anyhow::Result<()> {
    let config = Arc::new(core_config_from_env_values(
        std::env::var("LABORA_API_URL").ok(),
        std::env::var("LABORA_DEBOUNCE_MS").ok(),
        std::env::var("LABORA_REQUEST_TIMEOUT_SECS").ok(),
    )?);
    tracing::info!("++ Labora dashboard against {}", config.api_base_url());

    let client = ApiClient::new(config.clone())?;
    let mut session = sign_in(&client).await?;
    println!("Selamat datang, {}!", session.display_name());

    let shutdown = CancellationToken::new();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "cannot listen for ctrl-c");
                    return;
                }
                tracing::info!("interrupted");
                interrupt.cancel();
            }
            _ = interrupt.cancelled() => {}
        }
    });

    let mut view =
        MaterialListView::with_cancellation(config.debounce_quiet_period(), shutdown.child_token());

    let mut passes = view.subscribe();
    let printer = tokio::spawn(async move {
        while passes.changed().await.is_ok() {
            let pass = passes.borrow_and_update().clone();
            println!("\n{}", render_pass(&pass));
        }
    });

    let (materials, stats) = tokio::join!(
        view.guard(client.list_materials(&session)),
        view.guard(client.material_stats(&session)),
    );
    match stats {
        Some(Ok(stats)) => println!("{}", render_stats(&stats)),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "failed to load stats");
            eprintln!("{}", e.user_message());
        }
        None => {}
    }
    match materials {
        Some(Ok(materials)) => view.replace_materials(materials),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "failed to load materials");
            eprintln!("{}", e.user_message());
        }
        None => {}
    }
    if !view.is_torn_down() {
        println!("{HELP}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending_delete: Option<String> = None;
    while !view.is_torn_down() {
        let line = tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };

        if let Some(id) = pending_delete.take() {
            if !is_confirmation(&line) {
                println!("Penghapusan dibatalkan.");
                continue;
            }
            match view.guard(client.delete_material(&session, &id)).await {
                Some(Ok(())) => {
                    view.remove_material(&id);
                    println!("Material {id} dihapus.");
                }
                Some(Err(e)) => eprintln!("{}", e.user_message()),
                None => break,
            }
            continue;
        }

        match parse_input(&line) {
            Input::Quit => break,
            Input::Search(term) => view.set_search_term(term),
            Input::Category(raw) => match raw.parse::<CategoryFilter>() {
                Ok(category) => view.set_category(category),
                Err(e) => eprintln!("{e}"),
            },
            Input::Mine => load_materials(&client, &session, &mut view, true).await,
            Input::All => load_materials(&client, &session, &mut view, false).await,
            Input::Stats => match view.guard(client.material_stats(&session)).await {
                Some(Ok(stats)) => println!("{}", render_stats(&stats)),
                Some(Err(e)) => eprintln!("{}", e.user_message()),
                None => break,
            },
            Input::Delete(id) => {
                let name = view
                    .materials()
                    .iter()
                    .find(|m| m.id == id)
                    .map(|m| m.name.as_str());
                print!("{}", delete_prompt(&id, name));
                std::io::stdout().flush()?;
                pending_delete = Some(id);
            }
            Input::Help => println!("{HELP}"),
        }
    }

    shutdown.cancel();
    drop(view);
    printer.await?;
    session.end();
    tracing::info!("dashboard closed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use labora_core::{FilterQuery, Material};

    #[test]
    fn plain_lines_are_search_terms() {
        assert_eq!(parse_input("tempe"), Input::Search("tempe".into()));
        assert_eq!(parse_input(""), Input::Search(String::new()));
    }

    #[test]
    fn slash_commands_are_recognised() {
        assert_eq!(parse_input("/category Otot"), Input::Category("Otot".into()));
        assert_eq!(parse_input("/kategori  Jantung "), Input::Category("Jantung".into()));
        assert_eq!(parse_input("/mine"), Input::Mine);
        assert_eq!(parse_input("/delete 12"), Input::Delete("12".into()));
        assert_eq!(parse_input("/delete"), Input::Help);
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("/unknown"), Input::Help);
    }

    #[test]
    fn pass_renders_header_and_cards() {
        let mut tahu = Material::named("2", "Tahu");
        tahu.categories = vec!["muscle".into()];
        let pass = FilteredMaterials {
            generation: 1,
            query: FilterQuery::new("ta", CategoryFilter::All),
            materials: vec![tahu],
        };
        let text = render_pass(&pass);
        assert!(text.starts_with("== 1 material (cari: \"ta\", kategori: Semua) =="));
        assert!(text.contains("Tahu [2]"));
    }
}
