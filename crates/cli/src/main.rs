mod render;

use anyhow::Context;
use api_client::{ApiClient, ImageUpload};
use clap::{Args, Parser, Subcommand};
use labora_core::config::core_config_from_env_values;
use labora_core::constants::MATERIAL_GROUPS;
use labora_core::{
    delete_prompt, filter_materials, is_confirmation, CategoryFilter, CoreConfig, FilterQuery,
    MaterialForm, SessionContext,
};
use labora_types::{EmailAddress, NonEmptyText, Secret};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "labora")]
#[command(about = "Labora food-material nutrition CLI")]
struct Cli {
    /// Bearer token printed by `labora login`
    #[arg(long, env = "LABORA_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as a researcher and print the session token
    Login {
        email: String,
        #[arg(long, env = "LABORA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a researcher account
    Register {
        name: String,
        email: String,
        #[arg(long, env = "LABORA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List materials as cards
    List {
        /// Case-insensitive name search
        #[arg(long, default_value = "")]
        search: String,
        /// Semua, Diet, Otot, Jantung, Diabetes (or a raw tag)
        #[arg(long, default_value = "Semua")]
        category: String,
        /// Only materials created by the signed-in user
        #[arg(long)]
        mine: bool,
    },
    /// Show dashboard counts
    Stats,
    /// Show one material with its nutrient chart legend
    Show { id: String },
    /// Add a material
    Add {
        #[command(flatten)]
        fields: FormArgs,
    },
    /// Edit a material; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: FormArgs,
    },
    /// Delete a material (asks for confirmation)
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List the material groups offered by the forms
    Groups,
}

#[derive(Args)]
struct FormArgs {
    #[arg(long)]
    name: Option<String>,
    /// Test date (YYYY-MM-DD)
    #[arg(long)]
    test_date: Option<String>,
    /// Material group, see `labora groups`
    #[arg(long)]
    group: Option<String>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Nutrient amount as KEY=VALUE, e.g. `--nutrient iron=2.5` (repeatable)
    #[arg(long = "nutrient", value_name = "KEY=VALUE")]
    nutrients: Vec<String>,
    /// Image file (max 5 MiB)
    #[arg(long)]
    image: Option<PathBuf>,
}

impl FormArgs {
    /// Applies the given flags on top of `form`.
    fn apply(&self, form: &mut MaterialForm) -> anyhow::Result<()> {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if let Some(test_date) = &self.test_date {
            form.test_date = test_date.clone();
        }
        if let Some(group) = &self.group {
            if !MATERIAL_GROUPS.contains(&group.as_str()) {
                tracing::warn!(group = %group, "material group is not one of the standard groups");
            }
            form.material_category = group.clone();
        }
        if let Some(source) = &self.source {
            form.source = source.clone();
        }
        if let Some(notes) = &self.notes {
            form.notes = notes.clone();
        }
        for assignment in &self.nutrients {
            form.apply_assignment(assignment).with_context(|| {
                format!("valid nutrient keys: {}", render::nutrient_keys())
            })?;
        }
        Ok(())
    }

    async fn image(&self) -> anyhow::Result<Option<ImageUpload>> {
        match &self.image {
            Some(path) => Ok(Some(ImageUpload::from_path(path).await?)),
            None => Ok(None),
        }
    }
}

fn config_from_env() -> anyhow::Result<CoreConfig> {
    Ok(core_config_from_env_values(
        std::env::var("LABORA_API_URL").ok(),
        std::env::var("LABORA_DEBOUNCE_MS").ok(),
        std::env::var("LABORA_REQUEST_TIMEOUT_SECS").ok(),
    )?)
}

/// Asks whether material `id` should be deleted. End of input declines.
fn confirm_delete(
    id: &str,
    name: Option<&str>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> std::io::Result<bool> {
    write!(output, "{}", delete_prompt(id, name))?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_confirmation(&answer))
}

fn session(token: Option<String>) -> anyhow::Result<SessionContext> {
    let session = SessionContext::from_token(token.unwrap_or_default());
    if !session.is_authenticated() {
        anyhow::bail!("not logged in: run `labora login` and set LABORA_TOKEN (or pass --token)");
    }
    Ok(session)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("labora=warn".parse()?)
                .add_directive("api_client=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(Arc::new(config_from_env()?))?;

    match cli.command {
        Some(Commands::Login { email, password }) => {
            let email = EmailAddress::parse(&email)?;
            let user = client.login(&email, &Secret::new(password)).await?;
            let token = user.token.expose().to_string();
            let mut session = SessionContext::new();
            session.begin(user);
            println!("Selamat datang, {}!", session.display_name());
            println!("export LABORA_TOKEN={token}");
        }
        Some(Commands::Register {
            name,
            email,
            password,
        }) => {
            let name = NonEmptyText::new(&name)?;
            let email = EmailAddress::parse(&email)?;
            client
                .register(&name, &email, &Secret::new(password))
                .await?;
            println!("Registrasi berhasil. Silakan login.");
        }
        Some(Commands::List {
            search,
            category,
            mine,
        }) => {
            let session = session(cli.token)?;
            let category: CategoryFilter = category.parse()?;
            let materials = if mine {
                client.my_materials(&session).await?
            } else {
                client.list_materials(&session).await?
            };
            let visible = filter_materials(&materials, &FilterQuery::new(search, category));
            println!("{}", render::card_list(&visible));
        }
        Some(Commands::Stats) => {
            let session = session(cli.token)?;
            let stats = client.material_stats(&session).await?;
            println!("{}", render::stats(&stats));
        }
        Some(Commands::Show { id }) => {
            let session = session(cli.token)?;
            let material = client.get_material(&session, &id).await?;
            println!("{}", render::detail(&material));
        }
        Some(Commands::Add { fields }) => {
            let session = session(cli.token)?;
            let mut form = MaterialForm::new();
            fields.apply(&mut form)?;
            let validated = form.validate()?;
            let image = fields.image().await?;
            client.create_material(&session, &validated, image).await?;
            println!("Material {} disimpan.", validated.name);
        }
        Some(Commands::Edit { id, fields }) => {
            let session = session(cli.token)?;
            let current = client.get_material(&session, &id).await?;
            let mut form = MaterialForm::from_material(&current);
            fields.apply(&mut form)?;
            let validated = form.validate()?;
            let image = fields.image().await?;
            client
                .update_material(&session, &id, &validated, image)
                .await?;
            println!("Material {} diperbarui.", validated.name);
        }
        Some(Commands::Delete { id, yes }) => {
            let session = session(cli.token)?;
            if !yes {
                let name = match client.get_material(&session, &id).await {
                    Ok(material) => Some(material.name),
                    Err(e) => {
                        tracing::debug!(error = %e, "could not look up material name");
                        None
                    }
                };
                let stdin = std::io::stdin();
                let confirmed = confirm_delete(
                    &id,
                    name.as_deref(),
                    &mut stdin.lock(),
                    &mut std::io::stdout(),
                )?;
                if !confirmed {
                    println!("Penghapusan dibatalkan.");
                    return Ok(());
                }
            }
            client.delete_material(&session, &id).await?;
            println!("Material {id} dihapus.");
        }
        Some(Commands::Groups) => {
            for group in MATERIAL_GROUPS {
                println!("{group}");
            }
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(reply: &str) -> (bool, String) {
        let mut output = Vec::new();
        let confirmed =
            confirm_delete("7", Some("Tempe"), &mut Cursor::new(reply), &mut output).unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn delete_proceeds_only_on_yes() {
        let (confirmed, prompt) = answer("y\n");
        assert!(confirmed);
        assert!(prompt.contains("\"Tempe\" [7]"));

        assert!(answer("Ya\n").0);
        assert!(!answer("n\n").0);
        assert!(!answer("\n").0);
    }

    #[test]
    fn end_of_input_declines() {
        assert!(!answer("").0);
    }

    #[test]
    fn yes_flag_parses() {
        let cli = Cli::try_parse_from(["labora", "delete", "7", "--yes"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Delete { yes: true, .. })));
        let cli = Cli::try_parse_from(["labora", "delete", "7"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Delete { yes: false, .. })));
    }
}
