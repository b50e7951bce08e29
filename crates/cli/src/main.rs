//! CLI tool for editing, previewing and exporting Showcase Gallery presentations.

mod fetch;
mod storage;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fetch::HttpFetcher;
use showcase_core::export::{ExportOptions, FontProvider};
use showcase_core::viewer::ModuleCard;
use showcase_core::{
    EditCommand, Editor, Exporter, FeatureEdit, ImageTarget, ImageUpload, Key, ModuleColor,
    ModuleIcon, PresentationConfig, PresentationStore, Screen, SessionGate, Settings, Viewer,
};
use showcase_render::loader::encode_data_uri;
use showcase_render::{EmbeddedImageLoader, SvgRenderer, WebFontProvider, ZipDocument};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use storage::FileStorage;

/// Edit, preview and export a Showcase Gallery presentation.
#[derive(Parser, Debug)]
#[command(name = "showcase")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the stored presentation
    #[arg(short, long, default_value = ".showcase")]
    data_dir: PathBuf,

    /// Settings as a JSON object (missing fields keep their defaults)
    #[arg(short, long)]
    settings: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the presentation
    Show {
        /// Print the stored JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Load the stored presentation, upgrade it and write it back
    Migrate,

    /// Start an admin session for the current shell
    ///
    /// The session flag is kept under the system temp directory, keyed by the
    /// parent shell's process id and the data directory. It does not carry
    /// over to other terminals and ends with `showcase logout`.
    Login {
        #[arg(short, long)]
        password: String,
    },

    /// End the admin session
    Logout,

    /// Apply an edit (requires an admin session or --password)
    Edit {
        /// Password for a one-off session
        #[arg(short, long)]
        password: Option<String>,

        #[command(subcommand)]
        edit: EditArgs,
    },

    /// Walk the viewer with a sequence of keys and print each page
    Navigate {
        /// Comma-separated keys: up, down
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,
    },

    /// Export the presentation to a paginated document
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Add the statement slide after the intro
        #[arg(long)]
        include_statement: bool,

        /// Directory to resolve site-relative image paths against
        #[arg(long)]
        assets_dir: Option<PathBuf>,

        /// Do not download remote images or the web font
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Subcommand, Debug)]
enum EditArgs {
    IntroTitle { value: String },
    IntroSubtitle { value: String },
    /// Image file or reference for the intro hero image
    HeroImage { source: String },
    StatementTitle { value: String },
    StatementDescription { value: String },
    ThankYouTitle { value: String },
    ThankYouDescription { value: String },
    ModuleName { module: usize, name: String },
    /// Palette token such as bg-blue-500
    ModuleColor { module: usize, color: String },
    /// Icon name such as BarChart3
    ModuleIcon { module: usize, icon: String },
    ToggleModule { module: usize },
    AddFeature { module: usize },
    RemoveFeature { module: usize, feature: usize },
    FeatureTitle { module: usize, feature: usize, value: String },
    /// Rich-text HTML description
    FeatureDescription { module: usize, feature: usize, value: String },
    FeatureBeta { module: usize, feature: usize, beta: bool },
    /// Image file or reference for a feature
    FeatureImage { module: usize, feature: usize, source: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let settings = match &args.settings {
        Some(json) => Settings::from_json(json).context("Invalid --settings JSON")?,
        None => Settings::default(),
    };

    let mut store = PresentationStore::with_key(
        FileStorage::new(&args.data_dir),
        settings.config_key.clone(),
    );
    let config = store.load();

    match args.command {
        Command::Show { json } => {
            if json {
                println!("{}", store.persisted_json()?);
            } else {
                print!("{}", summarize(&config));
            }
        }
        Command::Migrate => {
            if let Some(report) = store.last_migration() {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            store.update(|c| c.clone())?;
            println!("Saved to {}", store.storage().path_for(&settings.config_key).display());
        }
        Command::Login { password } => {
            let mut gate = open_gate(&args.data_dir, &settings);
            if !gate.authenticate(&password) {
                bail!(showcase_core::session::INVALID_PASSWORD_MESSAGE);
            }
            println!("Signed in");
        }
        Command::Logout => {
            open_gate(&args.data_dir, &settings).logout();
            println!("Signed out");
        }
        Command::Edit { password, edit } => {
            let mut gate = open_gate(&args.data_dir, &settings);
            let authorized = gate.mount()
                || password
                    .as_deref()
                    .map(|p| gate.authenticate(p))
                    .unwrap_or(false);
            if !authorized {
                bail!("Not signed in. Run `showcase login` or pass --password.");
            }

            let mut editor = Editor::new();
            let updated = match upload_for(&edit)? {
                Some((target, upload)) => editor.upload(&mut store, target, upload),
                None => editor.apply(&mut store, &edit_command(&edit)?),
            };
            if let Err(e) = updated {
                bail!(editor.message().map(str::to_string).unwrap_or_else(|| e.to_string()));
            }
            log::info!("Applied {:?}", edit);
        }
        Command::Navigate { keys } => {
            let keys = parse_keys(&keys)?;
            for line in walk(&config, &settings, &keys) {
                println!("{}", line);
            }
        }
        Command::Export {
            output,
            include_statement,
            assets_dir,
            offline,
        } => {
            export(
                &config,
                &settings,
                &output,
                include_statement,
                assets_dir,
                offline,
            )?;
        }
    }

    Ok(())
}

fn open_gate(data_dir: &Path, settings: &Settings) -> SessionGate<FileStorage> {
    SessionGate::with_secret(
        FileStorage::new(session_dir(data_dir)),
        settings.session_key.clone(),
        settings.secret.clone(),
    )
}

/// Directory for the admin session flag of `data_dir` in the current shell.
fn session_dir(data_dir: &Path) -> PathBuf {
    let data_dir = data_dir
        .canonicalize()
        .unwrap_or_else(|_| data_dir.to_path_buf());
    let mut hasher = DefaultHasher::new();
    data_dir.hash(&mut hasher);
    let scope = format!("{:016x}", hasher.finish());

    #[cfg(unix)]
    let scope = format!("{}-{}", std::os::unix::process::parent_id(), scope);

    std::env::temp_dir().join(format!("showcase-session-{}", scope))
}

/// Translate a non-image edit into a command.
fn edit_command(edit: &EditArgs) -> Result<EditCommand> {
    let feature_edit = |module: usize, feature: usize, edit: FeatureEdit| {
        EditCommand::UpdateFeature {
            module,
            feature,
            edit,
        }
    };

    Ok(match edit {
        EditArgs::IntroTitle { value } => EditCommand::SetIntroTitle(value.clone()),
        EditArgs::IntroSubtitle { value } => EditCommand::SetIntroSubtitle(value.clone()),
        EditArgs::HeroImage { source } => EditCommand::SetHeroImage(source.clone()),
        EditArgs::StatementTitle { value } => EditCommand::SetStatementTitle(value.clone()),
        EditArgs::StatementDescription { value } => {
            EditCommand::SetStatementDescription(value.clone())
        }
        EditArgs::ThankYouTitle { value } => EditCommand::SetThankYouTitle(value.clone()),
        EditArgs::ThankYouDescription { value } => {
            EditCommand::SetThankYouDescription(value.clone())
        }
        EditArgs::ModuleName { module, name } => EditCommand::SetModuleName {
            module: *module,
            name: name.clone(),
        },
        EditArgs::ModuleColor { module, color } => {
            let parsed = ModuleColor::from_token(color);
            if parsed.token() != color.as_str() {
                bail!("Unknown color '{}'", color);
            }
            EditCommand::SetModuleColor {
                module: *module,
                color: parsed,
            }
        }
        EditArgs::ModuleIcon { module, icon } => {
            let parsed = ModuleIcon::from_name(icon);
            if parsed.name() != icon.as_str() {
                bail!("Unknown icon '{}'", icon);
            }
            EditCommand::SetModuleIcon {
                module: *module,
                icon: parsed,
            }
        }
        EditArgs::ToggleModule { module } => EditCommand::ToggleModuleVisibility { module: *module },
        EditArgs::AddFeature { module } => EditCommand::AddFeature { module: *module },
        EditArgs::RemoveFeature { module, feature } => EditCommand::RemoveFeature {
            module: *module,
            feature: *feature,
        },
        EditArgs::FeatureTitle {
            module,
            feature,
            value,
        } => feature_edit(*module, *feature, FeatureEdit::SetTitle(value.clone())),
        EditArgs::FeatureDescription {
            module,
            feature,
            value,
        } => feature_edit(*module, *feature, FeatureEdit::SetDescription(value.clone())),
        EditArgs::FeatureBeta {
            module,
            feature,
            beta,
        } => feature_edit(*module, *feature, FeatureEdit::SetBeta(*beta)),
        EditArgs::FeatureImage {
            module,
            feature,
            source,
        } => feature_edit(*module, *feature, FeatureEdit::SetImage(source.clone())),
    })
}

/// Image edits whose source is a local file become validated uploads.
fn upload_for(edit: &EditArgs) -> Result<Option<(ImageTarget, ImageUpload)>> {
    let (target, source) = match edit {
        EditArgs::HeroImage { source } => (ImageTarget::Hero, source),
        EditArgs::FeatureImage {
            module,
            feature,
            source,
        } => (
            ImageTarget::Feature {
                module: *module,
                feature: *feature,
            },
            source,
        ),
        _ => return Ok(None),
    };

    let path = Path::new(source);
    if !path.is_file() {
        return Ok(None);
    }

    let mime_type = mime_for_extension(path);
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    showcase_core::image::validate_upload(mime_type, size)?;

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some((
        target,
        ImageUpload {
            mime_type: mime_type.to_string(),
            size: bytes.len() as u64,
            reference: encode_data_uri(mime_type, &bytes),
        },
    )))
}

fn mime_for_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn parse_keys(keys: &[String]) -> Result<Vec<Key>> {
    keys.iter()
        .map(|k| match k.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            _ => Key::from_dom(k.trim()).ok_or_else(|| anyhow::anyhow!("Unknown key '{}'", k)),
        })
        .collect()
}

/// Drive a viewer through `keys`, letting each page finish loading before
/// the next key. Returns one line per visited page.
fn walk(config: &PresentationConfig, settings: &Settings, keys: &[Key]) -> Vec<String> {
    let timing = settings.timing;
    let settle = timing.module_loading_ms + 1;
    let mut now = 0;
    let mut viewer = Viewer::new(config, now, timing);
    let mut lines = Vec::new();

    let describe = |viewer: &Viewer, now: u64| {
        format!(
            "[{}] {} | {}",
            viewer.navigator().page(),
            viewer.header(config),
            describe_screen(&viewer.screen(config, now))
        )
    };

    lines.push(describe(&viewer, now));
    for key in keys {
        if !viewer.handle_key(*key, config, now) {
            log::debug!("{:?} ignored on page {}", key, viewer.navigator().page());
            continue;
        }
        now += settle;
        viewer.tick(now);
        lines.push(describe(&viewer, now));
    }
    lines
}

fn describe_screen(screen: &Screen) -> String {
    match screen {
        Screen::Intro {
            title,
            subtitle,
            cards,
            ..
        } => {
            let cards = cards
                .as_ref()
                .map(|cards| cards.iter().map(describe_card).collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            format!("{} / {} [{}]", title, subtitle, cards)
        }
        Screen::Statement { title, .. } => format!("Statement: {}", title),
        Screen::ModuleLoading { module_name, .. } => format!("Loading {}", module_name),
        Screen::Feature {
            module_name,
            tabs,
            feature_index,
            title,
            is_beta,
            ..
        } => format!(
            "{} {}/{}: {}{}",
            module_name,
            feature_index + 1,
            tabs.len(),
            title,
            if *is_beta { " (BETA)" } else { "" }
        ),
        Screen::EmptyModule { module_name, .. } => format!("{}: no features", module_name),
        Screen::ThankYou { title, description } => format!("{} / {}", title, description),
    }
}

fn describe_card(card: &ModuleCard) -> String {
    format!("{} ({})", card.name, card.feature_label)
}

fn summarize(config: &PresentationConfig) -> String {
    let mut out = format!("{}\n{}\n\n", config.intro_title, config.intro_subtitle);
    for (index, module) in config.modules.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {} [{}] {} {} ({})\n",
            index,
            module.name,
            if module.visible { "visible" } else { "hidden" },
            module.color.label(),
            module.icon.label(),
            module.feature_count_label()
        ));
        for (i, feature) in module.features.iter().enumerate() {
            out.push_str(&format!(
                "      {}. {}{}\n",
                i,
                feature.title,
                if feature.is_beta { " (BETA)" } else { "" }
            ));
        }
    }
    out.push_str(&format!(
        "\n{}\n{}\n",
        config.thank_you_title, config.thank_you_description
    ));
    out
}

fn export(
    config: &PresentationConfig,
    settings: &Settings,
    output: &Path,
    include_statement: bool,
    assets_dir: Option<PathBuf>,
    offline: bool,
) -> Result<()> {
    let options = ExportOptions {
        include_statement: include_statement || settings.export.include_statement,
    };
    let exporter = Exporter::new(settings.export).with_options(options);

    let mut loader = EmbeddedImageLoader::new();
    if let Some(dir) = assets_dir {
        loader = loader.with_assets_dir(dir);
    }
    let mut renderer = SvgRenderer::new();
    let mut fonts = None;

    if !offline {
        let fetcher = HttpFetcher::new()?;
        loader = loader.with_fetcher(fetcher.clone());
        let mut provider = WebFontProvider::new(fetcher);
        if let Ok(face) = provider.load_face() {
            renderer = renderer.with_font_face(face.clone());
        }
        fonts = Some(provider);
    }

    let result = exporter
        .export(
            config,
            &mut loader,
            &mut renderer,
            &mut ZipDocument::new(),
            fonts.as_mut().map(|p| p as &mut dyn FontProvider),
            |percent| log::info!("Export {:.0}%", percent),
        )
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    let path = output.join(&result.file_name);
    std::fs::write(&path, &result.bytes)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    println!("Exported {} pages to {}", result.page_count, path.display());
    Ok(())
}
