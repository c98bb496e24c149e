use clap::{Parser, Subcommand};
use convert_pro::core::tools::tool_for;
use convert_pro::core::uploader::{SelectedFile, UploadState};
use convert_pro::core::ConversionCategory;
use convert_pro::utils::logger;
use convert_pro::utils::validation::{validate_output_dir, validate_url};
use convert_pro::{HttpConvertClient, LocalStorage, UploadForm};
use std::path::Path;

#[derive(Parser)]
#[command(name = "convert-client")]
#[command(about = "Upload files to a convert-pro server and download the results")]
struct Args {
    /// Base URL of the server
    #[arg(long, default_value = "http://127.0.0.1:3000", env = "CONVERT_PRO_SERVER")]
    server: String,

    /// Access token for the account
    #[arg(long, env = "CONVERT_PRO_TOKEN")]
    token: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a file and save it as converted.<format>
    Convert {
        /// File to upload
        #[arg(short, long)]
        file: String,

        /// Output format, e.g. PDF or PNG
        #[arg(long)]
        format: String,

        /// documents, images or media
        #[arg(long, default_value = "documents")]
        category: String,

        /// Directory for the converted file
        #[arg(short, long, default_value = "./downloads")]
        out_dir: String,
    },
    /// Show the 10 most recent conversions
    History,
    /// List subscription plans
    Plans,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    validate_url("server", &args.server)?;
    let client = HttpConvertClient::new(&args.server, args.token.clone())?;

    match args.command {
        Command::Convert {
            file,
            format,
            category,
            out_dir,
        } => {
            validate_output_dir("out_dir", &out_dir)?;
            let category = ConversionCategory::parse(&category).unwrap_or_default();
            let tool = tool_for(category);
            if !tool.offers_output(&format) {
                tracing::warn!(
                    "⚠️ {} is not offered for {} (choose from {})",
                    format,
                    category,
                    tool.output_formats.join(", ")
                );
            }

            let entitlement = client.entitlement().await.map_err(|e| {
                eprintln!("❌ {}", e.user_friendly_message());
                e
            })?;
            tracing::info!(
                "📋 Plan: {} (max {} bytes)",
                entitlement.plan,
                entitlement.max_file_bytes
            );

            let data = tokio::fs::read(&file).await?;
            let name = Path::new(&file)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.clone());

            let storage = LocalStorage::new(out_dir);
            let mut form = UploadForm::new(client, storage, category, entitlement.is_premium);

            if !form.select_file(SelectedFile {
                name,
                content_type: guess_content_type(&file).map(str::to_string),
                data,
            }) {
                eprintln!("❌ {}", form.error().unwrap_or("File rejected"));
                std::process::exit(1);
            }
            form.select_output_format(format);

            let state = form.submit().await.clone();
            match state {
                UploadState::Succeeded { saved_as } => {
                    println!("✅ Conversion completed!");
                    println!("📁 Output saved to: {}", saved_as);
                }
                UploadState::Failed { message } => {
                    eprintln!("❌ {}", message);
                    std::process::exit(2);
                }
                UploadState::Idle | UploadState::Submitting => {
                    eprintln!("❌ {}", form.error().unwrap_or("Nothing was submitted"));
                    std::process::exit(1);
                }
            }
        }
        Command::History => {
            let view = client.history().await?;
            if !view.authenticated {
                println!("Sign in (--token) to see your conversions.");
            } else if view.is_empty() {
                println!("No conversions yet. Start converting files to see your history!");
            } else {
                println!("Recent Conversions");
                for entry in view.conversions {
                    println!(
                        "  {:<40} {:<10} {}",
                        entry.file_name, entry.conversion_type, entry.relative_date
                    );
                }
            }
        }
        Command::Plans => {
            let plans = client.plans().await?;
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }
    }

    Ok(())
}

fn guess_content_type(path: &str) -> Option<&'static str> {
    let extension = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "odt" => "application/vnd.oasis.opendocument.text",
        "rtf" => "application/rtf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "flac" => "audio/flac",
        _ => return None,
    };
    Some(content_type)
}
