use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use html2pdf_client::config::{DEFAULT_HOST, DEFAULT_HTTP_PORT, DEFAULT_HTTPS_PORT};
use html2pdf_client::{
    Client, ClientConfigBuilder, ContentSource, ConversionError, ErrorKind, OutputFormat,
};

/// Convert HTML, web pages and local files to PDF or images with a remote
/// conversion service.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// URL, local file, or HTML markup with --html.
    #[arg(required_unless_present = "tokens")]
    source: Option<String>,

    /// Account name.
    #[arg(long, env = "HTML2PDF_USERNAME")]
    username: String,

    /// API key.
    #[arg(long, env = "HTML2PDF_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Write output to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Treat SOURCE as HTML markup.
    #[arg(long)]
    html: bool,

    /// Produce an image instead of a PDF.
    #[arg(long)]
    image: bool,

    /// Print the remaining token balance and exit.
    #[arg(long)]
    tokens: bool,

    /// Service host.
    #[arg(long, env = "HTML2PDF_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Plain-HTTP port.
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT)]
    http_port: u16,

    /// HTTPS port.
    #[arg(long, default_value_t = DEFAULT_HTTPS_PORT)]
    https_port: u16,

    /// Use HTTPS.
    #[arg(long)]
    ssl: bool,

    /// Skip certificate verification.
    #[arg(long)]
    insecure: bool,

    /// Port tried once when the primary port can't be reached.
    #[arg(long, value_name = "PORT")]
    fallback_port: Option<u16>,

    /// Connect/read timeout in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    timeout: u64,

    /// Page width, e.g. 210mm or 8.5in.
    #[arg(long, value_name = "LENGTH")]
    page_width: Option<String>,

    /// Page height, or -1 for a single page as tall as the content.
    #[arg(long, value_name = "LENGTH")]
    page_height: Option<String>,

    /// Plain-text footer (%p page, %n page count, %u URL).
    #[arg(long, value_name = "TEXT")]
    footer: Option<String>,

    /// Document author.
    #[arg(long)]
    author: Option<String>,
}

fn build_client(cli: &Cli) -> Result<Client, ConversionError> {
    let mut builder = ClientConfigBuilder::new()
        .credentials(cli.username.as_str(), cli.api_key.as_str())
        .host(cli.host.as_str())
        .http_port(cli.http_port)
        .https_port(cli.https_port)
        .use_ssl(cli.ssl)
        .insecure(cli.insecure)
        .timeout(Duration::from_secs(cli.timeout))
        .output_format(if cli.image {
            OutputFormat::Image
        } else {
            OutputFormat::Pdf
        });

    if let Some(port) = cli.fallback_port {
        builder = builder.fallback_port(port);
    }

    let mut client = Client::with_config(builder.build()?);
    let options = client.options_mut();

    if let Some(width) = &cli.page_width {
        options.set_page_width(width)?;
    }
    if let Some(height) = &cli.page_height {
        options.set_page_height(height)?;
    }
    if let Some(footer) = &cli.footer {
        options.set_footer_text(footer.as_str());
    }
    if let Some(author) = &cli.author {
        options.set_author(author.as_str());
    }

    Ok(client)
}

fn source_of(cli: &Cli, raw: &str) -> Result<ContentSource, ConversionError> {
    if cli.html {
        return ContentSource::html(raw);
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return ContentSource::uri(raw);
    }
    ContentSource::file(raw)
}

fn run(cli: &Cli) -> Result<(), ConversionError> {
    let client = build_client(cli)?;

    if cli.tokens {
        println!("{}", client.num_tokens()?);
        return Ok(());
    }

    let raw = cli
        .source
        .as_deref()
        .ok_or_else(|| ConversionError::usage("SOURCE is required"))?;
    let source = source_of(cli, raw)?;

    match &cli.output {
        Some(path) => {
            client.convert_to_path(&source, path)?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            client.convert(&source, &mut lock)?;
            lock.flush()
                .map_err(|e| ConversionError::io(format!("stdout: {}", e)))?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            if !e.documentation_link().is_empty() {
                eprintln!("documentation: {}", e.documentation_link());
            }
            match e.kind() {
                ErrorKind::Usage => ExitCode::from(2),
                _ => ExitCode::from(1),
            }
        }
    }
}
