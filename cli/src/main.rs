use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use posts_core::{ClientConfig, PageRequest, PostPatch, ResourceClient};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// posts - command-line client for the JSONPlaceholder posts API
///
/// Every command prints JSON on stdout. Logs go to stderr and follow RUST_LOG.
///
/// Examples:
///   posts get 1
///   posts list --limit 10 --offset 20
///   posts create --title "Hello" --body "World" --user-id 1
///   posts patch 1 --field title=Renamed
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the API [env: JSONPLACEHOLDER_BASE_URL]
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds [env: JSONPLACEHOLDER_TIMEOUT_SECS]
    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    timeout_secs: Option<u64>,

    /// Page size used when a list command sets no limit [env: JSONPLACEHOLDER_PAGE_SIZE]
    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        global = true
    )]
    page_size: Option<u32>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch one post
    Get { id: u64 },

    /// List posts by offset/limit, or by page number with --page
    List(ListArgs),

    /// Create a post unless an identical one already exists
    Create(PostArgs),

    /// Replace every field of a post
    Update {
        id: u64,
        #[command(flatten)]
        post: PostArgs,
    },

    /// Change only the given fields of a post
    Patch(PatchArgs),

    /// Delete a post; deleting a missing post succeeds
    Delete { id: u64 },
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    #[arg(long)]
    limit: Option<u32>,

    #[arg(long, conflicts_with = "page")]
    offset: Option<u32>,

    /// 1-based page number; prints a {page, limit, posts} envelope
    #[arg(long)]
    page: Option<u32>,
}

#[derive(clap::Args, Debug)]
struct PostArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    body: String,

    #[arg(long)]
    user_id: u64,
}

#[derive(clap::Args, Debug)]
struct PatchArgs {
    id: u64,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    body: Option<String>,

    #[arg(long)]
    user_id: Option<u64>,

    /// Raw field assignment such as `userId=3`; `userId` is read as an
    /// integer, every other field as plain text
    #[arg(long = "field", value_name = "NAME=VALUE")]
    fields: Vec<String>,
}

impl PatchArgs {
    fn to_patch(&self) -> Result<PostPatch> {
        let raw = self
            .fields
            .iter()
            .map(|f| parse_field(f))
            .collect::<Result<Vec<_>>>()?;
        let mut patch = PostPatch::from_fields(raw)?;
        if let Some(title) = &self.title {
            patch = patch.title(title.clone());
        }
        if let Some(body) = &self.body {
            patch = patch.body(body.clone());
        }
        if let Some(user_id) = self.user_id {
            patch = patch.user_id(user_id);
        }
        Ok(patch)
    }
}

fn parse_field(raw: &str) -> Result<(String, serde_json::Value)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected NAME=VALUE, got {raw:?}");
    };
    let value = match (name, value.parse::<u64>()) {
        ("userId", Ok(n)) => serde_json::Value::from(n),
        _ => serde_json::Value::String(value.to_string()),
    };
    Ok((name.to_string(), value))
}

impl Cli {
    /// Environment first, then flags on top.
    fn config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env().context("invalid JSONPLACEHOLDER_* environment")?;
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(size) = self.page_size {
            config = config.with_default_page_size(size);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ResourceClient::new(&cli.config()?);
    let mut out = std::io::stdout().lock();
    run(&client, cli.command, &mut out)
}

fn run(client: &ResourceClient, command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Get { id } => {
            let post = client.get_post(id).with_context(|| format!("failed to get post {id}"))?;
            print_json(out, &post)
        }
        Commands::List(args) => match args.page {
            Some(page) => {
                let page = client.list_page(page, args.limit).context("failed to list posts")?;
                print_json(out, &page)
            }
            None => {
                let request = PageRequest {
                    limit: args.limit,
                    offset: args.offset,
                };
                let posts = client.list_posts(request).context("failed to list posts")?;
                print_json(out, &posts)
            }
        },
        Commands::Create(args) => {
            let post = client
                .create_post(&args.title, &args.body, args.user_id)
                .context("failed to create post")?;
            print_json(out, &post)
        }
        Commands::Update { id, post } => {
            let post = client
                .update_post_full(id, &post.title, &post.body, post.user_id)
                .with_context(|| format!("failed to update post {id}"))?;
            print_json(out, &post)
        }
        Commands::Patch(args) => {
            let patch = args.to_patch()?;
            let post = client
                .update_post_partial(args.id, &patch)
                .with_context(|| format!("failed to patch post {}", args.id))?;
            print_json(out, &post)
        }
        Commands::Delete { id } => {
            client.delete_post(id).with_context(|| format!("failed to delete post {id}"))?;
            print_json(out, &serde_json::json!({ "deleted": id }))
        }
    }
}

fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to encode output")?;
    writeln!(out).context("failed to write output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_get_parsing() {
        let cli = Cli::try_parse_from(["posts", "get", "7"]).unwrap();
        assert!(matches!(cli.command, Commands::Get { id: 7 }));
        assert_eq!(cli.timeout_secs, None);
        assert_eq!(cli.base_url, None);
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "posts",
            "--base-url",
            "http://127.0.0.1:3000",
            "list",
            "--limit",
            "5",
            "--timeout-secs",
            "2",
        ])
        .unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.timeout, Duration::from_secs(2));
        match cli.command {
            Commands::List(args) => assert_eq!(args.limit, Some(5)),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["posts", "--timeout-secs", "0", "get", "1"]).is_err());
    }

    #[test]
    fn test_cli_page_conflicts_with_offset() {
        assert!(Cli::try_parse_from(["posts", "list", "--page", "2", "--offset", "3"]).is_err());
    }

    #[test]
    fn test_cli_create_requires_all_fields() {
        assert!(Cli::try_parse_from(["posts", "create", "--title", "t"]).is_err());
    }

    #[test]
    fn test_patch_fields_merge_with_flags() {
        let cli = Cli::try_parse_from([
            "posts", "patch", "3", "--field", "userId=4", "--field", "body=plain text", "--title", "T",
        ])
        .unwrap();
        let Commands::Patch(args) = cli.command else {
            panic!("Expected Patch command");
        };
        let patch = args.to_patch().unwrap();
        assert_eq!(patch, PostPatch::new().title("T").body("plain text").user_id(4));
    }

    #[test]
    fn test_patch_unknown_field_rejected() {
        let cli = Cli::try_parse_from(["posts", "patch", "3", "--field", "author=me"]).unwrap();
        let Commands::Patch(args) = cli.command else {
            panic!("Expected Patch command");
        };
        assert!(args.to_patch().is_err());
    }

    #[test]
    fn test_patch_text_fields_stay_strings() {
        let cli = Cli::try_parse_from([
            "posts", "patch", "3", "--field", "title=2024", "--field", "body=true",
        ])
        .unwrap();
        let Commands::Patch(args) = cli.command else {
            panic!("Expected Patch command");
        };
        let patch = args.to_patch().unwrap();
        assert_eq!(patch, PostPatch::new().title("2024").body("true"));
        assert_eq!(
            parse_field("title=null").unwrap().1,
            serde_json::Value::String("null".to_string())
        );
    }

    #[test]
    fn test_patch_non_numeric_user_id_rejected() {
        let cli = Cli::try_parse_from(["posts", "patch", "3", "--field", "userId=abc"]).unwrap();
        let Commands::Patch(args) = cli.command else {
            panic!("Expected Patch command");
        };
        assert!(args.to_patch().is_err());
    }

    #[test]
    fn test_parse_field_requires_equals() {
        assert!(parse_field("title").is_err());
        assert_eq!(
            parse_field("title=a=b").unwrap(),
            ("title".to_string(), serde_json::Value::String("a=b".to_string()))
        );
    }
}
