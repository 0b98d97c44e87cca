use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::cli::config;
use crate::cli::utils::{output_success, ApiClient};
use crate::cli::OutputFormat;
use crate::database::models::{PostBody, UserBody};

#[derive(Subcommand)]
pub enum PostCommands {
    #[command(about = "Upload an image as a new post")]
    Create {
        #[arg(help = "Path to the image file")]
        file: PathBuf,
        #[arg(long, default_value = "", help = "Caption for the post")]
        caption: String,
    },

    #[command(about = "Delete one of your posts")]
    Delete {
        #[arg(help = "Post id")]
        id: String,
    },

    #[command(about = "List your posts (cached snapshot unless --refresh)")]
    List {
        #[arg(long, help = "Re-fetch the snapshot from the server first")]
        refresh: bool,
    },

    #[command(about = "Search your posts by caption")]
    Search {
        #[arg(help = "Case-insensitive caption substring")]
        text: String,
        #[arg(long, help = "Re-fetch the snapshot from the server first")]
        refresh: bool,
    },
}

pub async fn handle(
    cmd: PostCommands,
    server: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let state = config::load_session()?;
    let server = config::resolve_server(server, &state);
    let client = ApiClient::new(&server, state.token.clone());

    match cmd {
        PostCommands::Create { file, caption } => {
            let bytes = tokio::fs::read(&file).await?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());

            let form = reqwest::multipart::Form::new()
                .text("caption", caption)
                .part(
                    "image",
                    reqwest::multipart::Part::bytes(bytes).file_name(file_name),
                );

            client.post_multipart("/api/v1/post/create", form).await?;

            // Mutation succeeded: the cached snapshot is stale, re-fetch it
            let user = refresh_snapshot(&client).await?;

            output_success(
                &output_format,
                &format!("Post created ({} total)", user.posts.len()),
                Some(json!({ "posts": user.posts })),
            )
        }

        PostCommands::Delete { id } => {
            client.delete(&format!("/api/v1/post/{}", id)).await?;

            let user = refresh_snapshot(&client).await?;

            output_success(
                &output_format,
                &format!("Post deleted ({} remaining)", user.posts.len()),
                Some(json!({ "posts": user.posts })),
            )
        }

        PostCommands::List { refresh } => {
            let user = snapshot(&client, refresh).await?;
            render_posts(&output_format, &user.posts)
        }

        PostCommands::Search { text, refresh } => {
            let user = snapshot(&client, refresh).await?;
            let matches: Vec<PostBody> =
                filter_posts(&user.posts, &text).into_iter().cloned().collect();
            render_posts(&output_format, &matches)
        }
    }
}

/// GET /me and replace the cached snapshot with the fresh user body.
async fn refresh_snapshot(client: &ApiClient) -> anyhow::Result<UserBody> {
    let body = client.get("/api/v1/me").await?;
    let user: UserBody = serde_json::from_value(body["data"].clone())?;
    config::save_cached_user(&user)?;
    Ok(user)
}

/// Cached snapshot, or a fresh one when asked for (or when nothing is
/// cached yet).
async fn snapshot(client: &ApiClient, refresh: bool) -> anyhow::Result<UserBody> {
    if !refresh {
        if let Some(user) = config::load_cached_user()? {
            return Ok(user);
        }
    }
    refresh_snapshot(client).await
}

/// Case-insensitive caption substring filter, the same narrowing the web
/// UI's search box applies to the loaded post list.
pub fn filter_posts<'a>(posts: &'a [PostBody], query: &str) -> Vec<&'a PostBody> {
    let needle = query.to_lowercase();
    posts
        .iter()
        .filter(|post| post.caption.to_lowercase().contains(&needle))
        .collect()
}

fn render_posts(output_format: &OutputFormat, posts: &[PostBody]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "posts": posts }))?);
        }
        OutputFormat::Text => {
            if posts.is_empty() {
                println!("No posts");
                return Ok(());
            }
            for post in posts {
                let caption = if post.caption.is_empty() {
                    "(no caption)"
                } else {
                    &post.caption
                };
                println!("{}  {}  {}", post.id, post.created_at.to_rfc3339(), caption);
                println!("    {}", post.image.url);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::ImageRef;
    use chrono::Utc;
    use uuid::Uuid;

    fn post(caption: &str) -> PostBody {
        PostBody {
            id: Uuid::new_v4(),
            caption: caption.to_string(),
            image: ImageRef {
                public_id: "gallery/test".to_string(),
                url: "http://localhost:5000/media/gallery/test".to_string(),
            },
            owner: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let posts = vec![post("Sunset at the beach"), post("mountain trail"), post("")];

        let hits = filter_posts(&posts, "SUNSET");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].caption, "Sunset at the beach");

        assert_eq!(filter_posts(&posts, "trail").len(), 1);
        assert!(filter_posts(&posts, "lake").is_empty());
    }

    #[test]
    fn empty_query_matches_everything() {
        let posts = vec![post("one"), post("")];
        assert_eq!(filter_posts(&posts, "").len(), 2);
    }
}
