mod common;

use anyhow::Result;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;

// A 1x1 PNG is enough for the media store; nothing inspects pixels.
const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
    b'R', 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x00, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82,
];

fn image_form(caption: &str) -> Form {
    Form::new().text("caption", caption.to_string()).part(
        "image",
        Part::bytes(PNG_BYTES.to_vec()).file_name("img.png"),
    )
}

async fn fetch_me(client: &reqwest::Client, base_url: &str) -> Result<Value> {
    let res = client.get(format!("{}/api/v1/me", base_url)).send().await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "me failed: {}", res.status());
    Ok(res.json::<Value>().await?["data"].clone())
}

#[tokio::test]
async fn create_list_delete_scenario() -> Result<()> {
    let server = common::ensure_server().await?;
    let (client, _email) = common::register_user(&server.base_url, "ann").await?;

    // Create a post with an empty caption
    let res = client
        .post(format!("{}/api/v1/post/create", server.base_url))
        .multipart(image_form(""))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Post created.");

    let me = fetch_me(&client, &server.base_url).await?;
    let posts = me["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["caption"], "");
    assert!(posts[0]["image"]["url"].as_str().unwrap().contains("/media/gallery/"));

    // A second post lands at the front of the owner-list
    let res = client
        .post(format!("{}/api/v1/post/create", server.base_url))
        .multipart(image_form("Sunset"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let me = fetch_me(&client, &server.base_url).await?;
    let posts = me["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["caption"], "Sunset");
    assert_eq!(posts[1]["caption"], "");

    // Delete the newest post and confirm the list shrinks by one
    let newest_id = posts[0]["id"].as_str().unwrap().to_string();
    let res = client
        .delete(format!("{}/api/v1/post/{}", server.base_url, newest_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let me = fetch_me(&client, &server.base_url).await?;
    let posts = me["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["caption"], "");

    Ok(())
}

#[tokio::test]
async fn create_without_file_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let (client, _email) = common::register_user(&server.base_url, "bob").await?;

    let res = client
        .post(format!("{}/api/v1/post/create", server.base_url))
        .multipart(Form::new().text("caption", "no image attached"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Please enter all fields");

    // No post record was created
    let me = fetch_me(&client, &server.base_url).await?;
    assert_eq!(me["posts"].as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn create_requires_a_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/post/create", server.base_url))
        .multipart(image_form("drive-by"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn delete_of_unknown_post_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let (client, _email) = common::register_user(&server.base_url, "carol").await?;

    let res = client
        .delete(format!(
            "{}/api/v1/post/00000000-0000-4000-8000-000000000000",
            server.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Post not found");

    // Garbage ids are a client error, not a 404
    let res = client
        .delete(format!("{}/api/v1/post/not-a-uuid", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn delete_enforces_ownership() -> Result<()> {
    let server = common::ensure_server().await?;
    let (owner, _email) = common::register_user(&server.base_url, "dana").await?;

    let res = owner
        .post(format!("{}/api/v1/post/create", server.base_url))
        .multipart(image_form("mine"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let me = fetch_me(&owner, &server.base_url).await?;
    let post_id = me["posts"][0]["id"].as_str().unwrap().to_string();

    // A different authenticated user cannot delete it
    let (intruder, _email) = common::register_user(&server.base_url, "eve").await?;
    let res = intruder
        .delete(format!("{}/api/v1/post/{}", server.base_url, post_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The post is still there for its owner
    let me = fetch_me(&owner, &server.base_url).await?;
    assert_eq!(me["posts"][0]["id"], post_id.as_str());

    Ok(())
}
