//! Command-line entry point for the Dev Diaries client.
//!
//! Usage: `devdiaries [whoami | login <email> <password> | logout | blogs | comments <blog-id>]`

use devdiaries_auth::ListingView;
use devdiaries_client::{ClientApp, ClientConfig};
use devdiaries_core::BlogId;

#[tokio::main]
async fn main() {
    devdiaries_observability::init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("failed to load configuration: {err:#}");
            std::process::exit(1);
        }
    };

    let app = ClientApp::bootstrap(&config);
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = match args.as_slice() {
        [] | ["whoami"] => {
            println!("{}", app.actor());
            Ok(())
        }
        ["login", email, password] => app
            .sign_in(email, password)
            .await
            .map(|actor| println!("Logged in as {actor}"))
            .map_err(|e| e.user_message()),
        ["logout"] => app
            .sign_out()
            .map(|()| println!("Logged out"))
            .map_err(|e| e.user_message()),
        ["blogs"] => list_blogs(&app).await,
        ["comments", blog_id] => list_comments(&app, BlogId::new(*blog_id)).await,
        _ => {
            eprintln!("usage: devdiaries [whoami | login <email> <password> | logout | blogs | comments <blog-id>]");
            std::process::exit(2);
        }
    };

    if let Err(message) = outcome {
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

/// Errors come back as the single line shown to the user.
async fn list_blogs(app: &ClientApp) -> Result<(), String> {
    if app.listing_view() == ListingView::PromptLogin {
        println!("Please log in to view blogs.");
        return Ok(());
    }

    match app.cache.refresh_blogs().await {
        Ok(blogs) => {
            for blog in blogs {
                let author = blog.author.map(|a| a.to_string()).unwrap_or_default();
                println!("{}  {}  {}", blog.id, blog.title, author);
            }
            Ok(())
        }
        Err(err) => Err(err.detail()),
    }
}

async fn list_comments(app: &ClientApp, blog_id: BlogId) -> Result<(), String> {
    match app.cache.view_comments(blog_id).await {
        Ok(comments) => {
            for comment in comments {
                println!("{}: {}", comment.commenter(), comment.comment);
            }
            Ok(())
        }
        Err(err) => Err(err.detail()),
    }
}
