use spinboard_core::{ClientConfig, GameClient, LeaderboardView};
use tempfile::tempdir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let temp_dir = tempdir()?;
    let config = ClientConfig::from_env();
    println!("Scoring service: {}", config.service_url);

    let client = GameClient::open(config, temp_dir.path(), "example").await?;

    let username = std::env::args().nth(1).unwrap_or_else(|| "alice".to_string());
    let password = std::env::args().nth(2).unwrap_or_else(|| "pw".to_string());
    let session = client.login(&username, &password).await?;
    println!("Logged in as {}", session.username);

    if let Some(outcome) = client.spin()? {
        println!("Wheel landed on {}", outcome.value);
        let resolution = client.finish_spin().await?;
        println!("Resolution: {:?}", resolution);
    }

    let leaderboard = client.board().leaderboard();
    let view = LeaderboardView::project(&leaderboard, Some(session.username.as_str()));
    for row in &view.entries {
        let marker = if row.is_current_user { ">" } else { " " };
        println!(
            "{} #{} {} {} pts",
            marker, row.entry.rank, row.entry.username, row.entry.score
        );
    }
    println!("Your rank: {}", view.rank_label());

    Ok(())
}
