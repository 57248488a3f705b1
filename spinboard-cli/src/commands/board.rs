use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use spinboard_core::leaderboard::rank_label;
use spinboard_core::{BoardState, GameClient, LeaderboardView};
use std::time::Duration;

const LIVENESS_CHECK: Duration = Duration::from_secs(1);

pub fn print_board(state: &BoardState, username: Option<&str>) {
    let view = LeaderboardView::project(&state.leaderboard, username);

    if view.entries.is_empty() {
        println!("Leaderboard is empty");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Rank", "Player", "Score"]);

        for row in &view.entries {
            let player = if row.is_current_user {
                format!("> {}", row.entry.username)
            } else {
                row.entry.username.clone()
            };
            table.add_row(vec![
                format!("#{}", row.entry.rank),
                player,
                format!("{} pts", row.entry.score),
            ]);
        }

        println!("{}", table);
    }

    if username.is_some() {
        println!("Your Rank: {}", rank_label(state.user_rank));
    }
}

pub async fn show_leaderboard(client: &GameClient) -> Result<()> {
    if client.refresh_leaderboard().await.is_none() {
        println!("Leaderboard unavailable; see logs for details");
        return Ok(());
    }
    client.refresh_rank().await;

    print_board(&client.board().current(), client.username().as_deref());
    Ok(())
}

pub async fn show_rank(client: &GameClient) -> Result<()> {
    if client.session().is_none() {
        println!("Not logged in (profile '{}')", client.scope());
        return Ok(());
    }

    client.refresh_rank().await;
    println!("Your Rank: {}", rank_label(client.board().user_rank()));
    Ok(())
}

pub async fn watch(client: &GameClient) -> Result<()> {
    client.refresh().await;
    let username = client.username();

    let mut updates = client.subscribe();
    let channel = client.connect_realtime().await?;

    print_board(&updates.borrow_and_update(), username.as_deref());
    println!("Watching for updates (Ctrl-C to stop)...");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                println!();
                print_board(&updates.borrow_and_update(), username.as_deref());
            }
            _ = tokio::time::sleep(LIVENESS_CHECK) => {
                if !channel.is_running() {
                    println!("Realtime channel closed");
                    break;
                }
            }
        }
    }

    channel.shutdown().await;
    Ok(())
}
