use anyhow::Result;
use spinboard_core::leaderboard::ApplyOutcome;
use spinboard_core::{GameClient, SpinResolution};

pub async fn spin(client: &GameClient, count: u32) -> Result<()> {
    let delay = client.config().animation_delay;

    for _ in 0..count {
        let Some(outcome) = client.spin()? else {
            println!("A spin is already in progress");
            break;
        };

        println!("Spinning...");
        tokio::time::sleep(delay).await;

        match client.finish_spin().await? {
            SpinResolution::Scored { outcome, applied } => {
                match outcome.segment() {
                    Some(segment) => {
                        println!("Wheel landed on {} ({:?})", outcome.value, segment.color)
                    }
                    None => println!("Wheel landed on {}", outcome.value),
                }
                if let ApplyOutcome::Stale { .. } = applied {
                    println!("A newer leaderboard was already shown");
                }
            }
            SpinResolution::Failed { outcome, reason } => {
                println!("Wheel landed on {} but the score was not updated", outcome.value);
                tracing::debug!("Score update failure: {}", reason);
            }
            SpinResolution::Ignored => {
                println!("Wheel landed on {}", outcome.value);
            }
        }
    }

    println!();
    super::board::print_board(&client.board().current(), client.username().as_deref());
    Ok(())
}
