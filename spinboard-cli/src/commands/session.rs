use anyhow::Result;
use dialoguer::Password;
use spinboard_core::GameClient;

pub async fn login(client: &GameClient, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let session = client.login(username, &password).await?;

    println!("Logged in as '{}' (profile '{}')", session.username, client.scope());
    super::board::print_board(&client.board().current(), Some(session.username.as_str()));
    Ok(())
}

pub async fn logout(client: &GameClient) -> Result<()> {
    if client.logout().await? {
        println!("Session for profile '{}' forgotten", client.scope());
    } else {
        println!("No session saved for profile '{}'", client.scope());
    }
    Ok(())
}

pub fn whoami(client: &GameClient) -> Result<()> {
    match client.session() {
        Some(session) => {
            println!("Username: {}", session.username);
            println!("Profile: {}", client.scope());
            println!(
                "Logged in since: {}",
                session.created_at.format("%Y-%m-%d %H:%M")
            );
        }
        None => println!("Not logged in (profile '{}')", client.scope()),
    }
    Ok(())
}
