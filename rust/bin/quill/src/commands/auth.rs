//! Sign-in commands.

use anyhow::Result;
use quill_app::request::{LoginReq, LogoutReq, RegisterReq};
use quill_app::state::AuthState;
use quill_app::QuillApp;

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

fn settled(app: &QuillApp) -> Result<()> {
    let auth = app.get::<AuthState>(AuthState::PATH).unwrap_or_default();
    if let Some(user) = auth.user {
        println!("Signed in as {} ({})", user.user.username, user.id());
        super::print_message(app);
        return Ok(());
    }
    match auth.error {
        Some(e) => anyhow::bail!("{}", e),
        None => anyhow::bail!("sign-in did not complete"),
    }
}

pub async fn login(app: &QuillApp, username: &str, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    app.send(LoginReq { username: username.to_string(), password }).await;
    settled(app)
}

pub async fn register(
    app: &QuillApp,
    username: &str,
    email: &str,
    display_name: &str,
    password: Option<String>,
) -> Result<()> {
    let password = password_or_prompt(password)?;
    app.send(RegisterReq {
        username: username.to_string(),
        display_name: display_name.to_string(),
        email: email.to_string(),
        password,
    })
    .await;
    settled(app)
}

pub async fn logout(app: &QuillApp) -> Result<()> {
    app.send(LogoutReq).await;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(app: &QuillApp) -> Result<()> {
    match app.get::<AuthState>(AuthState::PATH).and_then(|a| a.user) {
        Some(user) => {
            println!("{} ({})", user.user.display_name, user.user.username);
            println!("id:        {}", user.id());
            println!("posts:     {}", user.user.post_count);
            println!("followers: {}", user.user.follower_count);
            println!("following: {}", user.user.following_count);
        }
        None => println!("Not signed in. Run `quill login <username>`."),
    }
    Ok(())
}
