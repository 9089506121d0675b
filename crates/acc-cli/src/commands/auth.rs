//! Sign-in and token management.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use acc_client::Session;
use acc_core::CredentialSink;

use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Print the URL to open in a browser to grant access
    LoginUrl,

    /// Exchange the authorization code from the redirect for tokens
    Exchange(ExchangeArgs),

    /// Refresh the stored access token
    Refresh,

    /// Display the stored session
    Whoami,

    /// Remove stored tokens
    Logout,

    /// Obtain an application-scoped token
    TwoLegged(TwoLeggedArgs),
}

#[derive(Args, Debug)]
pub struct ExchangeArgs {
    /// Authorization code from the redirect URL
    pub code: String,

    /// ACC account id used for account administration
    #[arg(long)]
    pub account_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct TwoLeggedArgs {
    /// Print the token to stdout
    #[arg(long)]
    pub print: bool,
}

pub async fn handle(cmd: AuthCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        AuthSubcommand::LoginUrl => login_url(ctx),
        AuthSubcommand::Exchange(args) => exchange(args, ctx).await,
        AuthSubcommand::Refresh => refresh(ctx).await,
        AuthSubcommand::Whoami => whoami(ctx),
        AuthSubcommand::Logout => logout(ctx).await,
        AuthSubcommand::TwoLegged(args) => two_legged(args, ctx).await,
    }
}

fn login_url(ctx: &Context) -> Result<()> {
    let url = ctx.oauth()?.authorize_url().context("Failed to build login URL")?;
    output::note("Open this URL, approve access, then run 'acc auth exchange <code>':");
    println!("{}", url);
    Ok(())
}

async fn exchange(args: ExchangeArgs, ctx: &Context) -> Result<()> {
    let oauth = ctx.oauth()?;
    eprintln!("{}", "Exchanging authorization code...".dimmed());

    let tokens = oauth
        .exchange_code_for_token(&args.code)
        .await
        .context("Failed to exchange authorization code")?;

    let account_id = match args.account_id {
        Some(id) => Some(id),
        None => ctx.stored_credentials()?.and_then(|c| c.account_id),
    };
    let session = Session::from_token_response(
        oauth.config().clone(),
        &tokens,
        account_id,
        Some(ctx.sink()),
    )
    .context("Failed to start session")?;

    ctx.credential_store()
        .save(&session.export_credentials())
        .await
        .context("Failed to save credentials")?;

    output::success("Signed in");
    println!();
    if let Some(expires_in) = tokens.expires_in {
        output::field("Expires in", &format!("{}s", expires_in));
    }
    output::field(
        "Refresh token",
        if tokens.refresh().is_some() { "stored" } else { "none" },
    );
    output::field("Stored at", &ctx.credential_store().path().display().to_string());
    Ok(())
}

async fn refresh(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    session
        .refresh_access_token()
        .await
        .context("Failed to refresh access token")?;
    output::success("Access token refreshed");
    Ok(())
}

fn whoami(ctx: &Context) -> Result<()> {
    let credentials = ctx
        .stored_credentials()?
        .filter(|c| c.has_user_token())
        .context("No active session. Run 'acc auth login-url' first.")?;

    let presence = |v: &Option<String>| if v.is_some() { "yes" } else { "no" };
    output::field("Account", credentials.account_id.as_deref().unwrap_or("-"));
    output::field("Client", credentials.client_id.as_deref().unwrap_or("-"));
    output::field("Access token", "yes");
    output::field("Refresh token", presence(&credentials.refresh_token));
    output::field("Application token", presence(&credentials.two_legged_token));
    Ok(())
}

async fn logout(ctx: &Context) -> Result<()> {
    ctx.clear_credentials().await?;
    output::success("Signed out");
    Ok(())
}

async fn two_legged(args: TwoLeggedArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let token = session
        .two_legged_token()
        .await
        .context("Failed to obtain application token")?;

    if args.print {
        println!("{}", token.as_str());
    } else {
        output::success("Application token obtained and stored");
    }
    Ok(())
}
