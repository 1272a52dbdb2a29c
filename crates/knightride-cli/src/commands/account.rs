use anyhow::Result;
use knightride_application::AuthService;
use knightride_core::auth::{Credentials, Registration};

use crate::context::{AppContext, prompt};

pub struct RegisterArgs {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: Option<String>,
    pub bike_model: Option<String>,
    pub license_number: Option<String>,
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt("Password: "),
    }
}

pub async fn health(ctx: &AppContext) -> Result<()> {
    let status = ctx.client.health().await?;
    println!("{} ({})", status.message, ctx.client.base_url());
    Ok(())
}

pub async fn register(ctx: &AppContext, args: RegisterArgs) -> Result<()> {
    let registration = Registration {
        name: args.name,
        email: args.email,
        phone: args.phone,
        password: password_or_prompt(args.password)?,
        bike_model: args.bike_model,
        license_number: args.license_number,
    };

    let auth = AuthService::new(ctx.client.clone());
    let response = auth.register(&registration).await?;
    println!(
        "Registered {} (user {})",
        registration.email,
        response.user_id.as_deref().unwrap_or("-")
    );
    Ok(())
}

pub async fn login(ctx: &AppContext, email: String, password: Option<String>) -> Result<()> {
    let credentials = Credentials {
        email,
        password: password_or_prompt(password)?,
    };

    let auth = AuthService::new(ctx.client.clone());
    auth.login(&credentials).await?;
    println!("Signed in as {}", credentials.email);
    Ok(())
}

pub fn logout(ctx: &AppContext) {
    AuthService::new(ctx.client.clone()).logout();
    println!("Signed out");
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    let user = AuthService::new(ctx.client.clone()).current_user().await?;

    println!("{} <{}>", user.name, user.email);
    println!("  phone:   {}", user.phone);
    if let Some(bike) = &user.bike_model {
        println!("  bike:    {}", bike);
    }
    if let Some(license) = &user.license_number {
        println!("  license: {}", license);
    }
    if let Some(stats) = &user.ride_stats {
        println!(
            "  rides:   {} ({}, safety score {})",
            stats.total_rides, stats.total_distance, stats.safety_score
        );
    }
    Ok(())
}
