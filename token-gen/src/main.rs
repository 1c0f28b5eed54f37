use clap::Parser;

use access_guard::services::auth::{TokenIssuer, TokenVerifier};

/// Mint an HS256 bearer token that access-guard accepts.
///
/// For local development against a running service:
/// - Claims: sub, iat, exp and optionally is_admin
/// - Secret comes from --secret or JWT_SECRET (.env is loaded)
/// - The token is verified with the same secret before printing
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Subject id (`sub` claim)
    #[arg(long)]
    sub: i64,

    /// Embed `is_admin` (used only when the identity service is unreachable)
    #[arg(long)]
    admin: Option<bool>,

    /// Shared HMAC secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    secret: String,

    /// Lifetime in minutes; negative values produce an already-expired token
    #[arg(long, env = "JWT_TTL_MIN", default_value_t = 60, allow_negative_numbers = true)]
    ttl_min: i64,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let issuer = TokenIssuer::new(&args.secret, args.ttl_min);
    let token = issuer.issue(args.sub, args.admin)?;

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("token: {}", token);
    println!("sub: {}", args.sub);
    println!("ttl_min: {}", issuer.ttl_minutes());
    match TokenVerifier::new(&args.secret).verify(&token) {
        Ok(verified) => println!("exp: {}", verified.expires_at),
        Err(e) => println!("verify: {}", e),
    }
    println!("Authorization: Bearer {}", token);

    Ok(())
}
