//! Admin user management commands.

use rand::{Rng, distr::Alphanumeric};

use sundry_core::{Role, Username};
use sundry_store::db::users::UserRepository;
use sundry_store::services::account::AccountService;
use sundry_store::services::catalog::CatalogService;

/// Length of generated bootstrap passwords.
const GENERATED_PASSWORD_LENGTH: usize = 20;

/// Create a new admin user.
///
/// When no password is given, a random one is generated and printed once.
///
/// # Errors
///
/// Returns an error on validation failures or if the username/email is
/// already taken.
pub async fn create(
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let generated = password.is_none();
    let password = password.unwrap_or_else(generate_password);

    let user = AccountService::new(&pool)
        .register(username, email, &password, &password)
        .await?;
    CatalogService::new(&pool).set_role(user.id, Role::Admin).await?;

    tracing::info!(user_id = %user.id, "admin user created");

    #[allow(clippy::print_stdout)]
    if generated {
        println!("Generated password for {username}: {password}");
        println!("Store it now; it is not recoverable later.");
    }

    Ok(())
}

/// Promote an existing user to admin.
///
/// # Errors
///
/// Returns an error if the user does not exist.
pub async fn promote(username: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let username = Username::parse(username)?;
    let user = UserRepository::new(&pool)
        .get_by_username(&username)
        .await?
        .ok_or_else(|| format!("no user named '{username}'"))?;

    CatalogService::new(&pool).set_role(user.id, Role::Admin).await?;

    tracing::info!(user_id = %user.id, "user promoted to admin");
    Ok(())
}

/// Random alphanumeric password for bootstrap admins.
fn generate_password() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}
