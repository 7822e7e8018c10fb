//! Prints an argon2 hash for an eperson's `password_hash` column.
//!
//! Usage: `hash_password <password>`, or pipe the password on stdin.

use std::io::BufRead;

use vellum_service::auth::password::hash_password;

fn main() {
    let password = std::env::args().nth(1).or_else(|| {
        std::io::stdin()
            .lock()
            .lines()
            .next()
            .and_then(Result::ok)
    });

    let Some(password) = password.filter(|p| !p.is_empty()) else {
        eprintln!("Usage: hash_password <password>");
        std::process::exit(2);
    };

    match hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(err) => {
            eprintln!("Failed to hash password: {err}");
            std::process::exit(1);
        }
    }
}
