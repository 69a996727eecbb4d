//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::{Role, User};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

fn role_color(role: Role) -> Color {
    match role {
        Role::Admin => Color::Magenta,
        Role::User => Color::Reset,
    }
}

pub fn user_table(users: &[User]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.name),
            Cell::new(&user.email),
            Cell::new(user.role).fg(role_color(user.role)),
            Cell::new(user.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    table
}

/// Print a table of users
pub fn print_user_table(users: &[User]) {
    if users.is_empty() {
        info("No users found. Create one with 'usergate create-admin'");
        return;
    }

    println!("{}", user_table(users));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_table_lists_every_user() {
        let now = Utc::now();
        let users: Vec<User> = (1..=2)
            .map(|id| User {
                id,
                name: format!("user{}", id),
                email: format!("user{}@x.com", id),
                password_hash: "hash".to_string(),
                role: Role::User,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let rendered = user_table(&users).to_string();
        assert!(rendered.contains("user1@x.com"));
        assert!(rendered.contains("user2@x.com"));
        assert!(!rendered.contains("hash"));
    }
}
