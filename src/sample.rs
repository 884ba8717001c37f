//! A small data set to try the engine with.

use tracing::info;

use crate::database::Database;
use crate::error::Result;

/// Statements that build the `users` and `products` tables.
pub const SAMPLE_STATEMENTS: &[&str] = &[
    "CREATE TABLE users (id int, name string, age int, active bool)",
    "INSERT INTO users VALUES (1, Alice, 25, true)",
    "INSERT INTO users VALUES (2, Bob, 30, true)",
    "INSERT INTO users VALUES (3, Charlie, 22, false)",
    "INSERT INTO users VALUES (4, Diana, 28, true)",
    "CREATE TABLE products (id int, name string, price double, in_stock bool)",
    "INSERT INTO products VALUES (1, Laptop, 999.99, true)",
    "INSERT INTO products VALUES (2, Mouse, 25.50, true)",
    "INSERT INTO products VALUES (3, Keyboard, 75.00, false)",
    "INSERT INTO products VALUES (4, Monitor, 299.99, true)",
];

/// Queries worth trying once the sample data is loaded.
pub const SAMPLE_HINTS: &[&str] = &[
    "SHOW TABLES",
    "SELECT * FROM users",
    "SELECT * FROM products WHERE price > 50",
];

/// Runs every sample statement, stopping at the first failure.
pub fn load_sample_data(db: &mut Database) -> Result<()> {
    for sql in SAMPLE_STATEMENTS {
        db.execute(sql)?;
    }
    info!(statements = SAMPLE_STATEMENTS.len(), "loaded sample data");
    Ok(())
}
