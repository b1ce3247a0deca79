use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        isbn TEXT NOT NULL UNIQUE,
        publish_year INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        author TEXT,
        FOREIGN KEY (category_id) REFERENCES categories(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS book_copies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id INTEGER NOT NULL,
        available TEXT NOT NULL DEFAULT 'yes' CHECK (available IN ('yes', 'no')),
        condition_description TEXT,
        FOREIGN KEY (book_id) REFERENCES books(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS membership (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        phone TEXT NOT NULL,
        address TEXT NOT NULL,
        join_date TEXT NOT NULL,
        expire_date TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS librarians (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        hire_date TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_id INTEGER NOT NULL,
        copy_id INTEGER NOT NULL,
        librarian_id INTEGER NOT NULL,
        borrow_date TEXT NOT NULL,
        due_date TEXT NOT NULL,
        return_date TEXT DEFAULT NULL,
        returned_by INTEGER DEFAULT NULL,
        CHECK (due_date > borrow_date),
        FOREIGN KEY (member_id) REFERENCES membership(id),
        FOREIGN KEY (copy_id) REFERENCES book_copies(id),
        FOREIGN KEY (librarian_id) REFERENCES librarians(id),
        FOREIGN KEY (returned_by) REFERENCES librarians(id)
    )
    "#,
    // A copy can be out on at most one open transaction
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_transactions_open_copy
        ON transactions(copy_id) WHERE return_date IS NULL
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_transactions_member
        ON transactions(member_id)
    "#,
];

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    for ddl in SCHEMA {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            ddl.to_string(),
        ))
        .await?;
    }

    tracing::debug!("Schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
