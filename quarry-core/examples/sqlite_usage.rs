use quarry_core::{insert, op, select, ConditionGroup, Connection, Database, DatabaseConfig};
use quarry_core::{QueryBuilder, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Quarry SQLite - Usage Example ===\n");

    // SQL generation only
    let insert_query = insert("users").values([
        ("name", Value::from("John Doe")),
        ("email", Value::from("john@example.com")),
        ("age", Value::from(30)),
    ]);
    let rendered = insert_query.build()?;
    println!("1. INSERT:");
    println!("   SQL: {}", rendered.sql);
    println!("   Parameters: {:?}\n", rendered.params);

    let select_query = select("users")
        .select("id, name")
        .where_(("age", op::GT, 18))
        .or_where(("email", op::LIKE, "%@example.com"));
    println!("2. SELECT:");
    println!("   SQL: {}\n", select_query.to_sql()?);

    // Against a real in-memory database
    let mut db = Database::connect(&DatabaseConfig::sqlite_memory()).await?;
    db.connection_mut()
        .execute(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, email TEXT, age INTEGER)",
            &[],
        )
        .await?;

    let id = db
        .insert_into(
            "users",
            [
                ("name", Value::from("Jane Roe")),
                ("email", Value::from("jane@example.com")),
                ("age", Value::from(34)),
            ],
        )
        .await?;
    println!("3. Inserted user with id {:?}", id);

    let adults = ConditionGroup::new().where_(("age", op::GTE, 18));
    for row in db.select_from("users", "id, name, age", Some(&adults)).await? {
        println!("   {:?}", row);
    }

    db.close().await?;
    Ok(())
}
