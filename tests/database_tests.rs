use sqlx::PgPool;

use pansen_sqla::database::{DatabaseConnection, DatabaseMigrations};
use pansen_sqla::models::{Child, NewChild, Parent};
use pansen_sqla::ConstraintKind;
use pansen_sqla::PansenError;

#[sqlx::test(migrator = "pansen_sqla::database::MIGRATOR")]
async fn test_health_check_and_schema(pool: PgPool) -> sqlx::Result<()> {
    let db = DatabaseConnection::from_pool(pool, true);

    assert!(db.health_check().await.unwrap());
    assert!(DatabaseMigrations::schema_ready(db.pool()).await.unwrap());
    assert!(db.session_factory().options().test_mode);
    Ok(())
}

#[sqlx::test(migrator = "pansen_sqla::database::MIGRATOR")]
async fn test_reset_schema_drops_rows(pool: PgPool) -> sqlx::Result<()> {
    let parent = Parent::insert(&pool).await?;
    Child::insert(&pool, parent.id, &NewChild::new().with_txt("gone")).await?;

    DatabaseMigrations::reset_schema(&pool).await.unwrap();

    assert!(DatabaseMigrations::schema_ready(&pool).await.unwrap());
    assert!(Parent::find_by_id(&pool, parent.id).await?.is_none());
    assert_eq!(Child::count_by_parent(&pool, parent.id).await?, 0);

    // Migrations are recorded again, so a second run is a no-op
    DatabaseMigrations::run_all(&pool).await.unwrap();
    Ok(())
}

#[sqlx::test(migrator = "pansen_sqla::database::MIGRATOR")]
async fn test_capped_query_limit_is_a_parameter(pool: PgPool) -> sqlx::Result<()> {
    let parent = Parent::insert(&pool).await?;
    for i in 0..5 {
        Child::insert(&pool, parent.id, &NewChild::new().with_txt(i.to_string())).await?;
    }

    let top3 = Child::find_capped_by_parents(&pool, &[parent.id], 3).await?;
    assert_eq!(
        top3.iter().map(|c| c.txt.as_deref().unwrap()).collect::<Vec<_>>(),
        vec!["4", "3", "2"]
    );

    let none = Child::find_capped_by_parents(&pool, &[parent.id], 0).await?;
    assert!(none.is_empty());
    Ok(())
}

#[sqlx::test(migrator = "pansen_sqla::database::MIGRATOR")]
async fn test_duplicate_child_id_is_a_unique_violation(pool: PgPool) -> sqlx::Result<()> {
    let parent = Parent::insert(&pool).await?;
    let child = Child::insert(&pool, parent.id, &NewChild::new()).await?;

    let err: PansenError = sqlx::query("INSERT INTO child (id, parent_id) VALUES ($1, $2)")
        .bind(child.id)
        .bind(parent.id)
        .execute(&pool)
        .await
        .unwrap_err()
        .into();

    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Unique));
    Ok(())
}
