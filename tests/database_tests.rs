use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::{tempdir, TempDir};
use universe_signs_bot::database::{
    connection::DatabaseManager, models::*, repository::StatsRepository,
};
use universe_signs_bot::utils::datetime::DateRange;

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn at(day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, min, sec)
        .unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

async fn time_choice(db: &DatabaseManager, label: &str) -> Result<TimeChoice> {
    for range in TimeRange::all(&db.pool).await? {
        if let Some(choice) = TimeChoice::find_by_range(&db.pool, range.id)
            .await?
            .into_iter()
            .find(|c| c.choice == label)
        {
            return Ok(choice);
        }
    }
    anyhow::bail!("time choice {label} is not seeded")
}

#[tokio::test]
async fn test_seed_data_is_present() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let ranges = TimeRange::all(&db.pool).await?;
    let labels: Vec<&str> = ranges.iter().map(|r| r.time_range.as_str()).collect();
    assert_eq!(
        labels,
        vec!["00:00 – 05:59", "06:00 – 11:59", "12:00 – 17:59", "18:00 – 23:59"]
    );

    let morning = TimeChoice::find_by_range(&db.pool, 2).await?;
    assert!(morning.iter().any(|c| c.choice == "11:11"));
    assert!(morning.iter().all(|c| c.time_range_id == 2));

    let numbers = NumberChoice::all(&db.pool).await?;
    assert_eq!(numbers.first().map(|n| n.number), Some(111));
    assert!(numbers.iter().any(|n| n.number == 1234));

    Ok(())
}

#[tokio::test]
async fn test_time_list_is_ordered_by_range() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let choices = TimeChoice::all_with_ranges(&db.pool).await?;
    assert!(!choices.is_empty());
    assert_eq!(choices[0].time_range, "00:00 – 05:59");
    assert_eq!(choices.last().unwrap().time_range, "18:00 – 23:59");

    Ok(())
}

#[tokio::test]
async fn test_user_get_or_create_is_idempotent() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert!(User::find_by_tg_id(&db.pool, 555).await?.is_none());

    let first = db.get_or_create_user(555, Some("seer".to_string())).await?;
    let second = db.get_or_create_user(555, None).await?;
    assert_eq!(first.id, second.id);
    assert_eq!(second.username.as_deref(), Some("seer"));
    assert_eq!(db.find_user(555).await?.map(|u| u.id), Some(first.id));

    // create on an existing tg id returns the stored user
    let again = User::create(&db.pool, 555, Some("other".to_string())).await?;
    assert_eq!(again.id, first.id);

    Ok(())
}

#[tokio::test]
async fn test_selections_in_range_are_inclusive() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user = db.create_user(42, None).await?;
    let choice = time_choice(&db, "11:11").await?;

    for ts in [
        at(9, 23, 59, 59),
        at(10, 0, 0, 0),
        at(12, 11, 11, 0),
        at(15, 23, 59, 59),
        at(16, 0, 0, 0),
    ] {
        TimeSelection::create(&db.pool, user.id, choice.id, ts).await?;
    }

    let range = DateRange::from_days(day(10), day(15));
    let rows = db
        .selections_in_range(user.id, StatKind::Time, range.start, range.end)
        .await?;
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.label == "11:11"));
    assert_eq!(rows[0].interpretation, choice.interpretation);

    Ok(())
}

#[tokio::test]
async fn test_selections_are_per_user_and_kind() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let alice = db.create_user(1, Some("alice".to_string())).await?;
    let bob = db.create_user(2, Some("bob".to_string())).await?;
    let choice = time_choice(&db, "22:22").await?;
    let number = NumberChoice::all(&db.pool).await?.remove(0);

    TimeSelection::create(&db.pool, alice.id, choice.id, at(1, 22, 22, 0)).await?;
    NumberSelection::create(&db.pool, alice.id, number.id, at(2, 8, 0, 0)).await?;
    NumberSelection::create(&db.pool, bob.id, number.id, at(2, 9, 0, 0)).await?;

    assert_eq!(db.all_selections(alice.id, StatKind::Time).await?.len(), 1);

    let numbers = db.all_selections(alice.id, StatKind::Numbers).await?;
    assert_eq!(numbers.len(), 1);
    assert_eq!(numbers[0].label, number.number.to_string());

    assert!(db.all_selections(bob.id, StatKind::Time).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_selections_come_back_in_submission_order() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user = db.create_user(7, None).await?;
    let numbers = NumberChoice::all(&db.pool).await?;

    NumberSelection::create(&db.pool, user.id, numbers[2].id, at(5, 12, 0, 0)).await?;
    NumberSelection::create(&db.pool, user.id, numbers[0].id, at(3, 12, 0, 0)).await?;
    NumberSelection::create(&db.pool, user.id, numbers[1].id, at(4, 12, 0, 0)).await?;

    let labels: Vec<String> = db
        .all_selections(user.id, StatKind::Numbers)
        .await?
        .into_iter()
        .map(|r| r.label)
        .collect();
    assert_eq!(
        labels,
        vec![
            numbers[0].number.to_string(),
            numbers[1].number.to_string(),
            numbers[2].number.to_string()
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_selection_rejects_unknown_choice() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user = db.create_user(9, None).await?;

    let result = TimeSelection::create(&db.pool, user.id, 99_999, at(1, 0, 0, 0)).await;
    assert!(result.is_err());
    assert!(TimeChoice::find_by_id(&db.pool, 99_999).await?.is_none());

    Ok(())
}
